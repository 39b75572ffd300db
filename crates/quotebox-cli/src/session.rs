//! Interactive quote session
//!
//! `quotebox run` keeps one store open, reads commands from stdin and runs
//! the sync poller in the background. Store changes arrive as
//! [`StoreEvent`]s, so categories added by an import or a sync cycle show up
//! without re-reading anything.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use quotebox_core::sync::{spawn_sync_poller, HttpSource, SyncEngine, SyncEvent, SyncHandle};
use quotebox_core::transfer::{import_file, write_export};
use quotebox_core::{
    list_categories, CategoryFilter, Config, NoticeBoard, QuoteError, QuoteStore, Selector,
    StoreEvent,
};

use crate::commands::failure_message;
use crate::commands::transfer::print_import_report;
use crate::output::Output;

const HELP: &str = "\
Commands:
  next, n                    Show another random quote (also: empty line)
  last                       Show the last quote again
  add <text> | <category>    Add a quote
  filter [<category>|all]    Show or set the category filter
  categories                 List categories
  export [<dir>]             Write all quotes to an export file
  import <file>              Append quotes from an export file
  sync                       Fetch server quotes now
  help                       Show this help
  quit, q                    Leave the session";

/// A parsed session input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Next,
    Last,
    Add { text: String, category: String },
    Filter(Option<String>),
    Categories,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Sync,
    Help,
    Quit,
    /// Input that could not be understood, with a hint to show
    Invalid(String),
}

impl SessionCommand {
    /// Parse one line of input
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "n" | "next" => SessionCommand::Next,
            "last" => SessionCommand::Last,
            "add" => match rest.split_once('|') {
                Some((text, category)) => SessionCommand::Add {
                    text: text.trim().to_string(),
                    category: category.trim().to_string(),
                },
                None => SessionCommand::Invalid("Usage: add <text> | <category>".to_string()),
            },
            "filter" => SessionCommand::Filter(non_empty(rest)),
            "categories" | "cats" => SessionCommand::Categories,
            "export" => SessionCommand::Export(non_empty(rest).map(PathBuf::from)),
            "import" => match non_empty(rest) {
                Some(path) => SessionCommand::Import(PathBuf::from(path)),
                None => SessionCommand::Invalid("Usage: import <file>".to_string()),
            },
            "sync" => SessionCommand::Sync,
            "help" | "?" => SessionCommand::Help,
            "quit" | "q" | "exit" => SessionCommand::Quit,
            other => SessionCommand::Invalid(format!(
                "Unknown command: '{}'. Type 'help' for a list.",
                other
            )),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// State of a running session
struct Session<'a> {
    store: Arc<Mutex<QuoteStore>>,
    selector: Selector,
    notices: NoticeBoard,
    poller: Option<SyncHandle>,
    output: &'a Output,
}

/// Run the interactive session until `quit` or end of input
pub async fn run(store: QuoteStore, selector: Selector, config: &Config, output: &Output) -> Result<()> {
    let mut store_events = store.subscribe();
    let store = Arc::new(Mutex::new(store));
    let notices = NoticeBoard::new(config.notice_ttl());
    let poller = start_poller(config, store.clone(), notices.clone());

    let mut session = Session {
        store,
        selector,
        notices,
        poller,
        output,
    };

    session.show_initial().await;
    output.message("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(output);

    loop {
        // Re-prompt only after something was printed
        let printed = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !session.handle(SessionCommand::parse(&line)).await {
                    break;
                }
                true
            }
            event = store_events.recv() => {
                match event {
                    Ok(event) => session.on_store_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!("Missed {} store event(s)", n);
                        false
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            event = next_sync_event(&mut session.poller) => {
                session.on_sync_event(event)
            }
        };

        if printed {
            prompt(output);
        }
    }

    if let Some(poller) = &session.poller {
        poller.shutdown().await;
    }
    info!("Session ended");
    Ok(())
}

/// Start the background poller when sync is configured
fn start_poller(
    config: &Config,
    store: Arc<Mutex<QuoteStore>>,
    notices: NoticeBoard,
) -> Option<SyncHandle> {
    if !config.sync_active() {
        debug!("Sync disabled, not starting poller");
        return None;
    }
    let url = config.sync_url.as_deref()?;

    match HttpSource::new(url) {
        Ok(source) => {
            let engine = Arc::new(SyncEngine::new(source, store, notices));
            info!("Polling {} every {:?}", url, config.sync_interval());
            Some(spawn_sync_poller(engine, config.sync_interval()))
        }
        Err(e) => {
            warn!("Sync poller not started: {}", e);
            None
        }
    }
}

/// Wait for the next poller event, forever if there is no poller
async fn next_sync_event(poller: &mut Option<SyncHandle>) -> Option<SyncEvent> {
    match poller {
        Some(handle) => handle.event_rx.recv().await,
        None => std::future::pending().await,
    }
}

fn prompt(output: &Output) {
    if output.is_quiet() || output.is_json() {
        return;
    }
    print!("> ");
    let _ = std::io::stdout().flush();
}

impl Session<'_> {
    /// Open the session with a random quote
    async fn show_initial(&mut self) {
        let store = self.store.lock().await;
        match self.selector.show_random(&store) {
            Ok(pick) => self.output.print_pick(&pick),
            Err(_) => self.output.print_no_quotes(),
        }
    }

    /// Handle one command; returns `false` when the session should end
    async fn handle(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Next => {
                let store = self.store.lock().await;
                match self.selector.show_random(&store) {
                    Ok(pick) => self.output.print_pick(&pick),
                    Err(_) => self.output.print_no_quotes(),
                }
            }
            SessionCommand::Last => {
                let store = self.store.lock().await;
                match self.selector.restore_last_viewed(&store) {
                    Some(pick) => self.output.print_pick(&pick),
                    None => self.output.message("Nothing shown yet."),
                }
            }
            SessionCommand::Add { text, category } => {
                let result = self.store.lock().await.add(&text, &category);
                match result {
                    Ok(quote) => {
                        self.output
                            .success(&format!("Quote added to '{}'", quote.category));
                    }
                    Err(e) => self.output.message(&e.to_string()),
                }
            }
            SessionCommand::Filter(None) => {
                self.output
                    .message(&format!("Filter: {}", self.selector.current_filter()));
            }
            SessionCommand::Filter(Some(category)) => {
                let store = self.store.lock().await;
                let result = self
                    .selector
                    .set_filter(CategoryFilter::parse(&category), &store);
                match result {
                    Ok(pick) => self.output.print_pick(&pick),
                    Err(QuoteError::EmptyPool) => self.output.print_no_quotes(),
                    Err(e) => self.output.message(&e.to_string()),
                }
            }
            SessionCommand::Categories => {
                let store = self.store.lock().await;
                self.output
                    .print_categories(&list_categories(&store), self.selector.current_filter());
            }
            SessionCommand::Export(dir) => {
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                let store = self.store.lock().await;
                match write_export(&store, &dir) {
                    Ok(path) => self
                        .output
                        .success(&format!("Exported to {}", path.display())),
                    Err(e) => self.output.message(&failure_message("Export failed", &e)),
                }
            }
            SessionCommand::Import(file) => {
                let result = import_file(&mut *self.store.lock().await, &file);
                match result {
                    Ok(report) => print_import_report(&report, self.output),
                    Err(e) => self.output.message(&failure_message("Import failed", &e)),
                }
            }
            SessionCommand::Sync => match &self.poller {
                Some(poller) => {
                    self.output.message("Syncing...");
                    poller.sync_now().await;
                }
                None => self.output.message("Sync is disabled."),
            },
            SessionCommand::Help => self.output.message(HELP),
            SessionCommand::Quit => return false,
            SessionCommand::Invalid(hint) => self.output.message(&hint),
        }
        true
    }

    /// Refresh the category list when a change brought new categories
    ///
    /// Returns `true` if anything was printed.
    async fn on_store_event(&mut self, event: StoreEvent) -> bool {
        let new_categories = match event {
            StoreEvent::Added { new_category, .. } => new_category.into_iter().collect(),
            StoreEvent::Imported { new_categories, .. }
            | StoreEvent::Synced { new_categories, .. } => new_categories,
            StoreEvent::Loaded { .. } => Vec::new(),
        };
        if new_categories.is_empty() {
            return false;
        }

        let store = self.store.lock().await;
        self.output.message("Categories updated:");
        self.output
            .print_categories(&list_categories(&store), self.selector.current_filter());
        true
    }

    /// Show the sync notice, if a cycle posted one
    ///
    /// Returns `true` if anything was printed.
    fn on_sync_event(&mut self, event: Option<SyncEvent>) -> bool {
        match event {
            Some(SyncEvent::CycleFinished(outcome)) => {
                debug!("Sync cycle finished: {:?}", outcome);
                match self.notices.current() {
                    Some(notice) => {
                        self.output.notice(&notice);
                        self.notices.clear();
                        true
                    }
                    None => false,
                }
            }
            Some(SyncEvent::Stopped) | None => {
                debug!("Sync poller gone");
                self.poller = None;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use quotebox_core::sync::SyncOutcome;
    use quotebox_core::MemoryStorage;

    fn session(output: &Output) -> Session<'_> {
        Session {
            store: Arc::new(Mutex::new(QuoteStore::open(Box::new(MemoryStorage::new())))),
            selector: Selector::new(Box::new(MemoryStorage::new()), Box::new(MemoryStorage::new())),
            notices: NoticeBoard::default(),
            poller: None,
            output,
        }
    }

    fn cycle(added: usize) -> Option<SyncEvent> {
        Some(SyncEvent::CycleFinished(SyncOutcome::Completed {
            fetched: 5,
            added,
        }))
    }

    #[tokio::test]
    async fn test_quiet_sync_cycle_prints_nothing() {
        let output = Output::new(OutputFormat::Quiet);
        let mut session = session(&output);

        assert!(!session.on_sync_event(cycle(0)));
    }

    #[tokio::test]
    async fn test_sync_notice_printed_once() {
        let output = Output::new(OutputFormat::Quiet);
        let mut session = session(&output);

        session.notices.post("2 new quote(s) synced from server");
        assert!(session.on_sync_event(cycle(2)));
        assert!(session.notices.current().is_none());
        assert!(!session.on_sync_event(cycle(0)));
    }

    #[tokio::test]
    async fn test_store_event_without_new_category_prints_nothing() {
        let output = Output::new(OutputFormat::Quiet);
        let mut session = session(&output);

        let quote = quotebox_core::Quote::new("Stay hungry.", "Motivation").unwrap();
        let same_category = StoreEvent::Added {
            quote,
            new_category: None,
        };
        assert!(!session.on_store_event(same_category).await);

        let new_category = StoreEvent::Synced {
            added: 1,
            new_categories: vec!["Server".to_string()],
        };
        assert!(session.on_store_event(new_category).await);
    }

    #[tokio::test]
    async fn test_initial_quote_becomes_last_viewed() {
        let output = Output::new(OutputFormat::Quiet);
        let mut session = session(&output);

        session.show_initial().await;

        let store = session.store.lock().await;
        assert!(session.selector.restore_last_viewed(&store).is_some());
    }

    #[test]
    fn test_parse_next() {
        assert_eq!(SessionCommand::parse(""), SessionCommand::Next);
        assert_eq!(SessionCommand::parse("  n "), SessionCommand::Next);
        assert_eq!(SessionCommand::parse("NEXT"), SessionCommand::Next);
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            SessionCommand::parse("add Stay hungry. | Motivation"),
            SessionCommand::Add {
                text: "Stay hungry.".to_string(),
                category: "Motivation".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_add_blank_category_reaches_validation() {
        // Blank fields are left for the store to reject
        assert_eq!(
            SessionCommand::parse("add Stay hungry. |"),
            SessionCommand::Add {
                text: "Stay hungry.".to_string(),
                category: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_add_without_separator() {
        assert!(matches!(
            SessionCommand::parse("add Stay hungry."),
            SessionCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(SessionCommand::parse("filter"), SessionCommand::Filter(None));
        assert_eq!(
            SessionCommand::parse("filter Server"),
            SessionCommand::Filter(Some("Server".to_string()))
        );
    }

    #[test]
    fn test_parse_import_export() {
        assert_eq!(
            SessionCommand::parse("import quotes.json"),
            SessionCommand::Import(PathBuf::from("quotes.json"))
        );
        assert!(matches!(
            SessionCommand::parse("import"),
            SessionCommand::Invalid(_)
        ));
        assert_eq!(SessionCommand::parse("export"), SessionCommand::Export(None));
        assert_eq!(
            SessionCommand::parse("export /tmp"),
            SessionCommand::Export(Some(PathBuf::from("/tmp")))
        );
    }

    #[test]
    fn test_parse_unknown() {
        match SessionCommand::parse("dance") {
            SessionCommand::Invalid(hint) => assert!(hint.contains("dance")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(SessionCommand::parse("quit"), SessionCommand::Quit);
        assert_eq!(SessionCommand::parse("q"), SessionCommand::Quit);
        assert_eq!(SessionCommand::parse("exit"), SessionCommand::Quit);
    }
}
