//! Sync command handler

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::Mutex;

use quotebox_core::sync::{HttpSource, SyncEngine, SyncOutcome};
use quotebox_core::{Config, NoticeBoard, QuoteStore};

use crate::output::{Output, OutputFormat};

/// Run one sync cycle against the configured server
pub async fn sync(store: QuoteStore, config: &Config, output: &Output) -> Result<()> {
    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotebox config set sync_enabled true"
        );
    }

    let Some(ref sync_url) = config.sync_url else {
        bail!(
            "Sync URL not configured. Set it with:\n  \
             quotebox config set sync_url https://your-server/posts"
        );
    };

    output.message(&format!("Fetching quotes from {}...", sync_url));

    let source = HttpSource::new(sync_url.as_str()).context("Failed to create HTTP client")?;
    let notices = NoticeBoard::new(config.notice_ttl());
    let engine = SyncEngine::new(source, Arc::new(Mutex::new(store)), notices.clone());

    let outcome = engine.run_cycle().await;
    print_outcome(&outcome, output);
    if let Some(notice) = notices.current() {
        output.notice(&notice);
    }

    Ok(())
}

fn print_outcome(outcome: &SyncOutcome, output: &Output) {
    match (output.format, outcome) {
        (OutputFormat::Json, SyncOutcome::Completed { fetched, added }) => {
            println!(
                "{}",
                serde_json::json!({"fetched": fetched, "added": added})
            );
        }
        (OutputFormat::Json, SyncOutcome::Skipped) => {
            println!("{}", serde_json::json!({"skipped": true}));
        }
        (OutputFormat::Quiet, _) => println!("{}", outcome.added()),
        (OutputFormat::Human, SyncOutcome::Completed { fetched: 0, .. }) => {
            output.message("Nothing fetched from server.");
        }
        (OutputFormat::Human, SyncOutcome::Completed { added: 0, .. }) => {
            output.success("Sync complete - already up to date");
        }
        (OutputFormat::Human, SyncOutcome::Completed { .. }) => {
            output.success("Sync complete");
        }
        (OutputFormat::Human, SyncOutcome::Skipped) => {
            output.message("A sync is already running.");
        }
    }
}
