//! Quote store
//!
//! The `QuoteStore` owns the ordered list of quotes and its durable snapshot.
//!
//! ## Lifecycle
//!
//! A store starts with the three built-in quotes. [`QuoteStore::open`] then
//! loads the persisted snapshot (if there is a usable one) and replaces the
//! defaults with it. Every mutation saves the full list back under
//! [`QUOTES_KEY`].
//!
//! ## Change events
//!
//! Mutations are announced on a broadcast channel instead of touching any
//! display directly. Displays call [`QuoteStore::subscribe`] and re-render on
//! each [`StoreEvent`].
//!
//! ```ignore
//! let mut store = QuoteStore::open(Box::new(FileStorage::new(dir)));
//! let mut events = store.subscribe();
//!
//! store.add("Stay hungry.", "Motivation")?;
//! assert!(matches!(events.try_recv(), Ok(StoreEvent::Added { .. })));
//! ```

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{QuoteError, QuoteResult};
use crate::models::{default_quotes, Quote};
use crate::storage::{KeyValueStore, QUOTES_KEY};

/// Capacity of the change event channel
const EVENT_CAPACITY: usize = 64;

/// Announcement of a store mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The persisted snapshot replaced the in-memory list
    Loaded { count: usize },
    /// A single quote was added by the user
    Added {
        quote: Quote,
        /// Set when the quote introduced a category not seen before
        new_category: Option<String>,
    },
    /// Quotes were appended from an import document
    Imported {
        added: usize,
        new_categories: Vec<String>,
    },
    /// Quotes were appended from the remote server
    Synced {
        added: usize,
        new_categories: Vec<String>,
    },
}

/// Ordered, persisted collection of quotes
pub struct QuoteStore {
    quotes: Vec<Quote>,
    storage: Box<dyn KeyValueStore>,
    events: broadcast::Sender<StoreEvent>,
}

impl QuoteStore {
    /// Create a store holding only the built-in quotes
    ///
    /// Nothing is read from `storage` until [`QuoteStore::load`] is called.
    pub fn with_defaults(storage: Box<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            quotes: default_quotes(),
            storage,
            events,
        }
    }

    /// Create a store and load the persisted snapshot
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self::with_defaults(storage);
        store.load();
        store
    }

    /// Load the persisted snapshot
    ///
    /// If the snapshot is missing, unreadable or not a JSON array, the
    /// current list is left untouched. Otherwise the list is replaced with
    /// the valid elements of the snapshot; invalid elements are dropped.
    ///
    /// Never fails. Returns `true` if the snapshot was applied.
    pub fn load(&mut self) -> bool {
        let raw = match self.storage.get(QUOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted quotes, keeping defaults");
                return false;
            }
            Err(e) => {
                warn!("Failed to read persisted quotes: {}", e);
                return false;
            }
        };

        let quotes = match parse_snapshot(&raw) {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("Ignoring persisted quotes: {}", e);
                return false;
            }
        };

        info!("Loaded {} persisted quote(s)", quotes.len());
        self.quotes = quotes;
        self.emit(StoreEvent::Loaded {
            count: self.quotes.len(),
        });
        true
    }

    /// Save the full list under [`QUOTES_KEY`]
    ///
    /// Failures are logged, not returned.
    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            warn!("Failed to save quotes: {}", e);
        }
    }

    /// Save the full list, returning any failure
    pub fn try_save(&mut self) -> QuoteResult<()> {
        let json = serde_json::to_string(&self.quotes)?;
        self.storage.set(QUOTES_KEY, &json)?;
        debug!("Saved {} quote(s)", self.quotes.len());
        Ok(())
    }

    /// Add a quote typed by the user
    ///
    /// Both fields are trimmed and must be non-empty. On success the store
    /// is saved and an [`StoreEvent::Added`] event is emitted.
    pub fn add(&mut self, text: &str, category: &str) -> QuoteResult<Quote> {
        let quote = Quote::new(text, category)?;

        let new_category = self.append(quote.clone());
        self.save();

        self.emit(StoreEvent::Added {
            quote: quote.clone(),
            new_category,
        });
        Ok(quote)
    }

    /// All quotes in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quote at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&Quote> {
        self.quotes.get(index)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Check the de-duplication predicate against every stored quote
    pub fn contains_text(&self, text: &str) -> bool {
        self.quotes.iter().any(|q| q.text == text)
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for quote in &self.quotes {
            if !categories.contains(&quote.category) {
                categories.push(quote.category.clone());
            }
        }
        categories
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Append a validated quote without saving
    ///
    /// Returns the quote's category if the store did not have it yet.
    pub(crate) fn append(&mut self, quote: Quote) -> Option<String> {
        let is_new = !self.quotes.iter().any(|q| q.category == quote.category);
        let category = is_new.then(|| quote.category.clone());
        self.quotes.push(quote);
        category
    }

    /// Broadcast a change event; having no subscribers is fine
    pub(crate) fn emit(&self, event: StoreEvent) {
        let _ = self.events.send(event);
    }
}

/// Parse a stored snapshot into its valid quotes
///
/// Fails with [`QuoteError::Format`] unless the top level is a JSON array.
pub(crate) fn parse_snapshot(raw: &str) -> QuoteResult<Vec<Quote>> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = value else {
        return Err(QuoteError::Format("expected a JSON array".to_string()));
    };

    Ok(items.iter().filter_map(Quote::from_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn memory_store() -> QuoteStore {
        QuoteStore::open(Box::new(MemoryStorage::new()))
    }

    fn store_with_snapshot(snapshot: &str) -> QuoteStore {
        let mut storage = MemoryStorage::new();
        storage.set(QUOTES_KEY, snapshot).unwrap();
        QuoteStore::open(Box::new(storage))
    }

    #[test]
    fn test_open_without_snapshot_keeps_defaults() {
        let store = memory_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.quotes(), default_quotes().as_slice());
    }

    #[test]
    fn test_add_appends_and_saves() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let mut store = QuoteStore::open(Box::new(storage.clone()));

        store.add("Stay hungry.", "Motivation").unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.quotes()[3].text, "Stay hungry.");

        let saved = storage.get(QUOTES_KEY).unwrap().unwrap();
        assert!(saved.contains("Stay hungry."));
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut store = memory_store();

        assert!(matches!(
            store.add("  ", "Motivation"),
            Err(QuoteError::Validation { .. })
        ));
        assert!(matches!(
            store.add("Stay hungry.", "\t"),
            Err(QuoteError::Validation { .. })
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_allows_duplicate_text() {
        let mut store = memory_store();
        let text = default_quotes()[0].text.clone();

        store.add(&text, "Motivation").unwrap();
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let mut store = memory_store();
        store.add("Stay hungry.", "Motivation").unwrap();
        store.add("Ship it.", "Work").unwrap();

        assert_eq!(
            store.categories(),
            vec!["Motivation", "Technology", "Inspiration", "Work"]
        );
    }

    #[test]
    fn test_add_emits_event_with_new_category() {
        let mut store = memory_store();
        let mut events = store.subscribe();

        store.add("Stay hungry.", "Motivation").unwrap();
        store.add("Ship it.", "Work").unwrap();

        match events.try_recv().unwrap() {
            StoreEvent::Added { new_category, .. } => assert!(new_category.is_none()),
            other => panic!("unexpected event: {:?}", other),
        }
        match events.try_recv().unwrap() {
            StoreEvent::Added { new_category, .. } => {
                assert_eq!(new_category.as_deref(), Some("Work"))
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_load_replaces_with_valid_subset() {
        let store = store_with_snapshot(
            r#"[
                {"text": "Kept", "category": "A"},
                {"text": "No category"},
                {"text": 42, "category": "B"},
                {"text": "Also kept", "category": "B"}
            ]"#,
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.quotes()[0].text, "Kept");
        assert_eq!(store.quotes()[1].text, "Also kept");
    }

    #[test]
    fn test_load_object_snapshot_keeps_defaults() {
        let store = store_with_snapshot(r#"{"text": "not", "category": "an array"}"#);
        assert_eq!(store.quotes(), default_quotes().as_slice());
    }

    #[test]
    fn test_load_garbage_snapshot_keeps_defaults() {
        let store = store_with_snapshot("this is not json");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_load_empty_array_empties_store() {
        let store = store_with_snapshot("[]");
        assert!(store.is_empty());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = QuoteStore::open(Box::new(FileStorage::new(temp_dir.path())));
            store.add("Persistent quote", "Memory").unwrap();
        }

        let store = QuoteStore::open(Box::new(FileStorage::new(temp_dir.path())));
        assert_eq!(store.len(), 4);
        assert!(store.contains_text("Persistent quote"));
    }

    #[test]
    fn test_contains_text_is_exact() {
        let store = memory_store();
        assert!(store.contains_text("JavaScript is the language of the web."));
        assert!(!store.contains_text("javascript is the language of the web."));
    }
}
