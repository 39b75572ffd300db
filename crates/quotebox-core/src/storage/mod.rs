//! Storage layer
//!
//! Quotebox keeps its state in two key-value stores:
//!
//! - **Durable** ([`FileStorage`]): survives restarts. Holds the quote
//!   snapshot and the selected category filter.
//! - **Session** ([`MemoryStorage`]): lives only as long as the running
//!   session. Holds the last viewed quote index.
//!
//! Values are plain strings; callers decide how to encode them.

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{Access, StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use persistence::FileStorage;

/// Key of the persisted quote snapshot (JSON array of `{text, category}`)
pub const QUOTES_KEY: &str = "quotesData";

/// Key of the persisted category filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Session key of the last viewed quote index
pub const LAST_VIEWED_KEY: &str = "lastViewedIndex";

/// A string key-value store
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
