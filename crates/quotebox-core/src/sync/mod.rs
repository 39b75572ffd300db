//! Server quote sync
//!
//! Periodically pulls quotes from a remote endpoint and merges the ones the
//! store does not have yet.
//!
//! ## Cycle
//!
//! 1. Fetch up to five posts from the server (`title` becomes the quote text,
//!    category `"Server"`)
//! 2. Append every post whose text is not already stored
//! 3. If anything was appended: save, emit a store event, post a notice
//!
//! ## Usage
//!
//! ```ignore
//! let engine = Arc::new(SyncEngine::new(HttpSource::new(url)?, store, notices));
//! let handle = spawn_sync_poller(engine, DEFAULT_SYNC_INTERVAL);
//! ```

mod engine;
mod poller;
mod source;

pub use engine::{reconcile, SyncEngine, SyncOutcome, SyncPhase};
pub use poller::{spawn_sync_poller, SyncCommand, SyncEvent, SyncHandle, DEFAULT_SYNC_INTERVAL};
pub use source::{
    parse_posts, HttpSource, RemoteSource, DEFAULT_SYNC_URL, MAX_REMOTE_QUOTES, SERVER_CATEGORY,
};
