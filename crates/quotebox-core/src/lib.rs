//! Quotebox Core Library
//!
//! This crate provides the core functionality for Quotebox, a local-first
//! random quote keeper with categories, import/export and server sync.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = QuoteStore::open(Box::new(FileStorage::new(&config.data_dir)));
//!
//! // Add a quote
//! store.add("Stay hungry.", "Motivation")?;
//!
//! // Show a random one
//! let mut selector = Selector::new(Box::new(FileStorage::new(&config.data_dir)),
//!                                  Box::new(MemoryStorage::new()));
//! let pick = selector.show_random(&store)?;
//! ```
//!
//! # Modules
//!
//! - `store`: The quote list and its durable snapshot (main entry point)
//! - `selector`: Random selection, category filter, last viewed quote
//! - `transfer`: Export and import of quote documents
//! - `sync`: Periodic merge of server quotes
//! - `notice`: Self-clearing notifications
//! - `storage`: Durable and session key-value storage
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod notice;
pub mod selector;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use config::Config;
pub use error::{QuoteError, QuoteResult};
pub use models::{CategoryFilter, Quote, ALL_CATEGORIES};
pub use notice::NoticeBoard;
pub use selector::{list_categories, pick_random, Pick, Selector};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use store::{QuoteStore, StoreEvent};
pub use transfer::{export_all, import_from, ImportReport};
