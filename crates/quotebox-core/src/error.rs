//! Error types for quote operations

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by store, selector, import and sync operations
#[derive(Error, Debug)]
pub enum QuoteError {
    /// A field was empty after trimming, or used a reserved value
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    /// Nothing to pick from
    #[error("No quotes found")]
    EmptyPool,

    /// Import document or stored snapshot has the wrong shape
    #[error("Invalid quotes document: {0}")]
    Format(String),

    /// Remote fetch failed
    #[error("Failed to reach quote server: {0}")]
    Transport(String),

    /// Durable or session storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::Format(e.to_string())
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        QuoteError::Transport(e.to_string())
    }
}

impl QuoteError {
    /// A hint for errors the user can fix, if there is one
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            QuoteError::Storage(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Result type for quote operations
pub type QuoteResult<T> = Result<T, QuoteError>;
