//! Storage error handling
//!
//! I/O failures are classified by what was being attempted (read or write)
//! and by what went wrong, so the CLI can print a hint for the failures a
//! user can fix.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// What the failing storage call was doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Errors from durable storage and export/import files
#[derive(Error, Debug)]
pub enum StorageError {
    /// The data directory (or an export directory) could not be created
    #[error("Cannot create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied for '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to save '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The finished temp file could not replace the stored value
    #[error("Cannot replace '{to}' with '{from}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify an I/O error raised while accessing `path`
    pub fn from_io(error: io::Error, path: PathBuf, access: Access) -> Self {
        match (error.kind(), access) {
            (io::ErrorKind::PermissionDenied, _) => StorageError::PermissionDenied {
                path,
                source: error,
            },
            (_, Access::Write) if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            (_, Access::Read) => StorageError::ReadError {
                path,
                source: error,
            },
            (_, Access::Write) => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// A hint for failures the user can fix
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => Some(
                "Check file permissions, or point QUOTEBOX_DATA_DIR at a writable directory.",
            ),
            StorageError::CreateDirectory { .. } => {
                Some("Choose another location with `quotebox config set data_dir <path>`.")
            }
            StorageError::ReadError { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                Some("Check that the file path is correct.")
            }
            _ => None,
        }
    }
}

fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("quota exceeded")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
