//! Durable file-backed storage
//!
//! Each key is stored as its own file inside the data directory. Writes are
//! atomic (write to temp file, then rename) so a crash never leaves a value
//! half-written.
//!
//! Storage location: `~/.local/share/quotebox/` (configurable via `Config`)
//!
//! Files:
//! - `quotesData` - JSON array of quotes
//! - `selectedCategory` - the active category filter

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Access, KeyValueStore, StorageError, StorageResult};

/// Key-value store persisted as one file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Check if a value exists for `key`
    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Size in bytes of the value stored under `key`, 0 if absent
    pub fn size_of(&self, key: &str) -> u64 {
        fs::metadata(self.path_for(key))
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_io(e, path, Access::Read)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        debug!("Writing {} bytes to {:?}", value.len(), path);
        atomic_write(&path, value.as_bytes())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| StorageError::from_io(e, temp_path.clone(), Access::Write))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone(), Access::Write))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone(), Access::Write))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
