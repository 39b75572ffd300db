//! Volatile session storage

use std::collections::HashMap;

use super::{KeyValueStore, StorageResult};

/// In-memory key-value store
///
/// Everything is dropped with the value, which makes it the session storage
/// of a `run` session. Also handy as a durable stand-in for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("lastViewedIndex").unwrap().is_none());

        storage.set("lastViewedIndex", "2").unwrap();
        storage.set("lastViewedIndex", "0").unwrap();
        assert_eq!(storage.get("lastViewedIndex").unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn test_clones_are_independent() {
        let mut storage = MemoryStorage::new();
        storage.set("selectedCategory", "Server").unwrap();

        let mut copy = storage.clone();
        copy.set("selectedCategory", "all").unwrap();

        assert_eq!(
            storage.get("selectedCategory").unwrap().as_deref(),
            Some("Server")
        );
    }
}
