//! In-memory progress storage for testing.
//!
//! This module provides a thread-safe in-memory implementation of the
//! StateStore trait, primarily for use in unit tests.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::storage::StateStore;

/// In-memory state store for testing.
///
/// Thread-safe implementation using `RwLock<HashMap>`.
/// Values are stored in memory and lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    /// Key-value storage.
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStateStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Clear all entries from the store.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_state_store_contract;

    #[test]
    fn test_memory_store_contract() {
        let store = MemoryStateStore::new();
        test_state_store_contract(&store);
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStateStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_len_tracks_inserts() {
        let store = MemoryStateStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.len(), 2);

        // Overwriting doesn't add a key
        store.set("a", "3").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStateStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_default_trait() {
        let store = MemoryStateStore::default();
        assert!(store.is_empty());
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryStateStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store_clone = Arc::clone(&store);
            let handle = thread::spawn(move || {
                let key = format!("k{}", i);
                store_clone.set(&key, "v").unwrap();
                store_clone.get(&key).unwrap();
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 10);
    }
}
