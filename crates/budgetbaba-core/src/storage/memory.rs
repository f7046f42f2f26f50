use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{KeyValueStore, StorageError, StorageResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn set_many(&self, pairs: &[(&str, &str)]) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for (key, value) in pairs {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token").unwrap(), None);

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        store.set("token", "def").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("def"));

        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        // Removing again is fine
        store.remove("token").unwrap();
    }

    #[test]
    fn test_batch_operations() {
        let store = MemoryStore::new();
        store.set_many(&[("user", "{}"), ("token", "t")]).unwrap();
        assert_eq!(store.len(), 2);

        store.remove_many(&["user", "token"]).unwrap();
        assert!(store.is_empty());
    }
}
