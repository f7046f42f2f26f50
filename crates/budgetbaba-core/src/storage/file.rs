use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::{KeyValueStore, StorageError, StorageResult};

/// Storage file name in the data directory
const STORAGE_FILE: &str = "storage.json";

/// Key-value store persisted as a single JSON object on disk.
///
/// The file is loaded once on open and rewritten in full on every mutation
/// (temp file + rename), so a batch write lands on disk all at once.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    /// A missing file is an empty store; an unparseable one is an error.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORAGE_FILE);

        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "Storage opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `change` to a copy of the entries, persist it, then commit it in memory.
    fn update<F>(&self, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        let mut next = entries.clone();
        change(&mut next);
        if next == *entries {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn set_many(&self, pairs: &[(&str, &str)]) -> StorageResult<()> {
        self.update(|entries| {
            for (key, value) in pairs {
                entries.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        // Nothing written until the first mutation
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store
                .set_many(&[("user", r#"{"id":1}"#), ("token", "abc")])
                .unwrap();
        }

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn test_remove_many_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set_many(&[("user", "u"), ("token", "t")]).unwrap();
        store.remove_many(&["user", "token"]).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("user").unwrap(), None);
        assert_eq!(reopened.get("token").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "not json").unwrap();
        assert!(matches!(
            FileStore::open(dir.path()),
            Err(StorageError::Corrupt(_))
        ));
    }
}
