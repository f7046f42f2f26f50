//! Durable key-value storage backing the session.
//!
//! This module provides:
//! - `KeyValueStore`: the storage seam the session store writes through
//! - `FileStore`: a JSON file in the data directory that survives restarts
//! - `MemoryStore`: an in-process store for tests and throwaway sessions
//!
//! Values are whole-string replacements. Batch writes (`set_many`,
//! `remove_many`) let a store persist the `user`/`token` pair in one step.

pub mod file;
pub mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the JSON-serialized user profile.
pub const USER_KEY: &str = "user";

/// Key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "token";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}
