//! Durable key/value storage for quiz progress.
//!
//! [`KeyValueStore`] is the string-to-string boundary the session writes
//! through to. [`FileStore`] keeps the map in a JSON file so progress
//! survives restarts; [`MemoryStore`] is the throwaway variant.

mod file;
mod progress;

use std::collections::HashMap;
use std::io;

use thiserror::Error;

pub use file::FileStore;
pub use progress::{ProgressStore, StorageKeys, StoredProgress};

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A flat map of string keys to string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Write several keys as one update. Backends that persist per call
    /// override this to persist once.
    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-process store; contents are lost when it is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<(), StorageError> {
        (**self).set_all(entries)
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_all(keys)
    }
}
