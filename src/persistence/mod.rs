//! Best-score persistence
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and throwaway sessions
//! - `JsonFileStore`: JSON map on disk, written tmp → rename (native)
//! - `ThreadedStore`: moves writes of any store onto a background thread (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;

use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
mod threaded;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
#[cfg(not(target_arch = "wasm32"))]
pub use threaded::ThreadedStore;

/// Storage failures. Callers log these; they never stop the game.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("stored value for {key:?} is not an integer: {value:?}")]
    NotAnInteger { key: String, value: String },
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("background writer has shut down")]
    WriterClosed,
}

/// Key-value store for small integers
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError>;
    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError>;
}

/// Non-durable store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Parse a stored string value as an integer
pub fn parse_value(key: &str, value: &str) -> Result<u64, StoreError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| StoreError::NotAnInteger {
            key: key.to_string(),
            value: value.to_string(),
        })
}
