//! Browser LocalStorage backend

use web_sys::Storage;

use super::{ScoreStore, StoreError, parse_value};

/// LocalStorage store. Keys are prefixed so they don't collide with the host page.
pub struct LocalStorageStore {
    prefix: &'static str,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorageStore {
    const PREFIX: &'static str = "roach_stomp_";

    pub fn new() -> Self {
        Self {
            prefix: Self::PREFIX,
        }
    }

    fn storage(&self) -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl ScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let storage = self.storage()?;
        let raw = storage
            .get_item(&self.full_key(key))
            .map_err(|_| StoreError::Unavailable)?;
        raw.map(|value| parse_value(key, &value)).transpose()
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        let storage = self.storage()?;
        storage
            .set_item(&self.full_key(key), &value.to_string())
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("Saved {key}={value} to LocalStorage");
        Ok(())
    }
}
