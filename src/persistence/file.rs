//! JSON file backend
//!
//! The whole store is one small JSON object. Writes go to `<path>.tmp` and are
//! renamed over the real file so a crash never leaves half a file behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ScoreStore, StoreError};

/// File-backed store. Every `get` re-reads the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) if json.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, u64>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);
        self.write_all(&values)?;
        log::debug!("Stored {key}={value} in {}", self.path.display());
        Ok(())
    }
}
