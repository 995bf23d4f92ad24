//! # Key-Value Storage
//!
//! Two tiny string stores back the identity layer:
//!
//! - [`MemoryStore`]: ephemeral, lives exactly as long as the process (one chat session).
//! - [`FileStore`]: durable, a flat JSON object at `~/.chatline/storage.json`.
//!
//! Writes to the file store use atomic rename (write `.tmp`, then `rename()`) so a
//! crash mid-write never leaves a truncated file behind.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, warn};

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Json(e) => write!(f, "storage format error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// A string-to-string store. Reads never fail: an unreadable store is an empty one.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Session-scoped store. Dropped with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Durable store backed by a single JSON object on disk.
///
/// The whole map is re-read on every `get` so that two clients sharing the file
/// see each other's writes; the file is tiny.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(map)?)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} key(s) to {}", map.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_map() {
            Ok(map) => map.get(key).cloned(),
            Err(e) => {
                warn!("Ignoring unreadable store {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map().unwrap_or_default();
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}
