//! Durable key-value storage
//!
//! This module provides the small string key-value surface the application
//! needs to remember client-side choices (for example the selected role)
//! across restarts. [`KvStore`] persists to sled; [`MemoryKvStore`] keeps
//! everything in process.

use parking_lot::RwLock;
use sled::Db;
use std::collections::HashMap;
use std::string::FromUtf8Error;
use std::sync::Arc;
use thiserror::Error;

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Stored bytes are not a UTF-8 string
    #[error("Stored value is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// String key-value storage with `get`/`set` semantics
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`, returning whether it was present
    fn remove(&self, key: &str) -> Result<bool>;
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(KvError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Flush interval in milliseconds (None to flush only on demand)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self { path: "wingman_kv.db".to_string(), flush_every_ms: Some(500) }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Sled-backed key-value store
///
/// Values are stored as their UTF-8 bytes.
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Db>,
}

impl KvStore {
    /// Open a store with configuration
    pub fn new(config: KvConfig) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .flush_every_ms(config.flush_every_ms)
            .open()?;
        tracing::debug!(path = %config.path, "opened key-value store");
        Ok(Self { db: Arc::new(db) })
    }

    /// Create a temporary store that is discarded on drop
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl KeyValueStore for KvStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes.to_vec())?)),
            None => Ok(None),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(key.as_bytes())?.is_some())
    }
}

/// In-process key-value store
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKvStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.values.write().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_string_round_trip() {
        let store = KvStore::in_memory().unwrap();

        store.set_string("selected_role", "flight-instructor").unwrap();
        assert_eq!(
            store.get_string("selected_role").unwrap(),
            Some("flight-instructor".to_string())
        );
        assert_eq!(store.get_string("missing").unwrap(), None);
    }

    #[test]
    fn test_kv_overwrite_and_remove() {
        let store = KvStore::in_memory().unwrap();

        store.set_string("key", "first").unwrap();
        store.set_string("key", "second").unwrap();
        assert_eq!(store.get_string("key").unwrap(), Some("second".to_string()));
        assert!(store.remove("key").unwrap());
        assert!(!store.remove("key").unwrap());
        assert_eq!(store.get_string("key").unwrap(), None);
    }

    #[test]
    fn test_kv_rejects_non_utf8_value() {
        let store = KvStore::in_memory().unwrap();
        store.db.insert("broken", vec![0xff, 0xfe]).unwrap();

        assert!(matches!(store.get_string("broken"), Err(KvError::Encoding(_))));
    }

    #[test]
    fn test_kv_rejects_empty_key() {
        let store = KvStore::in_memory().unwrap();
        assert!(matches!(store.set_string("", "x"), Err(KvError::InvalidKey(_))));

        let memory = MemoryKvStore::new();
        assert!(matches!(memory.set_string("", "x"), Err(KvError::InvalidKey(_))));
    }

    #[test]
    fn test_kv_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv").to_string_lossy().to_string();

        {
            let store = KvStore::new(KvConfig::new(&path).flush_every_ms(None)).unwrap();
            store.set_string("selected_role", "mechanic").unwrap();
            store.flush().unwrap();
        }

        let store = KvStore::new(KvConfig::new(&path)).unwrap();
        assert_eq!(store.get_string("selected_role").unwrap(), Some("mechanic".to_string()));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKvStore::new();
        assert!(store.is_empty());

        store.set_string("a", "1").unwrap();
        store.set_string("a", "2").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_string("a").unwrap(), Some("2".to_string()));
        assert!(store.remove("a").unwrap());
        assert!(store.is_empty());
    }
}
