//! Key-value storage backends.
//!
//! Two scopes are used by the application:
//! - persistent (`FileStore`) survives across sessions, one file per key in the data dir;
//! - session (`MemoryStore`) lives as long as the process.
//!
//! Both implement `KeyValueStore` so the quote store and the view can be tested
//! against in-memory doubles.

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use strum_macros::{AsRefStr, Display, EnumString};
use tempfile::NamedTempFile;

use crate::error::QuoteError;

/// Well-known keys. The string form is the file name on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum StorageKey {
    /// JSON-encoded quote list (persistent).
    #[strum(serialize = "quotes")]
    Quotes,
    /// Last category chosen in the filter (persistent).
    #[strum(serialize = "selectedCategory")]
    SelectedCategory,
    /// UTC millis of the last completed sync cycle (persistent).
    #[strum(serialize = "lastSync")]
    LastSync,
    /// Indices of the records shown last (session).
    #[strum(serialize = "lastViewedQuote")]
    LastViewedQuote,
}

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: StorageKey) -> Result<Option<String>, QuoteError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), QuoteError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn remove(&self, key: StorageKey) -> Result<(), QuoteError>;
}

/// Persistent store keeping one file per key inside the data directory.
///
/// Files are re-read on every access so that several processes sharing a
/// data directory observe each other's writes. A write goes to a uniquely
/// named temp file that is then renamed over the key's file, so writers of
/// different keys never touch each other's data.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (or lazily create) the store inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, QuoteError> {
        fs::create_dir_all(data_dir).map_err(|e| {
            QuoteError::Storage(format!("cannot create {}: {}", data_dir.display(), e))
        })?;
        Ok(Self {
            dir: data_dir.to_path_buf(),
        })
    }

    /// Location of the file backing `key`.
    pub fn path_of(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.as_ref())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, QuoteError> {
        let path = self.path_of(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuoteError::Storage(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), QuoteError> {
        let path = self.path_of(key);
        let storage_err = |e: io::Error| {
            QuoteError::Storage(format!("cannot write {}: {}", path.display(), e))
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(storage_err)?;
        tmp.write_all(value.as_bytes()).map_err(storage_err)?;
        tmp.persist(&path).map_err(|e| storage_err(e.error))?;
        debug!("Persistent key {} written", key);
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), QuoteError> {
        let path = self.path_of(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuoteError::Storage(format!(
                "cannot remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Process-local store. Used for the session scope and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, QuoteError> {
        Ok(self.entries.lock()?.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), QuoteError> {
        self.entries.lock()?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), QuoteError> {
        self.entries.lock()?.remove(&key);
        Ok(())
    }
}
