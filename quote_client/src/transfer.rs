//! Snapshot export and import.
//!
//! A snapshot is the pretty-printed JSON array of every quote, the same shape
//! the persistent store uses. Import accepts any JSON array and hands the
//! untyped items to `QuoteStore::import_batch`, which drops malformed records.

use log::info;
use quote_common::store::ImportReport;
use quote_common::{QuoteError, QuoteStore, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name of an export.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// File-based transfer of the quote list.
pub struct TransferGateway;

impl TransferGateway {
    /// Serialize the whole list. Pure: the store is not touched.
    pub fn export_snapshot(store: &QuoteStore) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(store.all())?)
    }

    /// Write a snapshot to `target`. A directory target receives `quotes.json`.
    pub fn export_to_file(store: &QuoteStore, target: &Path) -> Result<PathBuf> {
        let path = if target.is_dir() {
            target.join(EXPORT_FILE_NAME)
        } else {
            target.to_path_buf()
        };
        let bytes = Self::export_snapshot(store)?;
        fs::write(&path, bytes)
            .map_err(|e| QuoteError::Storage(format!("cannot write {}: {}", path.display(), e)))?;
        info!("Exported {} quotes to {}", store.len(), path.display());
        Ok(path)
    }

    /// Parse snapshot bytes into untyped records.
    ///
    /// Fails with `QuoteError::Parse` on invalid JSON or a non-array top level.
    pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<Value>> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(_) => Err(QuoteError::Parse("snapshot is not a list".to_string())),
            Err(e) => Err(QuoteError::Parse(e.to_string())),
        }
    }

    /// Import snapshot bytes into `store`. Nothing is mutated on error.
    pub fn import_snapshot(store: &mut QuoteStore, bytes: &[u8]) -> Result<ImportReport> {
        let records = Self::decode_snapshot(bytes)?;
        store.import_batch(&records)
    }

    /// Read and import a snapshot file.
    pub fn import_from_file(store: &mut QuoteStore, path: &Path) -> Result<ImportReport> {
        let bytes = fs::read(path)
            .map_err(|e| QuoteError::Storage(format!("cannot read {}: {}", path.display(), e)))?;
        Self::import_snapshot(store, &bytes)
    }
}
