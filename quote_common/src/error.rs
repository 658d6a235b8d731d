//! Error types shared by the store, the sync engine and the client.
//!
//! The `QuoteError` enum follows the failure taxonomy of the application:
//! validation, parsing, network and storage failures. None of them is fatal;
//! callers abort the current operation and surface a notice instead.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by every crate in the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// A required field was empty (or blank) when adding a quote.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An import batch contained no record with a string `text` and `category`.
    #[error("Validation error: no valid records")]
    NoValidRecords,

    /// Malformed JSON on import or in a remote payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Fetch or post to the remote endpoint failed.
    #[error("Network error: {0}")]
    Network(String),

    /// The persistent key-value store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error originating from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}

impl QuoteError {
    /// `true` for the validation class (`Validation` and `NoValidRecords`).
    pub fn is_validation(&self) -> bool {
        matches!(self, QuoteError::Validation(_) | QuoteError::NoValidRecords)
    }
}
