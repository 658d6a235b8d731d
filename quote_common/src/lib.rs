//!
//! Common types and utilities shared by the quote sync daemon and the client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `quote` — the `Quote` record and its boundary checks.
//! - `storage` — persistent and session key-value stores.
//! - `store` — `QuoteStore`, the owned quote list mirrored to storage.
//! - `config` — runtime configuration resolved from CLI flags.
//! - `net` — remote endpoint defaults and sync constants.
#![warn(missing_docs)]
pub mod config;
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod storage;
pub mod store;

pub use error::QuoteError;
pub use quote::Quote;
pub use result::Result;
pub use store::QuoteStore;
