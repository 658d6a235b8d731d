//! Remote reconciliation for the quote list.
//!
//! - `remote` — `RemoteSource` trait and its HTTP implementation.
//! - `engine` — `SyncEngine`, one guarded reconciliation cycle.
//! - `scheduler` — `SyncScheduler`, the timer thread driving the engine.
#![warn(missing_docs)]
pub mod engine;
pub mod remote;
pub mod scheduler;

pub use engine::{SyncEngine, SyncReport};
pub use remote::{HttpRemote, RemoteSource};
pub use scheduler::SyncScheduler;
