//! Remote endpoint defaults and sync constants shared by the daemon and client.

use std::time::Duration;

/// Read endpoint returning a JSON list of items with a `title` field.
pub const DEFAULT_READ_URL: &str = "https://jsonplaceholder.typicode.com/posts";
/// Write endpoint accepting one quote as a JSON body.
pub const DEFAULT_WRITE_URL: &str = "https://jsonplaceholder.typicode.com/posts";
/// Maximum number of remote items consumed per cycle.
pub const FETCH_LIMIT: usize = 5;
/// Category given to every record that comes from the remote source.
pub const SERVER_CATEGORY: &str = "Server";
/// Seconds between two scheduled sync cycles.
pub const SYNC_INTERVAL_SECS: u64 = 30;
/// Per-request HTTP timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Helper to build a `Duration` from whole seconds, clamped to at least one.
pub fn secs(value: u64) -> Duration {
    Duration::from_secs(value.max(1))
}
