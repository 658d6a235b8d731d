//! Runtime configuration shared by both binaries.
//!
//! Values come from command-line flags; anything left unset falls back to
//! the constants in [`crate::net`]. Environment fallbacks such as
//! `QUOTES_DATA_DIR` are resolved by the argument parsers before they get here.

use std::path::PathBuf;
use std::time::Duration;

use crate::net::{
    DEFAULT_READ_URL, DEFAULT_WRITE_URL, FETCH_LIMIT, REQUEST_TIMEOUT_SECS, SYNC_INTERVAL_SECS,
    secs,
};

/// Data directory used when neither flag nor environment sets one.
pub const DEFAULT_DATA_DIR: &str = ".quotes";

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persistent store and default exports.
    pub data_dir: PathBuf,
    /// Remote read endpoint.
    pub read_url: String,
    /// Remote write endpoint.
    pub write_url: String,
    /// Interval between scheduled sync cycles.
    pub sync_interval: Duration,
    /// Remote items consumed per cycle.
    pub fetch_limit: usize,
    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            read_url: DEFAULT_READ_URL.to_string(),
            write_url: DEFAULT_WRITE_URL.to_string(),
            sync_interval: secs(SYNC_INTERVAL_SECS),
            fetch_limit: FETCH_LIMIT,
            request_timeout: secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Override the data directory if one was given.
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    /// Override the remote endpoints if given.
    pub fn with_urls(mut self, read_url: Option<String>, write_url: Option<String>) -> Self {
        if let Some(url) = read_url {
            self.read_url = url;
        }
        if let Some(url) = write_url {
            self.write_url = url;
        }
        self
    }

    /// Override sync cadence and batch size if given.
    pub fn with_sync(mut self, interval_secs: Option<u64>, fetch_limit: Option<usize>) -> Self {
        if let Some(interval) = interval_secs {
            self.sync_interval = secs(interval);
        }
        if let Some(limit) = fetch_limit {
            self.fetch_limit = limit;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_constants() {
        let config = Config::default().with_data_dir(None);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.sync_interval, Duration::from_secs(SYNC_INTERVAL_SECS));
        assert_eq!(config.request_timeout, Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn overrides_apply_only_when_set() {
        let config = Config::default()
            .with_data_dir(Some(PathBuf::from("/tmp/q")))
            .with_urls(None, Some("http://localhost/w".to_string()))
            .with_sync(Some(0), None);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/q"));
        assert_eq!(config.read_url, DEFAULT_READ_URL);
        assert_eq!(config.write_url, "http://localhost/w");
        assert_eq!(config.sync_interval, Duration::from_secs(1));
        assert_eq!(config.fetch_limit, FETCH_LIMIT);
    }
}
