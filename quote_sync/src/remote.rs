//! Remote quote source.
//!
//! The read endpoint returns a JSON list of items carrying at least a `title`
//! field. Only the first `limit` items are consumed, each mapped to
//! `{text: title, category: "Server"}`. The write endpoint accepts a single
//! quote as a JSON body; its response is only logged.

use log::{debug, info};
use quote_common::config::Config;
use quote_common::net::SERVER_CATEGORY;
use quote_common::{Quote, QuoteError, Result};
use reqwest::blocking::Client;
use serde_json::Value;

/// Anything that can hand out a batch of remote quotes and accept new ones.
pub trait RemoteSource: Send + Sync {
    /// Fetch at most `limit` records. Any failure aborts the whole batch.
    fn fetch_batch(&self, limit: usize) -> Result<Vec<Quote>>;

    /// Send one quote to the write endpoint.
    fn post_quote(&self, quote: &Quote) -> Result<()>;
}

/// Decode a read-endpoint payload into quotes.
///
/// The payload must be a JSON array; anything else is a `Parse` error. Items
/// past `limit` are ignored, items without a non-blank string `title` are
/// dropped.
pub fn parse_remote_batch(body: &[u8], limit: usize) -> Result<Vec<Quote>> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| QuoteError::Parse(e.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| QuoteError::Parse("remote payload is not a list".to_string()))?;

    let quotes: Vec<Quote> = items
        .iter()
        .take(limit)
        .filter_map(|item| item.get("title").and_then(Value::as_str))
        .filter(|title| !title.trim().is_empty())
        .map(|title| Quote {
            text: title.to_string(),
            category: SERVER_CATEGORY.to_string(),
        })
        .collect();

    let dropped = items.len().min(limit) - quotes.len();
    if dropped > 0 {
        debug!("Dropped {} remote items without a usable title", dropped);
    }
    Ok(quotes)
}

/// HTTP implementation over a blocking `reqwest` client.
pub struct HttpRemote {
    client: Client,
    read_url: String,
    write_url: String,
}

impl HttpRemote {
    /// Build a client for the endpoints in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| QuoteError::Network(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            read_url: config.read_url.clone(),
            write_url: config.write_url.clone(),
        })
    }
}

impl RemoteSource for HttpRemote {
    fn fetch_batch(&self, limit: usize) -> Result<Vec<Quote>> {
        debug!("Fetching remote quotes from {}", self.read_url);
        let response = self
            .client
            .get(&self.read_url)
            .send()
            .map_err(|e| QuoteError::Network(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Network(format!(
                "{} answered {}",
                self.read_url, status
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| QuoteError::Network(format!("cannot read body: {}", e)))?;
        parse_remote_batch(&body, limit)
    }

    fn post_quote(&self, quote: &Quote) -> Result<()> {
        let response = self
            .client
            .post(&self.write_url)
            .json(quote)
            .send()
            .map_err(|e| QuoteError::Network(format!("POST failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Network(format!(
                "{} answered {}",
                self.write_url, status
            )));
        }
        let echoed: Value = response.json().unwrap_or(Value::Null);
        info!("Quote posted to server: {}", echoed);
        Ok(())
    }
}
