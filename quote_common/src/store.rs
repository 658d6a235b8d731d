//! In-memory quote list mirrored to the persistent key-value store.
//!
//! `QuoteStore` owns the ordered list of quotes for the session. Every
//! successful mutation overwrites the persisted copy in full. Persistence is
//! best-effort: a failed write leaves the in-memory list authoritative and is
//! reported back to the caller as [`WriteStatus::MemoryOnly`].
//!
//! Several processes may share one data directory (the client shell and the
//! sync daemon). Each mutation first re-reads the persisted list so that it
//! builds on the latest saved state instead of overwriting it with a stale
//! copy. While the store holds changes that failed to persist it skips that
//! re-read, since the in-memory list is then the only copy of them.
//!
//! Mutation points:
//! - [`QuoteStore::add`] — user entry, validated and trimmed.
//! - [`QuoteStore::import_batch`] — untyped records from a snapshot file.
//! - [`QuoteStore::merge_remote`] — reconciliation against a fetched batch.

use log::{debug, info, warn};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::QuoteError;
use crate::quote::{ALL_CATEGORIES, Quote, default_quotes};
use crate::result::Result;
use crate::storage::{KeyValueStore, StorageKey};

/// Outcome of mirroring the list to persistent storage.
#[derive(Debug)]
pub enum WriteStatus {
    /// The persisted copy now equals the in-memory list.
    Persisted,
    /// The write failed; only the in-memory list holds the change.
    MemoryOnly(QuoteError),
}

impl WriteStatus {
    /// `true` when the write reached persistent storage.
    pub fn is_persisted(&self) -> bool {
        matches!(self, WriteStatus::Persisted)
    }
}

impl From<Result<()>> for WriteStatus {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => WriteStatus::Persisted,
            Err(e) => {
                warn!("Quote list kept in memory only: {}", e);
                WriteStatus::MemoryOnly(e)
            }
        }
    }
}

/// Result of [`QuoteStore::import_batch`].
#[derive(Debug)]
pub struct ImportReport {
    /// Records appended to the list.
    pub accepted: usize,
    /// Records dropped at the boundary.
    pub rejected: usize,
    /// Persistence outcome.
    pub write: WriteStatus,
}

/// Result of [`QuoteStore::merge_remote`].
#[derive(Debug)]
pub struct MergeReport {
    /// Local records whose category was overwritten by the remote one.
    pub conflicts_resolved: usize,
    /// Remote records appended because their text was unknown locally.
    pub new_records: usize,
    /// Persistence outcome, `None` when nothing changed and nothing was written.
    pub write: Option<WriteStatus>,
}

impl MergeReport {
    /// `true` when the merge modified the list.
    pub fn changed(&self) -> bool {
        self.conflicts_resolved > 0 || self.new_records > 0
    }
}

/// Owned, ordered list of quotes with explicit load/persist boundaries.
pub struct QuoteStore {
    quotes: Vec<Quote>,
    storage: Arc<dyn KeyValueStore>,
    unsaved: bool,
}

impl QuoteStore {
    /// Seed the store from persistent storage.
    ///
    /// Fails open: when the key is absent, unreadable or malformed, the
    /// built-in default list is used and written back.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        match Self::read_persisted(storage.as_ref()) {
            Ok(Some(quotes)) => {
                info!("Loaded {} quotes from storage", quotes.len());
                Self {
                    quotes,
                    storage,
                    unsaved: false,
                }
            }
            Ok(None) => {
                info!("No stored quotes, seeding defaults");
                Self::seeded(storage)
            }
            Err(e) => {
                warn!("Stored quotes unusable ({}), seeding defaults", e);
                Self::seeded(storage)
            }
        }
    }

    /// An empty store that has not touched storage yet.
    pub fn empty(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            quotes: Vec::new(),
            storage,
            unsaved: false,
        }
    }

    fn seeded(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            quotes: default_quotes(),
            storage,
            unsaved: false,
        };
        let _ = store.write_back();
        store
    }

    fn read_persisted(storage: &dyn KeyValueStore) -> Result<Option<Vec<Quote>>> {
        let Some(raw) = storage.get(StorageKey::Quotes)? else {
            return Ok(None);
        };
        let quotes: Vec<Quote> =
            serde_json::from_str(&raw).map_err(|e| QuoteError::Parse(e.to_string()))?;
        if quotes.iter().any(|q| !q.is_valid()) {
            return Err(QuoteError::Parse(
                "stored list contains blank fields".to_string(),
            ));
        }
        Ok(Some(quotes))
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Unlike [`QuoteStore::load`] this does not fall back: on any error the
    /// current list is kept and the error returned.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(quotes) = Self::read_persisted(self.storage.as_ref())? {
            debug!("Reloaded {} quotes from storage", quotes.len());
            self.quotes = quotes;
            self.unsaved = false;
        }
        Ok(())
    }

    /// Pick up writes other processes made since the last read.
    fn refresh(&mut self) {
        if self.unsaved {
            debug!("Unsaved changes in memory, not reloading");
            return;
        }
        if let Err(e) = self.reload() {
            warn!("Keeping in-memory list, reload failed: {}", e);
        }
    }

    /// Serialize the full list into the persistent store.
    pub fn persist(&self) -> Result<()> {
        let body = serde_json::to_string(&self.quotes)?;
        self.storage.set(StorageKey::Quotes, &body)
    }

    fn write_back(&mut self) -> WriteStatus {
        let status = WriteStatus::from(self.persist());
        self.unsaved = !status.is_persisted();
        status
    }

    /// Shared handle to the persistent store this list mirrors to.
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.storage)
    }

    /// Validate, append and persist a user-entered quote.
    pub fn add(&mut self, text: &str, category: &str) -> Result<(Quote, WriteStatus)> {
        let quote = Quote::new(text, category)?;
        self.refresh();
        self.quotes.push(quote.clone());
        info!("Quote added in category {}", quote.category);
        Ok((quote, self.write_back()))
    }

    /// Every stored quote in order.
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quotes of one category; `"all"` returns every quote.
    pub fn by_category(&self, name: &str) -> Vec<&Quote> {
        if name == ALL_CATEGORIES {
            return self.quotes.iter().collect();
        }
        self.quotes.iter().filter(|q| q.category == name).collect()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.quotes
            .iter()
            .map(|q| q.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Number of stored quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// `true` when no quote is stored.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Append the well-formed subset of `records`, preserving order.
    ///
    /// Returns [`QuoteError::NoValidRecords`] without touching the list when
    /// nothing survives the boundary check.
    pub fn import_batch(&mut self, records: &[Value]) -> Result<ImportReport> {
        let accepted: Vec<Quote> = records.iter().filter_map(Quote::from_value).collect();
        if accepted.is_empty() {
            return Err(QuoteError::NoValidRecords);
        }
        let rejected = records.len() - accepted.len();
        if rejected > 0 {
            warn!("Import skipped {} malformed records", rejected);
        }
        let count = accepted.len();
        self.refresh();
        self.quotes.extend(accepted);
        info!("Imported {} quotes", count);
        Ok(ImportReport {
            accepted: count,
            rejected,
            write: self.write_back(),
        })
    }

    /// Reconcile a fetched batch into the list.
    ///
    /// Local records whose text appears in the batch take the fetched
    /// category in place. Fetched records with an unknown text are appended
    /// in order of first appearance, once per text. When the batch repeats a
    /// text, its last occurrence supplies the category in both cases. The
    /// list is persisted only when something changed.
    pub fn merge_remote(&mut self, batch: &[Quote]) -> MergeReport {
        self.refresh();

        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &Quote> = HashMap::new();
        for remote in batch {
            if latest.insert(remote.text.as_str(), remote).is_none() {
                order.push(remote.text.as_str());
            }
        }

        let mut conflicts_resolved = 0;
        for local in self.quotes.iter_mut() {
            if let Some(remote) = latest.get(local.text.as_str()) {
                if local.category != remote.category {
                    local.category = remote.category.clone();
                    conflicts_resolved += 1;
                }
            }
        }

        let known: HashSet<&str> = self.quotes.iter().map(|q| q.text.as_str()).collect();
        let fresh: Vec<Quote> = order
            .into_iter()
            .filter(|text| !known.contains(text))
            .filter_map(|text| latest.get(text).map(|q| (*q).clone()))
            .collect();
        let new_records = fresh.len();
        self.quotes.extend(fresh);

        let mut report = MergeReport {
            conflicts_resolved,
            new_records,
            write: None,
        };
        if report.changed() {
            debug!(
                "Merge changed list: {} conflicts, {} new",
                conflicts_resolved, new_records
            );
            report.write = Some(self.write_back());
        }
        report
    }
}
