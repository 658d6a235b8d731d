//! Local/remote reconciliation.
//!
//! `SyncEngine::reconcile` runs one cycle:
//! 1. fetch a bounded batch from the remote source (outside the store lock);
//! 2. merge it into the shared `QuoteStore` (which first re-reads the saved
//!    list): remote category wins for known texts, unknown texts are appended
//!    in fetch order;
//! 3. persist when something changed;
//! 4. stamp the last-sync marker.
//!
//! A fetch failure aborts the cycle before the store is touched. Running the
//! cycle twice against the same payload is idempotent: the second run reports
//! [`SyncReport::NoChange`].
//!
//! Only one cycle may be in flight at a time. A call that arrives while
//! another one is running returns [`SyncReport::Skipped`] immediately.

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use quote_common::storage::{KeyValueStore, StorageKey};
use quote_common::{Quote, QuoteStore, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::remote::RemoteSource;

/// What a sync cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReport {
    /// The fetched batch matched the local list.
    NoChange,
    /// The local list was modified.
    Changed {
        /// Local records whose category was overwritten.
        conflicts_resolved: usize,
        /// Remote records appended.
        new_records: usize,
        /// `false` when the change could not be written to storage.
        persisted: bool,
    },
    /// Another cycle was still in flight.
    Skipped,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncReport::NoChange => write!(f, "Quotes are up to date with the server."),
            SyncReport::Skipped => write!(f, "A sync is already running."),
            SyncReport::Changed {
                conflicts_resolved,
                new_records,
                persisted,
            } => {
                write!(f, "Quotes synced with server:")?;
                if *conflicts_resolved > 0 {
                    write!(f, " {} conflict(s) resolved (server wins)", conflicts_resolved)?;
                }
                if *conflicts_resolved > 0 && *new_records > 0 {
                    write!(f, ",")?;
                }
                if *new_records > 0 {
                    write!(f, " {} new quote(s)", new_records)?;
                }
                if !persisted {
                    write!(f, " (not saved to storage)")?;
                }
                Ok(())
            }
        }
    }
}

/// Clears the in-flight flag when the cycle ends, including on early return.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Reconciles a shared `QuoteStore` against a `RemoteSource`.
pub struct SyncEngine {
    remote: Arc<dyn RemoteSource>,
    store: Arc<Mutex<QuoteStore>>,
    storage: Arc<dyn KeyValueStore>,
    fetch_limit: usize,
    in_flight: AtomicBool,
}

impl SyncEngine {
    /// Create an engine over `store`. The last-sync marker lives in the same
    /// persistent storage the store mirrors to.
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        store: Arc<Mutex<QuoteStore>>,
        fetch_limit: usize,
    ) -> Result<Self> {
        let storage = store.lock()?.storage();
        Ok(Self {
            remote,
            store,
            storage,
            fetch_limit,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Run one reconciliation cycle.
    pub fn reconcile(&self) -> Result<SyncReport> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Sync cycle skipped: previous cycle still in flight");
            return Ok(SyncReport::Skipped);
        };

        let batch = self.remote.fetch_batch(self.fetch_limit)?;
        debug!("Fetched {} remote quotes", batch.len());

        let merge = self.store.lock()?.merge_remote(&batch);

        self.mark_synced();

        let report = if merge.changed() {
            SyncReport::Changed {
                conflicts_resolved: merge.conflicts_resolved,
                new_records: merge.new_records,
                persisted: merge.write.is_some_and(|w| w.is_persisted()),
            }
        } else {
            SyncReport::NoChange
        };
        info!("Sync cycle finished: {}", report);
        Ok(report)
    }

    /// Time the last cycle completed, if any.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        match self.storage.get(StorageKey::LastSync) {
            Ok(Some(raw)) => raw
                .parse::<i64>()
                .ok()
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            Ok(None) => None,
            Err(e) => {
                warn!("Cannot read last sync marker: {}", e);
                None
            }
        }
    }

    fn mark_synced(&self) {
        let now = Utc::now().timestamp_millis().to_string();
        if let Err(e) = self.storage.set(StorageKey::LastSync, &now) {
            warn!("Cannot store last sync marker: {}", e);
        }
    }

    /// Post a freshly added quote on a background thread. Fire-and-forget:
    /// failures are only logged.
    pub fn publish(&self, quote: Quote) -> JoinHandle<()> {
        let remote = Arc::clone(&self.remote);
        thread::spawn(move || {
            if let Err(e) = remote.post_quote(&quote) {
                error!("POST failed: {}", e);
            }
        })
    }
}
