//! Periodic driver for `SyncEngine`.
//!
//! The scheduler owns a background thread that runs one cycle at start-up
//! when no last-sync marker exists, then one cycle per tick. Reports are
//! forwarded to the caller over a channel so an interactive session can show
//! them; failures are logged only.

use crossbeam_channel::{Receiver, Sender, select, tick};
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::{SyncEngine, SyncReport};

/// Background sync loop.
pub struct SyncScheduler;

impl SyncScheduler {
    /// Spawn the sync thread.
    ///
    /// The thread stops when `shutdown` receives a message or its sender is
    /// dropped. An in-flight cycle is allowed to finish first.
    pub fn start(
        engine: Arc<SyncEngine>,
        interval: Duration,
        reports: Sender<SyncReport>,
        shutdown: Receiver<()>,
    ) -> JoinHandle<()> {
        thread::spawn(move || {
            info!("Sync scheduler started, interval {:?}", interval);
            if engine.last_sync().is_none() {
                run_cycle(&engine, &reports);
            }

            let ticker = tick(interval);
            loop {
                select! {
                    recv(shutdown) -> _ => break,
                    recv(ticker) -> _ => run_cycle(&engine, &reports),
                }
            }
            info!("Sync scheduler stopping...");
        })
    }
}

fn run_cycle(engine: &SyncEngine, reports: &Sender<SyncReport>) {
    match engine.reconcile() {
        Ok(report) => {
            if reports.send(report).is_err() {
                debug!("Sync report dropped: no listener");
            }
        }
        Err(e) => warn!("Server sync failed: {}", e),
    }
}
