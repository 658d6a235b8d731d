//! Quote sync daemon.
//!
//! Runs the reconciliation loop headless against a data directory, so the
//! local quote list stays in step with the server even when no interactive
//! session is open. It wires together:
//!
//! - `QuoteStore` loaded from the `FileStore` in the data directory;
//! - `HttpRemote` for the read endpoint;
//! - `SyncScheduler` ticking `SyncEngine::reconcile`.
//!
//! Client sessions may write to the same directory in between; the store
//! re-reads the saved list before every merge.
//!
//! Usage example:
//! ```bash
//! quote_sync --data-dir ./.quotes --sync-interval-secs 30
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use crossbeam_channel::unbounded;
use log::{error, info};
use quote_common::config::Config;
use quote_common::storage::FileStore;
use quote_common::{QuoteError, QuoteStore, Result};
use quote_sync::{HttpRemote, SyncEngine, SyncReport, SyncScheduler};
use std::sync::{Arc, Mutex};

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();
    let config = Config::default()
        .with_data_dir(args.data_dir)
        .with_urls(args.read_url, None)
        .with_sync(args.sync_interval_secs, args.fetch_limit);
    info!("Data directory: {}", config.data_dir.display());

    let storage = Arc::new(FileStore::open(&config.data_dir)?);
    let store = Arc::new(Mutex::new(QuoteStore::load(storage)));
    let remote = Arc::new(HttpRemote::new(&config)?);
    let engine = Arc::new(SyncEngine::new(remote, store, config.fetch_limit)?);

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down sync daemon...");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| QuoteError::Io(std::io::Error::other(e)))?;

    let (report_tx, report_rx) = unbounded::<SyncReport>();
    let worker = SyncScheduler::start(engine, config.sync_interval, report_tx, shutdown_rx);

    // Ends once the scheduler thread drops its sender.
    for report in report_rx.iter() {
        if let SyncReport::Changed { .. } = report {
            info!("{}", report);
        }
    }

    if worker.join().is_err() {
        error!("Sync scheduler thread panicked");
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
