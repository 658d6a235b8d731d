//! Client session: wires the store, view, transfer and sync together.
//!
//! A `Session` corresponds to one run of the client. It owns the shared
//! `QuoteStore`, the session-scoped storage and the `SyncEngine`, and turns a
//! `Command` into the text shown to the user. Every error is mapped to a
//! short notice by [`notice`]; none of them ends the session.

use log::{debug, warn};
use quote_common::config::Config;
use quote_common::storage::{FileStore, KeyValueStore, MemoryStore};
use quote_common::store::WriteStatus;
use quote_common::{QuoteError, QuoteStore, Result};
use quote_sync::{HttpRemote, RemoteSource, SyncEngine};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::args::Command;
use crate::transfer::{EXPORT_FILE_NAME, TransferGateway};
use crate::view::ViewController;

/// State of one client run.
pub struct Session {
    store: Arc<Mutex<QuoteStore>>,
    view: ViewController,
    engine: Arc<SyncEngine>,
    pending_posts: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Open the data directory and connect to the configured endpoints.
    pub fn open(config: &Config) -> Result<Self> {
        let persistent = Arc::new(FileStore::open(&config.data_dir)?);
        let remote = Arc::new(HttpRemote::new(config)?);
        Self::with_parts(persistent, remote, config.fetch_limit)
    }

    /// Assemble a session from explicit parts.
    pub fn with_parts(
        persistent: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteSource>,
        fetch_limit: usize,
    ) -> Result<Self> {
        let session_scope: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let store = Arc::new(Mutex::new(QuoteStore::load(Arc::clone(&persistent))));
        let engine = Arc::new(SyncEngine::new(remote, Arc::clone(&store), fetch_limit)?);
        Ok(Self {
            store,
            view: ViewController::new(persistent, session_scope),
            engine,
            pending_posts: Mutex::new(Vec::new()),
        })
    }

    /// Engine shared with the background scheduler.
    pub fn engine(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.engine)
    }

    /// What the user saw last in this session, or the saved filter.
    pub fn restore(&self) -> Result<String> {
        let store = self.store.lock()?;
        Ok(self.view.restore(&store).to_string())
    }

    /// Run one action and return the text to display.
    pub fn execute(&self, command: &Command) -> Result<String> {
        match command {
            Command::Random => {
                let store = self.store.lock()?;
                Ok(self.view.render_random(&store).to_string())
            }
            Command::Filter { category } => {
                let store = self.store.lock()?;
                Ok(self.view.render_filtered(&store, category).to_string())
            }
            Command::Categories => {
                let store = self.store.lock()?;
                Ok(self.view.selector(&store).join("\n"))
            }
            Command::Add { text, category } => {
                let (quote, write) = self.store.lock()?.add(text, category)?;
                let handle = self.engine.publish(quote);
                self.pending_posts.lock()?.push(handle);
                self.after_mutation("Quote added!", &write)
            }
            Command::Export { out } => {
                let target = out.clone().unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
                let store = self.store.lock()?;
                let path = TransferGateway::export_to_file(&store, &target)?;
                Ok(format!("Exported {} quotes to {}", store.len(), path.display()))
            }
            Command::Import { path } => {
                let report = TransferGateway::import_from_file(&mut *self.store.lock()?, path)?;
                let mut message = format!("Quotes imported successfully! ({} added", report.accepted);
                if report.rejected > 0 {
                    message.push_str(&format!(", {} malformed skipped", report.rejected));
                }
                message.push(')');
                self.after_mutation(&message, &report.write)
            }
            Command::Sync => Ok(self.engine.reconcile()?.to_string()),
            Command::Shell => Ok("Already in the shell.".to_string()),
        }
    }

    /// Mutations re-render the category selector, as the page did.
    fn after_mutation(&self, message: &str, write: &WriteStatus) -> Result<String> {
        let store = self.store.lock()?;
        let mut out = message.to_string();
        if !write.is_persisted() {
            out.push_str("\nWarning: could not save to storage, changes kept for this session only.");
        }
        out.push_str(&format!("\nCategories: {}", self.view.selector(&store).join(", ")));
        Ok(out)
    }

    /// Wait for fire-and-forget posts so a short-lived run does not drop them.
    pub fn finish(&self) {
        let handles = match self.pending_posts.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(e) => {
                warn!("Pending posts lost: {}", e);
                return;
            }
        };
        debug!("Waiting for {} pending posts", handles.len());
        for handle in handles {
            if handle.join().is_err() {
                warn!("Post thread panicked");
            }
        }
    }
}

/// User-facing text for an error.
pub fn notice(err: &QuoteError) -> String {
    match err {
        QuoteError::NoValidRecords => "No valid quotes found in file.".to_string(),
        e if e.is_validation() => "Please fill both fields!".to_string(),
        QuoteError::Parse(msg) => format!("Invalid JSON: {}", msg),
        QuoteError::Network(msg) => format!("Server sync failed: {}", msg),
        other => format!("Something went wrong: {}", other),
    }
}
