//! Quote Client — keeps a personal list of quotes and shows them on demand.
//!
//! Quotes live in a persistent store inside the data directory. The client
//! can show a random quote, filter by category, add quotes, export/import the
//! list as `quotes.json`, and reconcile it with a remote server. One-shot
//! commands run a single action; `shell` opens an interactive session with a
//! background sync loop.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --data-dir ./.quotes add "Stay hungry, stay foolish" Life
//! quote_client filter Life
//! quote_client shell
//! ```
#![warn(missing_docs)]
mod app;
mod args;
mod shell;
mod transfer;
mod view;

use crate::app::{Session, notice};
use crate::args::{Args, Command};
use clap::Parser;
use log::{error, info};
use quote_common::config::Config;
use quote_common::{QuoteError, Result};
use std::sync::Arc;

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();
    let config = Config::default()
        .with_data_dir(args.data_dir)
        .with_urls(args.read_url, args.write_url)
        .with_sync(args.sync_interval_secs, args.fetch_limit);
    info!("Data directory: {}", config.data_dir.display());

    let session = Arc::new(Session::open(&config)?);

    if args.command == Command::Shell {
        return shell::run(session, config.sync_interval);
    }

    match session.execute(&args.command) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", notice(&e));
        }
    }
    session.finish();
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
