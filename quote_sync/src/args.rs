//! Command-line arguments for the sync daemon.
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Keeps the local quote list reconciled with the server", long_about = None)]
pub struct Args {
    /// Directory holding the persistent quote store.
    #[clap(long, env = "QUOTES_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Endpoint returning the remote quote list.
    #[clap(long)]
    pub read_url: Option<String>,

    /// Seconds between two sync cycles.
    #[clap(long)]
    pub sync_interval_secs: Option<u64>,

    /// Remote items consumed per cycle.
    #[clap(long)]
    pub fetch_limit: Option<usize>,
}
