//! Interactive session.
//!
//! The shell is the long-lived counterpart of the quote page: it restores the
//! previous selection, runs the background sync loop, and executes one
//! command per input line until `quit`, end of input, or Ctrl+C.
//!
//! Three event sources are multiplexed with crossbeam `select!`:
//! - lines read from stdin by a helper thread;
//! - sync reports from `SyncScheduler`;
//! - the Ctrl+C signal.

use clap::Parser;
use crossbeam_channel::{Receiver, select, unbounded};
use log::{error, info, warn};
use quote_common::{QuoteError, Result};
use quote_sync::{SyncReport, SyncScheduler};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::app::{Session, notice};
use crate::args::{ShellCommand, ShellLine, split_words};

const PROMPT: &str = "> ";

/// What the loop should do after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the shell until the user leaves.
pub fn run(session: Arc<Session>, sync_interval: Duration) -> Result<(), QuoteError> {
    let (ctrlc_tx, ctrlc_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(());
    })
    .map_err(|e| QuoteError::Io(io::Error::other(e)))?;

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    let (report_tx, report_rx) = unbounded::<SyncReport>();
    let worker = SyncScheduler::start(session.engine(), sync_interval, report_tx, shutdown_rx);

    let lines = spawn_stdin_reader();

    println!("{}", session.restore()?);
    prompt();

    loop {
        select! {
            recv(lines) -> line => match line {
                Ok(line) => {
                    if handle_line(&session, &line) == Flow::Quit {
                        break;
                    }
                    prompt();
                }
                Err(_) => break,
            },
            recv(report_rx) -> report => {
                if let Ok(report @ SyncReport::Changed { .. }) = report {
                    println!("\n{}", report);
                    prompt();
                }
            },
            recv(ctrlc_rx) -> _ => {
                info!("Ctrl+C received. Closing session...");
                break;
            },
        }
    }

    let _ = shutdown_tx.send(());
    if worker.join().is_err() {
        error!("Sync scheduler thread panicked");
    }
    session.finish();
    Ok(())
}

fn handle_line(session: &Session, line: &str) -> Flow {
    let words = split_words(line);
    if words.is_empty() {
        return Flow::Continue;
    }
    match ShellLine::try_parse_from(words) {
        Ok(ShellLine {
            command: ShellCommand::Quit,
        }) => Flow::Quit,
        Ok(ShellLine {
            command: ShellCommand::Action(command),
        }) => {
            match session.execute(&command) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    warn!("Command failed: {}", e);
                    println!("{}", notice(&e));
                }
            }
            Flow::Continue
        }
        Err(e) => {
            // clap renders help and usage errors itself.
            let _ = e.print();
            Flow::Continue
        }
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Cannot read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn prompt() {
    print!("{}", PROMPT);
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::storage::MemoryStore;
    use quote_common::{Quote, Result};
    use quote_sync::RemoteSource;

    struct OfflineRemote;

    impl RemoteSource for OfflineRemote {
        fn fetch_batch(&self, _limit: usize) -> Result<Vec<Quote>> {
            Err(QuoteError::Network("offline".to_string()))
        }

        fn post_quote(&self, _quote: &Quote) -> Result<()> {
            Err(QuoteError::Network("offline".to_string()))
        }
    }

    fn session() -> Session {
        Session::with_parts(Arc::new(MemoryStore::new()), Arc::new(OfflineRemote), 5).unwrap()
    }

    #[test]
    fn quit_and_exit_end_the_loop() {
        let session = session();
        assert_eq!(handle_line(&session, "quit"), Flow::Quit);
        assert_eq!(handle_line(&session, "exit"), Flow::Quit);
    }

    #[test]
    fn errors_and_unknown_verbs_keep_the_shell_alive() {
        let session = session();
        assert_eq!(handle_line(&session, ""), Flow::Continue);
        assert_eq!(handle_line(&session, "dance"), Flow::Continue);
        assert_eq!(handle_line(&session, "add \"\" Life"), Flow::Continue);
        assert_eq!(handle_line(&session, "sync"), Flow::Continue);
        assert_eq!(handle_line(&session, "add \"Offline but kept\" Notes"), Flow::Continue);
        session.finish();
    }
}
