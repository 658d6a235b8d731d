//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. The same `Command`
//! verbs are accepted line by line inside the interactive shell.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the persistent quote store.
    #[clap(long, env = "QUOTES_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Endpoint returning the remote quote list.
    #[clap(long)]
    pub read_url: Option<String>,

    /// Endpoint receiving newly added quotes.
    #[clap(long)]
    pub write_url: Option<String>,

    /// Seconds between two background sync cycles (shell only).
    #[clap(long)]
    pub sync_interval_secs: Option<u64>,

    /// Remote items consumed per sync cycle.
    #[clap(long)]
    pub fetch_limit: Option<usize>,

    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// User actions.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show a random quote.
    Random,
    /// Show every quote of a category ("all" for a random one).
    Filter {
        /// Category name, or "all".
        category: String,
    },
    /// List the category selector options.
    Categories,
    /// Add a new quote.
    Add {
        /// Quote text.
        text: String,
        /// Quote category.
        category: String,
    },
    /// Export every quote to a JSON file.
    Export {
        /// Output file or directory (defaults to ./quotes.json).
        #[clap(long)]
        out: Option<PathBuf>,
    },
    /// Import quotes from a JSON file.
    Import {
        /// File produced by `export` or of the same shape.
        path: PathBuf,
    },
    /// Reconcile with the server now.
    Sync,
    /// Interactive session with background sync.
    Shell,
}

/// One line typed inside the shell.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    /// Parsed verb.
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Verbs accepted by the shell.
#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Regular action.
    #[command(flatten)]
    Action(Command),
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

/// Split a shell line into words, keeping double-quoted runs together.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_quoted_text_together() {
        assert_eq!(
            split_words(r#"add "Stay hungry, stay foolish" Life"#),
            vec!["add", "Stay hungry, stay foolish", "Life"]
        );
        assert_eq!(split_words("  filter   all "), vec!["filter", "all"]);
        assert_eq!(split_words(r#"add "" x"#), vec!["add", "", "x"]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn shell_line_parses_actions_and_quit() {
        let line = ShellLine::try_parse_from(split_words("filter Wisdom")).unwrap();
        assert!(matches!(
            line.command,
            ShellCommand::Action(Command::Filter { ref category }) if category == "Wisdom"
        ));
        let line = ShellLine::try_parse_from(["exit"]).unwrap();
        assert!(matches!(line.command, ShellCommand::Quit));
        assert!(ShellLine::try_parse_from(["launch"]).is_err());
    }

    #[test]
    fn cli_parses_global_flags_before_command() {
        let args = Args::try_parse_from([
            "quote_client",
            "--data-dir",
            "/tmp/q",
            "--fetch-limit",
            "3",
            "add",
            "Hello",
            "Greetings",
        ])
        .unwrap();
        assert_eq!(args.fetch_limit, Some(3));
        assert_eq!(
            args.command,
            Command::Add {
                text: "Hello".to_string(),
                category: "Greetings".to_string()
            }
        );
    }
}
