//! Command-line arguments.

use std::path::PathBuf;

/// Watch IMAP mailboxes and report unread mail.
#[derive(Debug, clap::Parser)]
#[command(name = "mail-watcher", version, about)]
pub struct Args {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short)]
    pub debug: bool,

    /// Configuration file to use instead of the default locations.
    ///
    /// Takes precedence over the `MAIL_WATCHER_CONFIG` environment variable.
    #[arg(long, short, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
