//! Console rendering of the watcher statuses.

use mail_channels::{MailStatus, StatusSubscriber};

/// A status as the console reports it.
#[derive(Debug, PartialEq, Eq)]
pub enum Report<'a> {
    /// The count went up since the last report.
    NewMail {
        /// Unread messages now.
        unread: u32,
    },

    /// The count did not go up.
    Unread {
        /// Unread messages now.
        unread: u32,
    },

    /// The watcher failed.
    Error {
        /// What went wrong.
        message: &'a str,
    },
}

/// Tracks one watcher's reports.
///
/// An error counts as zero unread, so the first count after a failure
/// reads as new mail whenever it is positive.
#[derive(Debug, Default)]
pub struct Tracker {
    last_unread: u32,
}

impl Tracker {
    /// Classify `status` against the previous one.
    pub fn report<'a>(&mut self, status: &'a MailStatus) -> Report<'a> {
        match status {
            MailStatus::Unread(unread) => {
                let unread = *unread;
                let grew = unread > self.last_unread;
                self.last_unread = unread;
                if grew {
                    Report::NewMail { unread }
                } else {
                    Report::Unread { unread }
                }
            }
            MailStatus::Error(message) => {
                self.last_unread = 0;
                Report::Error { message }
            }
        }
    }
}

/// Log every status of one watcher until it stops.
pub async fn show(label: String, mut statuses: StatusSubscriber) {
    let mut tracker = Tracker::default();

    while let Ok(status) = statuses.next().await {
        log(&label, tracker.report(&status));
    }

    tracing::debug!(server = %label, "watcher stopped");
}

/// Emit one report.
fn log(label: &str, report: Report<'_>) {
    match report {
        Report::NewMail { unread } => tracing::info!(server = %label, unread, "new mail"),
        Report::Unread { unread } => tracing::info!(server = %label, unread, "unread mail"),
        Report::Error { message } => tracing::warn!(server = %label, error = %message, "mailbox error"),
    }
}
