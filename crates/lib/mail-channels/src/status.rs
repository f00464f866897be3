//! Latest-value status channel.

use tokio::sync::watch;

/// The most recently observed state of a mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailStatus {
    /// The mailbox was read successfully.
    Unread(u32),

    /// The watcher failed to read the mailbox; no count is known.
    Error(String),
}

impl MailStatus {
    /// Whether this status reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The unread count, unless this is an error status.
    pub fn unread_count(&self) -> Option<u32> {
        match self {
            Self::Unread(count) => Some(*count),
            Self::Error(_) => None,
        }
    }

    /// The error message, if this is an error status.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Unread(_) => None,
            Self::Error(message) => Some(message),
        }
    }
}

impl std::fmt::Display for MailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unread(count) => write!(f, "{count} unread"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// The publisher is gone and every status it sent has been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("status publisher closed")]
pub struct StatusClosed;

/// Create a connected status publisher/subscriber pair.
pub fn status_channel() -> (StatusPublisher, StatusSubscriber) {
    let (sender, receiver) = watch::channel(None);
    (StatusPublisher { sender }, StatusSubscriber { receiver })
}

/// The writing half of the status channel.
#[derive(Debug)]
pub struct StatusPublisher {
    sender: watch::Sender<Option<MailStatus>>,
}

impl StatusPublisher {
    /// Replace the latest status and wake the subscribers.
    ///
    /// Never blocks, and succeeds even when nobody is subscribed.
    pub fn publish(&self, status: MailStatus) {
        self.sender.send_replace(Some(status));
    }

    /// Create a new subscriber that has not observed anything yet.
    pub fn subscribe(&self) -> StatusSubscriber {
        let mut receiver = self.sender.subscribe();
        if receiver.borrow().is_some() {
            receiver.mark_changed();
        }
        StatusSubscriber { receiver }
    }
}

/// The reading half of the status channel.
///
/// Cloned subscribers track their observations independently.
#[derive(Debug, Clone)]
pub struct StatusSubscriber {
    receiver: watch::Receiver<Option<MailStatus>>,
}

impl StatusSubscriber {
    /// Wait for a status published after the last one this subscriber saw.
    ///
    /// Several publishes in between collapse into the most recent one.
    pub async fn next(&mut self) -> Result<MailStatus, StatusClosed> {
        loop {
            self.receiver.changed().await.map_err(|_| StatusClosed)?;
            if let Some(status) = self.receiver.borrow_and_update().clone() {
                return Ok(status);
            }
        }
    }

    /// Peek at the latest status without waiting or marking it observed.
    pub fn latest(&self) -> Option<MailStatus> {
        self.receiver.borrow().clone()
    }
}
