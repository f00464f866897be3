//! The mailbox watcher: keeps a session to one mailbox alive and reports its
//! unread count.
//!
//! A [`Watcher`] connects, counts the unread messages, waits in IDLE for
//! mailbox activity and counts again, publishing a
//! [`mail_channels::MailStatus`] after every count and every failure.
//! Failures are never fatal: the connection is dropped and the watcher stays
//! disconnected until the reconnect policy or a
//! [`mail_channels::ControlCommand::Reconnect`] lets it try again.

mod config;
mod error;
mod state;
mod watcher;

pub use config::*;
pub use error::*;
pub use watcher::*;
