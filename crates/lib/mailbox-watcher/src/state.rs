//! Watcher states.

use std::time::Duration;

/// A watcher state without its payload, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateKind {
    /// No connection.
    Disconnected,

    /// Looking up credentials and establishing a session.
    Connecting,

    /// Counting unread messages.
    Polling,

    /// Waiting for mailbox activity.
    Idling,

    /// Terminal.
    Stopped,
}

/// What ends a disconnected spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// Connect right away.
    Now,

    /// Connect after a delay, or earlier on command.
    After(Duration),

    /// Connect on command only.
    OnCommand,
}

/// A watcher state, owning the connection where there is one.
#[derive(Debug)]
pub(crate) enum State<Connection> {
    Disconnected(Wake),
    Connecting,
    Polling(Connection),
    Idling(Connection),
    Stopped,
}

impl<Connection> State<Connection> {
    pub(crate) fn kind(&self) -> StateKind {
        match self {
            Self::Disconnected(_) => StateKind::Disconnected,
            Self::Connecting => StateKind::Connecting,
            Self::Polling(_) => StateKind::Polling,
            Self::Idling(_) => StateKind::Idling,
            Self::Stopped => StateKind::Stopped,
        }
    }

    /// Take the connection out, leaving the state behind.
    pub(crate) fn into_connection(self) -> Option<Connection> {
        match self {
            Self::Polling(connection) | Self::Idling(connection) => Some(connection),
            Self::Disconnected(_) | Self::Connecting | Self::Stopped => None,
        }
    }
}
