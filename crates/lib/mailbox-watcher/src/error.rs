//! Watcher failures.

/// A failure the watcher recovers from by reconnecting.
#[derive(Debug, thiserror::Error)]
pub enum WatchError<AuthError, TransportError> {
    /// No credentials for the server.
    #[error("credentials lookup: {0}")]
    AuthLookup(#[source] AuthError),

    /// Connecting or logging in failed.
    #[error("connect: {0}")]
    Connect(#[source] TransportError),

    /// The session broke while counting or idling.
    #[error("protocol: {0}")]
    Protocol(#[source] TransportError),
}
