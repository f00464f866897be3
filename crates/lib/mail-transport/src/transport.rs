//! The transport abstraction.

use std::time::Duration;

/// Why an IDLE wait ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleOutcome {
    /// The server reported mailbox activity.
    NewData,

    /// The local timeout elapsed.
    Timeout,
}

/// Network access to a mail server.
///
/// Implementations never retry internally; the retry policy belongs to the
/// caller. Any error from [`count_unread`](Self::count_unread) or
/// [`idle`](Self::idle) leaves the connection unusable.
pub trait MailTransport: Send + Sync {
    /// An authenticated session.
    type Connection: Send;

    /// The error every operation may fail with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open a session and authenticate.
    fn connect(
        &self,
        server: &crate::ServerConfig,
        credentials: &authinfo::Credentials,
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;

    /// Select `mailbox` and count the messages without the `\Seen` flag.
    fn count_unread(
        &self,
        connection: &mut Self::Connection,
        mailbox: &str,
    ) -> impl Future<Output = Result<u32, Self::Error>> + Send;

    /// Wait for mailbox activity, at most for `timeout`.
    ///
    /// Dropping the returned future leaves the connection closed.
    fn idle(
        &self,
        connection: &mut Self::Connection,
        timeout: Duration,
    ) -> impl Future<Output = Result<IdleOutcome, Self::Error>> + Send;

    /// Release the session. Closing a closed connection does nothing.
    fn close(&self, connection: &mut Self::Connection) -> impl Future<Output = ()> + Send;
}
