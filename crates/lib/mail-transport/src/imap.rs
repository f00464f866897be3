//! The `async-imap` backed transport.

use std::time::Duration;

use async_imap::extensions::idle::IdleResponse;

/// The session type this transport works with.
pub type Session = async_imap::Session<imap_tls::ImapStream>;

/// Errors returned by [`ImapTransport`].
///
/// The watcher handles all of them the same way; the variants keep the
/// cause visible in logs and status messages.
#[derive(Debug, thiserror::Error)]
pub enum ImapError {
    /// Establishing the session took too long.
    #[error("timed out connecting after {0:?}")]
    ConnectTimeout(Duration),

    /// TCP connection error.
    #[error("TCP connection error: {0}")]
    TcpConnect(#[source] std::io::Error),

    /// TLS setup or greeting error.
    #[error("connection setup error: {0}")]
    Setup(#[source] imap_tls::ConnectError),

    /// The server rejected the login.
    #[error("login: {0}")]
    Login(#[source] async_imap::error::Error),

    /// Capability query error.
    #[error("capabilities: {0}")]
    Capabilities(#[source] async_imap::error::Error),

    /// Mailbox selection error.
    #[error("select {mailbox}: {source}")]
    Select {
        /// The mailbox that was selected.
        mailbox: String,

        /// Underlying IMAP error.
        #[source]
        source: async_imap::error::Error,
    },

    /// Unread search error.
    #[error("search: {0}")]
    Search(#[source] async_imap::error::Error),

    /// Error while entering, waiting in or leaving IDLE.
    #[error("idle: {0}")]
    Idle(#[source] async_imap::error::Error),

    /// The connection was already closed.
    #[error("connection closed")]
    Closed,
}

/// An authenticated IMAP session, or nothing once closed.
///
/// The default value is a connection that was never opened.
#[derive(Debug, Default)]
pub struct ImapConnection {
    /// The live session.
    session: Option<Session>,

    /// Whether the server advertised IDLE.
    supports_idle: bool,
}

impl ImapConnection {
    /// Whether the session is still held.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Borrow the live session.
    fn session_mut(&mut self) -> Result<&mut Session, ImapError> {
        self.session.as_mut().ok_or(ImapError::Closed)
    }
}

/// IMAP transport over TCP, optionally secured with rustls.
#[derive(Debug, Clone)]
pub struct ImapTransport {
    /// How long to wait for the server to acknowledge `LOGOUT`.
    pub logout_timeout: Duration,

    /// How often to re-poll servers that do not support IDLE.
    pub poll_interval: Duration,

    /// TLS setup shared by every connect through this transport and its clones.
    pub tls: imap_tls::SharedConnector,
}

impl Default for ImapTransport {
    fn default() -> Self {
        Self {
            logout_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(5 * 60),
            tls: imap_tls::SharedConnector::default(),
        }
    }
}

impl ImapTransport {
    /// Connect, read the greeting, log in and query the capabilities.
    async fn establish(
        &self,
        server: &crate::ServerConfig,
        credentials: &authinfo::Credentials,
    ) -> Result<ImapConnection, ImapError> {
        tracing::debug!(
            imap_host = %server.host,
            imap_port = server.port,
            imap_tls_mode = ?server.tls_mode,
            user = %credentials.user,
            "connecting to an IMAP server"
        );

        let tcp_stream = tokio::net::TcpStream::connect((server.host.as_str(), server.port))
            .await
            .map_err(ImapError::TcpConnect)?;
        let client = imap_tls::connect(tcp_stream, &server.host, server.tls_mode, &self.tls)
            .await
            .map_err(ImapError::Setup)?;

        let mut session = client
            .login(&credentials.user, credentials.password.as_str())
            .await
            .map_err(|(err, _client)| ImapError::Login(err))?;

        let capabilities = session
            .capabilities()
            .await
            .map_err(ImapError::Capabilities)?;
        let supports_idle = capabilities.has_str("IDLE");
        if !supports_idle {
            tracing::warn!(
                imap_host = %server.host,
                "IMAP server does not advertise IDLE, falling back to polling"
            );
        }

        Ok(ImapConnection {
            session: Some(session),
            supports_idle,
        })
    }
}

impl crate::MailTransport for ImapTransport {
    type Connection = ImapConnection;
    type Error = ImapError;

    async fn connect(
        &self,
        server: &crate::ServerConfig,
        credentials: &authinfo::Credentials,
    ) -> Result<ImapConnection, ImapError> {
        tokio::time::timeout(server.connect_timeout, self.establish(server, credentials))
            .await
            .map_err(|_elapsed| ImapError::ConnectTimeout(server.connect_timeout))?
    }

    async fn count_unread(
        &self,
        connection: &mut ImapConnection,
        mailbox: &str,
    ) -> Result<u32, ImapError> {
        let session = connection.session_mut()?;

        session
            .select(mailbox)
            .await
            .map_err(|source| ImapError::Select {
                mailbox: mailbox.to_owned(),
                source,
            })?;
        let unseen = session.search("UNSEEN").await.map_err(ImapError::Search)?;

        Ok(u32::try_from(unseen.len()).unwrap_or(u32::MAX))
    }

    async fn idle(
        &self,
        connection: &mut ImapConnection,
        timeout: Duration,
    ) -> Result<crate::IdleOutcome, ImapError> {
        if !connection.supports_idle {
            connection.session_mut()?;
            tokio::time::sleep(timeout.min(self.poll_interval)).await;
            return Ok(crate::IdleOutcome::Timeout);
        }

        // The session is out of the connection for the duration of IDLE, so
        // an error or a dropped future leaves the connection closed.
        let session = connection.session.take().ok_or(ImapError::Closed)?;

        let mut idle_handle = session.idle();
        idle_handle.init().await.map_err(ImapError::Idle)?;
        let (idle_wait, _stop) = idle_handle.wait_with_timeout(timeout);
        let idle_response = idle_wait.await.map_err(ImapError::Idle)?;
        let session = idle_handle.done().await.map_err(ImapError::Idle)?;

        connection.session = Some(session);

        Ok(match idle_response {
            IdleResponse::NewData(_) => crate::IdleOutcome::NewData,
            // The stop handle is held for the whole wait, so a manual
            // interrupt cannot happen.
            IdleResponse::Timeout | IdleResponse::ManualInterrupt => crate::IdleOutcome::Timeout,
        })
    }

    async fn close(&self, connection: &mut ImapConnection) {
        let Some(mut session) = connection.session.take() else {
            return;
        };

        match tokio::time::timeout(self.logout_timeout, session.logout()).await {
            Ok(Ok(())) => tracing::debug!("logged out"),
            Ok(Err(error)) => tracing::debug!(%error, "logout failed, dropping the session"),
            Err(_elapsed) => tracing::debug!("logout timed out, dropping the session"),
        }
    }
}
