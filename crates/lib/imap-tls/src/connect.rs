//! IMAP connect helpers.

/// The client type produced by [`connect`].
pub type Client = async_imap::Client<crate::ImapStream>;

/// Errors returned while connecting to the IMAP server.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Network I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS setup or handshake error.
    #[error("TLS error: {0}")]
    Tls(#[source] crate::TlsConnectError),

    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// The server did not send the expected greeting.
    #[error("IMAP server sent no greeting")]
    MissingGreeting,
}

/// Set up an IMAP client over `tcp_stream`, securing it per `tls_mode`.
///
/// The server greeting is consumed before returning, so the client is ready
/// for the login. `tls_connector` is only touched for encrypted modes.
pub async fn connect(
    tcp_stream: tokio::net::TcpStream,
    tls_server_name: &str,
    tls_mode: crate::TlsMode,
    tls_connector: &crate::SharedConnector,
) -> Result<Client, ConnectError> {
    let client = match tls_mode {
        crate::TlsMode::Plain => {
            let mut client = async_imap::Client::new(crate::ImapStream::Plain(tcp_stream));
            read_greeting(&mut client).await?;
            client
        }
        crate::TlsMode::Implicit => {
            let stream = secure(tls_connector, tls_server_name, tcp_stream).await?;
            let mut client = async_imap::Client::new(stream);
            read_greeting(&mut client).await?;
            client
        }
        crate::TlsMode::StartTls => {
            let mut client = async_imap::Client::new(tcp_stream);
            client
                .read_response()
                .await?
                .ok_or(ConnectError::MissingGreeting)?;
            client.run_command_and_check_ok("STARTTLS", None).await?;
            let tcp_stream = client.into_inner();
            async_imap::Client::new(secure(tls_connector, tls_server_name, tcp_stream).await?)
        }
    };

    Ok(client)
}

/// Wrap the TCP stream in TLS.
async fn secure(
    tls_connector: &crate::SharedConnector,
    tls_server_name: &str,
    tcp_stream: tokio::net::TcpStream,
) -> Result<crate::ImapStream, ConnectError> {
    let connector = tls_connector.get().await.map_err(ConnectError::Tls)?;
    let stream = crate::tls_handshake(connector, tls_server_name, tcp_stream)
        .await
        .map_err(ConnectError::Tls)?;
    Ok(crate::ImapStream::Tls(Box::new(stream)))
}

/// Wait for the untagged server greeting.
async fn read_greeting(client: &mut Client) -> Result<(), ConnectError> {
    client
        .read_response()
        .await?
        .ok_or(ConnectError::MissingGreeting)?;
    Ok(())
}
