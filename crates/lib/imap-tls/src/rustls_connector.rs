//! TLS connector helpers.

/// Errors returned while preparing or establishing a TLS connection.
#[derive(Debug, thiserror::Error)]
pub enum TlsConnectError {
    /// Failed to load any system root certificates.
    #[error("failed to load system root certificates: {0}")]
    RootCerts(#[source] rustls_native_certs::Error),

    /// The system returned no root certificates.
    #[error("no system root certificates available")]
    NoRootCerts,

    /// Invalid DNS name for TLS verification.
    #[error("invalid DNS name: {0}")]
    InvalidDnsName(String),

    /// TLS handshake or I/O error.
    #[error("TLS I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build a rustls connector configured with system root certificates.
pub fn connector() -> Result<tokio_rustls::TlsConnector, TlsConnectError> {
    let mut root_store = rustls::RootCertStore::empty();
    let rustls_native_certs::CertificateResult { certs, errors, .. } =
        rustls_native_certs::load_native_certs();

    for error in &errors {
        tracing::debug!(%error, "skipping unloadable root certificate source");
    }

    let (added, ignored) = root_store.add_parsable_certificates(certs);
    if added == 0 {
        return Err(match errors.into_iter().next() {
            Some(error) => TlsConnectError::RootCerts(error),
            None => TlsConnectError::NoRootCerts,
        });
    }
    tracing::trace!(added, ignored, "loaded root certificates");

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Ok(tokio_rustls::TlsConnector::from(std::sync::Arc::new(
        config,
    )))
}

/// A rustls connector built on first use and shared by its clones.
///
/// Loading the system root certificates reads them from disk, so it happens
/// once instead of on every connect. A failed load is not cached.
#[derive(Clone, Default)]
pub struct SharedConnector {
    cell: std::sync::Arc<tokio::sync::OnceCell<tokio_rustls::TlsConnector>>,
}

impl SharedConnector {
    /// The connector, building it if this is the first use.
    pub async fn get(&self) -> Result<&tokio_rustls::TlsConnector, TlsConnectError> {
        self.cell.get_or_try_init(|| async { connector() }).await
    }

    /// Whether the root certificates have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

impl std::fmt::Debug for SharedConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedConnector")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Establish a TLS connection over an existing TCP stream.
pub async fn tls_handshake(
    connector: &tokio_rustls::TlsConnector,
    server: &str,
    stream: tokio::net::TcpStream,
) -> Result<crate::TlsStream, TlsConnectError> {
    let server_name = rustls::pki_types::ServerName::try_from(server.to_owned())
        .map_err(|_| TlsConnectError::InvalidDnsName(server.to_owned()))?;
    let tls_stream = connector.connect(server_name, stream).await?;
    Ok(tls_stream)
}
