//! Mail server settings.

use std::time::Duration;

/// Default limit for establishing a session.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default mailbox to watch.
pub const DEFAULT_MAILBOX: &str = "INBOX";

/// Settings to reach a mailbox on a mail server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Human-friendly name for logging and identification.
    pub name: String,

    /// Hostname or IP address of the server.
    ///
    /// Also the key for the credentials lookup and the TLS server name.
    pub host: String,

    /// Port to connect to.
    pub port: u16,

    /// How the connection is secured.
    pub tls_mode: imap_tls::TlsMode,

    /// Mailbox to watch.
    pub mailbox: String,

    /// Upper bound for connecting, greeting and login together.
    pub connect_timeout: Duration,
}

impl ServerConfig {
    /// Settings with conventional defaults for everything but the basics.
    pub fn new(host: impl Into<String>, use_tls: bool, mailbox: impl Into<String>) -> Self {
        let host = host.into();
        let tls_mode = if use_tls {
            imap_tls::TlsMode::Implicit
        } else {
            imap_tls::TlsMode::Plain
        };
        Self {
            name: short_name(&host).to_owned(),
            port: tls_mode.default_port(),
            tls_mode,
            mailbox: mailbox.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            host,
        }
    }

    /// Whether the connection is encrypted.
    pub fn use_tls(&self) -> bool {
        self.tls_mode.is_encrypted()
    }
}

/// A short label for a host: its second-to-last DNS label.
///
/// `imap.example.com` becomes `example`; single-label hosts and IP addresses
/// are returned as is.
pub fn short_name(host: &str) -> &str {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host;
    }
    let mut labels = host.trim_end_matches('.').rsplit('.');
    let last = labels.next().unwrap_or(host);
    labels.next().unwrap_or(last)
}
