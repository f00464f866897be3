//! Connection security modes.

/// How to secure the IMAP connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TlsMode {
    /// No TLS at all (usually port 143).
    Plain,

    /// Implicit TLS (usually port 993).
    Implicit,

    /// Start with plaintext and upgrade using STARTTLS (usually port 143).
    StartTls,
}

impl TlsMode {
    /// The conventional IMAP port for this mode.
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Implicit => 993,
            Self::Plain | Self::StartTls => 143,
        }
    }

    /// Whether the session ends up encrypted.
    pub const fn is_encrypted(self) -> bool {
        !matches!(self, Self::Plain)
    }
}
