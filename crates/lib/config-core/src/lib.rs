//! Shared configuration types for mail-watcher.

use std::path::PathBuf;

/// Root configuration.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Path to the credentials store; `~/.authinfo` when unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub authinfo: Option<PathBuf>,

    /// Servers to watch, one watcher each.
    pub servers: Vec<ServerConfig>,
}

/// A watched mailbox on an IMAP server.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Human-friendly name; derived from the host when unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,

    /// Hostname or IP address of the IMAP server.
    pub host: String,

    /// Whether to use TLS.
    #[cfg_attr(feature = "serde", serde(default = "default_use_tls"))]
    pub use_tls: bool,

    /// Upgrade a plaintext connection with STARTTLS instead of using
    /// implicit TLS. Only meaningful with `use_tls`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starttls: bool,

    /// Optional port override.
    #[cfg_attr(feature = "serde", serde(default))]
    pub port: Option<u16>,

    /// Mailbox to watch.
    #[cfg_attr(feature = "serde", serde(default = "default_mailbox"))]
    pub mailbox: String,

    /// IDLE timeout override (seconds).
    #[cfg_attr(feature = "serde", serde(default))]
    pub idle_timeout_secs: Option<u64>,

    /// Connect timeout override (seconds).
    #[cfg_attr(feature = "serde", serde(default))]
    pub connect_timeout_secs: Option<u64>,

    /// What to do after a failure.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reconnect: ReconnectMode,
}

/// Reconnect modes.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ReconnectMode {
    /// Retry with exponential backoff.
    #[default]
    Auto,

    /// Wait for an explicit reconnect command.
    Manual,
}

/// The default for [`ServerConfig::use_tls`].
pub const fn default_use_tls() -> bool {
    true
}

/// The default for [`ServerConfig::mailbox`].
pub fn default_mailbox() -> String {
    "INBOX".to_owned()
}
