//! Watcher settings.

use std::time::Duration;

/// Default limit for a single IDLE wait.
///
/// Servers may drop clients idling for 30 minutes, so re-issue IDLE a bit
/// earlier.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(29 * 60);

/// Default backoff between automatic reconnect attempts.
pub const DEFAULT_BACKOFF: exp_backoff::Params = exp_backoff::Params {
    initial: Duration::from_secs(1),
    factor: 2,
    max: Duration::from_secs(5 * 60),
};

/// What to do after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Retry on our own after an exponentially growing delay.
    ///
    /// A reconnect command skips the remaining delay.
    Backoff(exp_backoff::Params),

    /// Wait for a reconnect command.
    Manual,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::Backoff(DEFAULT_BACKOFF)
    }
}

/// Fully resolved watcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The server and mailbox to watch.
    pub server: mail_transport::ServerConfig,

    /// Upper bound for a single IDLE wait.
    pub idle_timeout: Duration,

    /// Reconnect policy.
    pub reconnect: ReconnectPolicy,
}

impl Config {
    /// Watch `server` with the default timing.
    pub fn new(server: mail_transport::ServerConfig) -> Self {
        Self {
            server,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            reconnect: ReconnectPolicy::default(),
        }
    }
}
