//! Turning the configuration file into watcher settings.

use std::path::PathBuf;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr as _, bail};

/// Everything the process needs from the configuration.
#[derive(Debug)]
pub struct Settings {
    /// Credentials store for every watcher.
    pub auth: authinfo::AuthInfoFile,

    /// One entry per watcher.
    pub watchers: Vec<mailbox_watcher::Config>,
}

/// Locate, read and resolve the configuration.
pub async fn load(cli_path: Option<PathBuf>) -> Result<Settings> {
    let env_path: Option<PathBuf> =
        envfury::maybe("MAIL_WATCHER_CONFIG").wrap_err("config path env var read")?;
    let paths: Vec<PathBuf> = config_paths::resolve(cli_path.or(env_path)).collect();

    let loaded = config_yaml::load_first(&paths).await?;
    tracing::info!(config_path = %loaded.path.display(), "loaded configuration");

    resolve(loaded.config)
}

/// Apply the defaults and check the configuration.
pub fn resolve(config: config_core::Config) -> Result<Settings> {
    if config.servers.is_empty() {
        bail!("no servers configured");
    }

    let auth = match config.authinfo {
        Some(path) => authinfo::AuthInfoFile::new(path),
        None => match authinfo::AuthInfoFile::at_default_path() {
            Some(auth) => auth,
            None => bail!("unable to locate the home directory for the credentials store"),
        },
    };

    let watchers = config
        .servers
        .into_iter()
        .map(watcher_config)
        .collect::<Result<_>>()?;

    Ok(Settings { auth, watchers })
}

fn map_tls_mode(server: &config_core::ServerConfig) -> mail_transport::TlsMode {
    match (server.use_tls, server.starttls) {
        (false, _) => mail_transport::TlsMode::Plain,
        (true, false) => mail_transport::TlsMode::Implicit,
        (true, true) => mail_transport::TlsMode::StartTls,
    }
}

fn map_reconnect(mode: config_core::ReconnectMode) -> mailbox_watcher::ReconnectPolicy {
    match mode {
        config_core::ReconnectMode::Auto => {
            mailbox_watcher::ReconnectPolicy::Backoff(mailbox_watcher::DEFAULT_BACKOFF)
        }
        config_core::ReconnectMode::Manual => mailbox_watcher::ReconnectPolicy::Manual,
    }
}

fn nonzero_secs(key: &str, host: &str, value: Option<u64>) -> Result<Option<Duration>> {
    match value {
        Some(0) => bail!("{host}: {key} must be positive"),
        Some(secs) => Ok(Some(Duration::from_secs(secs))),
        None => Ok(None),
    }
}

fn watcher_config(server: config_core::ServerConfig) -> Result<mailbox_watcher::Config> {
    if server.host.is_empty() {
        bail!("server with an empty host");
    }
    if server.starttls && !server.use_tls {
        tracing::warn!(imap_host = %server.host, "starttls ignored with use-tls disabled");
    }

    let tls_mode = map_tls_mode(&server);
    let reconnect = server.reconnect;
    let idle_timeout = nonzero_secs("idle-timeout-secs", &server.host, server.idle_timeout_secs)?
        .unwrap_or(mailbox_watcher::DEFAULT_IDLE_TIMEOUT);
    let connect_timeout =
        nonzero_secs("connect-timeout-secs", &server.host, server.connect_timeout_secs)?
            .unwrap_or(mail_transport::DEFAULT_CONNECT_TIMEOUT);

    let name = match server.name {
        Some(name) => name,
        None => mail_transport::short_name(&server.host).to_owned(),
    };

    let server_config = mail_transport::ServerConfig {
        name,
        port: server.port.unwrap_or_else(|| tls_mode.default_port()),
        tls_mode,
        mailbox: server.mailbox,
        connect_timeout,
        host: server.host,
    };

    Ok(mailbox_watcher::Config {
        server: server_config,
        idle_timeout,
        reconnect: map_reconnect(reconnect),
    })
}
