//! File-backed credentials store.

use std::path::{Path, PathBuf};

/// The default store file name, relative to the home directory.
pub const DEFAULT_FILE_NAME: &str = ".authinfo";

/// Errors returned while looking up credentials in the store file.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The store file could not be read.
    #[error("failed to read credentials store {path}: {source}")]
    Read {
        /// Path to the store file.
        path: PathBuf,

        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No record for the host.
    #[error("no credentials for {host} in {path}")]
    NotFound {
        /// The host that was looked up.
        host: String,

        /// Path to the store file.
        path: PathBuf,
    },
}

/// The default store location, `~/.authinfo`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_FILE_NAME))
}

/// Credentials store backed by an `authinfo` file.
///
/// The file is re-read on every lookup, so edits take effect on the next
/// connect attempt.
#[derive(Debug, Clone)]
pub struct AuthInfoFile {
    /// Path to the store file.
    path: PathBuf,
}

impl AuthInfoFile {
    /// Use the store file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the store file at the default location, if the home directory is known.
    pub fn at_default_path() -> Option<Self> {
        default_path().map(Self::new)
    }

    /// The path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl crate::AuthProvider for AuthInfoFile {
    type Error = LookupError;

    async fn lookup(&self, host: &str) -> Result<crate::Credentials, Self::Error> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| LookupError::Read {
                    path: self.path.clone(),
                    source,
                })?;

        let credentials = crate::find(&contents, host).ok_or_else(|| LookupError::NotFound {
            host: host.to_owned(),
            path: self.path.clone(),
        })?;

        tracing::debug!(
            authinfo_path = %self.path.display(),
            imap_host = %host,
            user = %credentials.user,
            "found credentials"
        );

        Ok(credentials)
    }
}
