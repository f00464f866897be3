//! YAML configuration loading for mail-watcher.

use std::path::{Path, PathBuf};

use config_core::Config;

/// Errors returned while loading YAML configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No configuration file found in any of the provided paths.
    #[error("no config file found in paths: {paths:?}")]
    NotFound {
        /// The paths that were tried.
        paths: Vec<PathBuf>,
    },

    /// Failed to read the YAML file from disk.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path to the configuration file.
        path: PathBuf,

        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the YAML contents.
    #[error("failed to parse YAML config {path}: {source}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,

        /// Underlying YAML parse error.
        #[source]
        source: serde_yaml_bw::Error,
    },
}

/// A loaded configuration and the file it came from.
#[derive(Debug)]
pub struct Loaded {
    /// The parsed configuration.
    pub config: Config,

    /// The file it was read from.
    pub path: PathBuf,
}

/// Load configuration from the first existing file in `paths`.
///
/// Missing files are skipped; any other read error stops the search.
pub async fn load_first<P>(paths: &[P]) -> Result<Loaded, LoadError>
where
    P: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let config = parse_str(&contents).map_err(|source| LoadError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
                return Ok(Loaded {
                    config,
                    path: path.to_path_buf(),
                });
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    Err(LoadError::NotFound {
        paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
    })
}

/// Parse configuration directly from a YAML string.
pub fn parse_str(contents: &str) -> Result<Config, serde_yaml_bw::Error> {
    serde_yaml_bw::from_str(contents)
}
