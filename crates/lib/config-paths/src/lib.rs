//! Default configuration file paths for mail-watcher.

use std::path::PathBuf;

use either::Either;

/// Returns an iterator over default configuration file paths.
///
/// The paths are yielded in order of preference:
/// 1. User-specific config directory (XDG standard)
/// 2. User-specific config in home directory (fallback)
/// 3. System-wide config
pub fn defaults() -> impl Iterator<Item = PathBuf> {
    let config_path = dirs::config_dir().into_iter().flat_map(|d| {
        [
            d.join("mail-watcher/config.yaml"),
            d.join("mail-watcher.yaml"),
        ]
    });
    let home_path = dirs::home_dir()
        .into_iter()
        .map(|d| d.join(".mail-watcher.yaml"));
    let system_path = std::iter::once_with(|| PathBuf::from("/etc/mail-watcher/config.yaml"));

    config_path.chain(home_path).chain(system_path)
}

/// Resolves configuration paths based on an explicit override or defaults.
///
/// An override yields only itself; otherwise the defaults are yielded.
pub fn resolve(override_path: Option<PathBuf>) -> impl Iterator<Item = PathBuf> {
    match override_path {
        Some(val) => Either::Left(std::iter::once(val)),
        None => Either::Right(defaults()),
    }
}
