//! Log output setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Build the log dispatcher.
///
/// `RUST_LOG` directives take precedence over the level picked by `debug`.
pub fn dispatch(debug: bool) -> tracing::Dispatch {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    tracing::Dispatch::new(subscriber)
}
