//! Tracing subscriber setup
//!
//! Logs go to stderr so they never interleave with the interactive output on
//! stdout. `RUST_LOG` takes precedence over the configured level.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    if result.is_ok() {
        tracing::debug!(level, format = %config.format, "Logging initialized");
    }
}
