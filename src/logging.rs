//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing-subscriber` so they never mix
//! with the rendered views on stdout. `RUST_LOG` takes precedence; otherwise
//! the configured level applies to this crate only.

use tracing_subscriber::EnvFilter;

use crate::config::schema::LogLevel;

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(level: LogLevel, verbose: bool) {
    let level = if verbose { LogLevel::Debug } else { level };
    let default_directive = format!("callboard={level}");

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&default_directive))
                .unwrap_or_else(|_| EnvFilter::new("callboard=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
