//! Tracing/logging initialization.
//!
//! Filters come from `RUST_LOG` when set, otherwise from the caller's default.

use tracing_subscriber::EnvFilter;

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// JSON logs + timestamps on stdout.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_json(default_directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Compact human-readable logs on stderr.
pub fn init_stderr(default_directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
