//! Tracing/logging setup shared by the API server and the CLI.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide JSON logging for long-running services.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_json("info");
}

/// Initialize logging for interactive tools.
///
/// Logs go to stderr so stdout stays clean for command output.
pub fn init_cli() {
    tracing::init_stderr("warn");
}
