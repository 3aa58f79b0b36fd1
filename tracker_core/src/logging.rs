//! Logging infrastructure for Liftlog.
//!
//! Provides centralized tracing setup for the CLI and embedding hosts.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at INFO; RUST_LOG takes precedence
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific default level
///
/// Output goes to stderr so command output on stdout stays machine-readable.
/// Calling this more than once is harmless.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
