//! Logging bootstrap for the `chatpulse` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Logs go to stderr so they never mix with report output on
//! stdout.

use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use crate::config::LoggingConfig;

/// Initialize the logging system.
///
/// Sets up tracing with:
/// - Output to stderr, without timestamps
/// - Level from `RUST_LOG` when set, else `debug` when `verbose`, else the
///   configured level
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&config.level)
        }
    });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %config.level, verbose, "logging initialized");
    }
}

/// Initialize logging for tests (logs to the test writer).
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}
