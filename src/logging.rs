//! Logging setup
//!
//! Optional tracing initialization for binaries embedding the engine.
//! Library code only emits `tracing` events and never installs a
//! subscriber on its own.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize console logging at `info` level
///
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    init_with_filter("info");
}

/// Initialize console logging with an explicit default filter
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Initialize daily-rolling file logging
///
/// Returns the worker guard; dropping it flushes and stops the writer,
/// so hold it for the lifetime of the process.
pub fn init_file_logging(dir: impl AsRef<Path>, file_prefix: &str) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(dir.as_ref(), file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    guard
}
