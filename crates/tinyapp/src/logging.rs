//! Logging setup.
//!
//! The tinyapp crates only emit `tracing` events. Binaries call [`init`] once
//! at startup to print them on stderr; tests call [`init_test_logging`].

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_TEST_LOGGING: Once = Once::new();

/// Maps a `-v` count to a default filter directive.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Builds the filter: `RUST_LOG` if set and valid, otherwise the level for
/// `verbosity`.
pub fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity).to_string()))
}

/// Installs a stderr subscriber.
///
/// Does nothing if a global subscriber is already set.
pub fn init(verbosity: u8) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(verbosity, "logging initialized");
    }
}

/// Initializes logging for tests, once per process.
///
/// Uses `level` if given, else `RUST_LOG`; with neither, stays silent.
pub fn init_test_logging(level: Option<Level>) {
    INIT_TEST_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
