// src/logging.rs

//! Log subscriber setup: console output plus a rotating log file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::models::LoggingConfig;

/// Initialize console and rolling-file logging.
///
/// `RUST_LOG` overrides the configured level. Returns the appender guard;
/// the caller must keep it alive for the life of the process or buffered
/// file output is lost.
pub fn init(config: &LoggingConfig, verbose: bool) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { &config.level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = tracing_subscriber::fmt::layer();

    if config.console_only {
        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.dir, &config.file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Some(guard)
}
