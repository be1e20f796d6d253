//! Structured logging setup
//!
//! Library code only emits `tracing` events; the binary installs the
//! subscriber once at startup.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogConfig;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Builds the level filter; `RUST_LOG` wins over the configured level
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Initialise the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let layer = if config.json {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json()
                .with_filter(env_filter(config))
                .boxed()
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter(config))
                .boxed()
        };

        // Another subscriber may already be installed (tests, embedding apps)
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }

        tracing::debug!(event = "LOGGING_INITIALIZED", level = %config.level, json = config.json);
    });
}
