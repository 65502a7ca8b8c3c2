//! Console logging setup for services embedding the driver
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the host process. `init_logging` is a convenience for binaries and
//! tests that have no subscriber of their own.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Console logging options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set
    pub level: Level,
    /// Include the event target (module path)
    pub with_target: bool,
    /// ANSI colors
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: true,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Create from environment variables.
    ///
    /// `PORTAL_DB_LOG_LEVEL` sets the level, `PORTAL_DB_LOG_ANSI=false`
    /// disables colors.
    pub fn from_env() -> Self {
        let level = std::env::var("PORTAL_DB_LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::INFO);

        let ansi = std::env::var("PORTAL_DB_LOG_ANSI")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        Self {
            level,
            ansi,
            ..Self::default()
        }
    }
}

/// Install the global subscriber: a formatted console layer filtered by
/// `RUST_LOG`, falling back to the configured level.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let console_layer = fmt::layer()
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .with_filter(filter);

    Registry::default().with(console_layer).try_init()?;

    tracing::debug!(level = %config.level, "Logging initialized");
    Ok(())
}
