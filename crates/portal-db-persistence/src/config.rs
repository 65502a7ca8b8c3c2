//! Driver configuration
//!
//! Values are layered: built-in defaults, then an optional `conf/portal-db`
//! file (any format the `config` crate understands), then `PORTAL_DB_*`
//! environment variables, e.g. `PORTAL_DB_URL` or
//! `PORTAL_DB_MAX_CONNECTIONS`.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use portal_db_common::EVENTS_CHANNEL;
use sea_orm::ConnectOptions;
use serde::Deserialize;

/// Default location of the optional configuration file, without extension
pub const DEFAULT_CONFIG_FILE: &str = "conf/portal-db";

/// Prefix of the environment variables read by [`DriverConfig::load`]
pub const ENV_PREFIX: &str = "PORTAL_DB";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// PostgreSQL connection string
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Log every statement at debug level
    pub sqlx_logging: bool,
    /// Pub/sub channel carrying change events
    pub listen_channel: String,
    /// Bound on a single repository operation
    pub operation_timeout_ms: u64,
    /// Pause after a listener error before receiving again
    pub reconnect_delay_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 10 * 60,
            max_lifetime_secs: 1800,
            sqlx_logging: false,
            listen_channel: EVENTS_CHANNEL.to_string(),
            operation_timeout_ms: 30_000,
            reconnect_delay_ms: 1_000,
        }
    }
}

impl DriverConfig {
    /// Load from `conf/portal-db` (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_config(&config)
    }

    /// Read from an already built configuration; missing keys keep their
    /// defaults
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.clone().try_deserialize()
    }

    /// Defaults with the given connection string
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// SeaORM connection pool options
    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());

        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            connect_timeout = self.connect_timeout_secs,
            idle_timeout = self.idle_timeout_secs,
            max_lifetime = self.max_lifetime_secs,
            sqlx_logging = self.sqlx_logging,
            "Database connection pool configured"
        );

        opt
    }
}
