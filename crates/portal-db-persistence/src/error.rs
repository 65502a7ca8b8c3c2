//! Error types for the persistence layer
//!
//! - `PersistenceError`: failures of a storage backend or the event source
//! - `Error`: everything a driver operation can fail with

use std::time::Duration;

use portal_db_common::ValidationError;
use sea_orm::DbErr;

/// Storage and subscription failures
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("listener error: {0}")]
    Listener(#[from] sea_orm::sqlx::Error),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("cannot encode {table}.{column}: {source}")]
    Encoding {
        table: &'static str,
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate key '{key}' in {table}")]
    UniqueViolation { table: &'static str, key: String },

    #[error("{table} row references missing key '{key}'")]
    ForeignKeyViolation { table: &'static str, key: String },

    #[error("injected fault on {0}")]
    Injected(&'static str),

    #[error("event source closed")]
    SourceClosed,

    #[error("event source error: {0}")]
    Source(String),
}

/// Errors returned by repository and driver operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("failed to subscribe to change notifications: {0}")]
    Subscribe(#[source] PersistenceError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        Error::Persistence(PersistenceError::Database(value))
    }
}

impl Error {
    /// The validation failure, if this error is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
