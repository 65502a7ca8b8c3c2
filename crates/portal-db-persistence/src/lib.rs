//! Portal DB Persistence - Transactional aggregate storage and change notifications
//!
//! This crate provides:
//! - SeaORM entity definitions for every portal table
//! - Row-level store traits with PostgreSQL and in-memory backends
//! - The aggregate repository (create, partial update, soft remove, read)
//! - The change listener decoding `LISTEN events` payloads into a bounded queue
//! - The `Driver` facade composing both, plus configuration and logging setup

pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod listener;
pub mod logging;
pub mod memory;
pub mod model;
pub mod repository;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

pub use config::DriverConfig;
pub use driver::Driver;
pub use error::{Error, PersistenceError, Result};
pub use listener::{
    ChangeListener, ChannelFeeder, ChannelSource, EventSource, ListenerCounts, ListenerOptions,
    NOTIFICATION_BUFFER, PgEventSource,
};
pub use logging::{LoggingConfig, init_logging};
pub use memory::MemoryStore;
pub use repository::Repository;
pub use sql::SqlStore;
pub use traits::{
    AggregateReader, AggregateWriter, ApplicationQueries, BlockchainQueries, LoadBalancerQueries,
    Store, Transaction,
};
