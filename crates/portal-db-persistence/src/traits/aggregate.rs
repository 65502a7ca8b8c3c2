//! Aggregate capability traits
//!
//! Consumers depend on these rather than on a concrete repository, so a
//! driver can be swapped for any other implementation in tests.

use async_trait::async_trait;
use portal_db_common::Aggregate;

use crate::error::Result;

/// Create, partially update and soft-remove aggregates of type `T`
#[async_trait]
pub trait AggregateWriter<T: Aggregate>: Send + Sync {
    /// Validate, assign a fresh id and write all rows in one transaction
    async fn create(&self, entity: T) -> Result<T>;

    /// Apply a partial update in one transaction
    async fn update(&self, id: &str, update: T::Update) -> Result<()>;

    /// Soft delete
    async fn remove(&self, id: &str) -> Result<()>;
}

/// Read whole aggregates of type `T`
#[async_trait]
pub trait AggregateReader<T: Aggregate>: Send + Sync {
    async fn read_all(&self) -> Result<Vec<T>>;
}
