//! Store traits for the persistence layer
//!
//! The row-level traits (`ApplicationQueries`, `LoadBalancerQueries`,
//! `BlockchainQueries`) are implemented by a backend's transaction type. The
//! aggregate-level traits (`AggregateWriter`, `AggregateReader`) are
//! implemented by the repository and the driver on top of them.

pub mod aggregate;
pub mod application;
pub mod blockchain;
pub mod load_balancer;

pub use aggregate::{AggregateReader, AggregateWriter};
pub use application::ApplicationQueries;
pub use blockchain::BlockchainQueries;
pub use load_balancer::LoadBalancerQueries;

use async_trait::async_trait;

use crate::error::PersistenceError;

/// A storage backend able to open transactions
#[async_trait]
pub trait Store: Send + Sync + 'static {
    type Tx: Transaction;

    /// Open a new transaction
    async fn begin(&self) -> Result<Self::Tx, PersistenceError>;
}

/// An open transaction
///
/// Dropping a transaction without committing discards its writes.
#[async_trait]
pub trait Transaction:
    ApplicationQueries + LoadBalancerQueries + BlockchainQueries + Send + Sized
{
    async fn commit(self) -> Result<(), PersistenceError>;

    async fn rollback(self) -> Result<(), PersistenceError>;
}
