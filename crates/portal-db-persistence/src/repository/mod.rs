//! Aggregate repository
//!
//! `Repository` turns whole aggregates and partial updates into row-level
//! store calls. Every write validates its input before any I/O, then runs
//! inside a single store transaction that is committed on success and
//! rolled back on the first failure. Each operation is bounded by the
//! configured operation timeout; when it elapses the in-flight future is
//! dropped, which discards the open transaction.

mod application;
mod blockchain;
mod load_balancer;

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{PersistenceError, Result};
use crate::traits::{Store, Transaction};

/// Default bound on a single repository operation
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Transactional reader and writer for all aggregates
pub struct Repository<S: Store> {
    store: S,
    operation_timeout: Duration,
}

impl<S: Store> Repository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Set the bound applied to every operation
    pub fn with_timeout(mut self, operation_timeout: Duration) -> Self {
        self.operation_timeout = operation_timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Run `work` under the operation timeout
    async fn deadline<T, F>(&self, operation: &'static str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        match tokio::time::timeout(self.operation_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(PersistenceError::Timeout {
                operation,
                timeout: self.operation_timeout,
            }
            .into()),
        }
    }
}

/// Commit `tx` if `result` is a success, otherwise roll it back and return
/// the original error
async fn finish<T, X: Transaction>(operation: &'static str, tx: X, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(operation, error = %rollback_err, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}
