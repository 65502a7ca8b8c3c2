//! SQL persistence backend (PostgreSQL via SeaORM)
//!
//! `SqlStore` wraps a SeaORM `DatabaseConnection`; every unit of work runs
//! inside a `SqlTransaction` that implements the row-level query traits.

mod application;
mod blockchain;
mod load_balancer;

use async_trait::async_trait;
use portal_db_common::Patch;
use sea_orm::*;

use crate::error::PersistenceError;
use crate::traits::{Store, Transaction};

/// External database store
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    /// Create a new SqlStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl Store for SqlStore {
    type Tx = SqlTransaction;

    async fn begin(&self) -> Result<SqlTransaction, PersistenceError> {
        let tx = self.db.begin().await?;
        Ok(SqlTransaction { tx })
    }
}

/// An open database transaction
///
/// SeaORM rolls the transaction back when it is dropped uncommitted.
pub struct SqlTransaction {
    tx: DatabaseTransaction,
}

#[async_trait]
impl Transaction for SqlTransaction {
    async fn commit(self) -> Result<(), PersistenceError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), PersistenceError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Nullable column value for a patch field
fn patch_value<V>(patch: Patch<V>) -> ActiveValue<Option<V>>
where
    Option<V>: Into<Value>,
{
    match patch {
        Patch::Unchanged => ActiveValue::NotSet,
        Patch::Clear => ActiveValue::Set(None),
        Patch::Set(value) => ActiveValue::Set(Some(value)),
    }
}

/// Non-null column value for a patch field; clearing is rejected upstream
fn required_value<V: Into<Value>>(patch: Patch<V>) -> ActiveValue<V> {
    match patch {
        Patch::Set(value) => ActiveValue::Set(value),
        Patch::Unchanged | Patch::Clear => ActiveValue::NotSet,
    }
}

/// Collects the columns an upsert must overwrite on conflict
struct Supplied<C>(Vec<C>);

impl<C> Supplied<C> {
    fn new() -> Self {
        Self(Vec::new())
    }

    /// Like [`patch_value`], recording `column` when the field was supplied
    fn value<V>(&mut self, patch: Patch<V>, column: C) -> ActiveValue<Option<V>>
    where
        Option<V>: Into<Value>,
    {
        if patch.is_supplied() {
            self.0.push(column);
        }
        patch_value(patch)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_columns(self) -> Vec<C> {
        self.0
    }
}
