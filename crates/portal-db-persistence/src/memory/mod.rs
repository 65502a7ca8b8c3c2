//! In-memory persistence backend
//!
//! Keeps every table in a `BTreeMap` behind one async mutex. A transaction
//! holds the lock for its whole lifetime and writes to a private copy of the
//! tables, which replaces the shared state on commit and is discarded on
//! rollback or drop. Primary-key uniqueness and the parent/child foreign keys
//! of the schema are enforced so constraint failures surface as they would in
//! PostgreSQL.
//!
//! Faults can be injected per table to exercise rollback paths.

mod application;
mod blockchain;
mod load_balancer;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::entity::{
    app_limits, applications, blockchains, gateway_aat, gateway_settings, lb_apps, loadbalancers,
    notification_settings, pay_plans, redirects, stickiness_options, sync_check_options,
    user_access,
};
use crate::error::PersistenceError;
use crate::traits::{Store, Transaction};

type Result<T> = std::result::Result<T, PersistenceError>;

/// Contents of every table
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub applications: BTreeMap<String, applications::Model>,
    pub app_limits: BTreeMap<String, app_limits::Model>,
    pub gateway_aat: BTreeMap<String, gateway_aat::Model>,
    pub gateway_settings: BTreeMap<String, gateway_settings::Model>,
    pub notification_settings: BTreeMap<String, notification_settings::Model>,
    pub pay_plans: BTreeMap<String, pay_plans::Model>,
    pub loadbalancers: BTreeMap<String, loadbalancers::Model>,
    pub stickiness_options: BTreeMap<String, stickiness_options::Model>,
    pub user_access: BTreeMap<(String, String), user_access::Model>,
    pub lb_apps: BTreeMap<(String, String), lb_apps::Model>,
    pub blockchains: BTreeMap<String, blockchains::Model>,
    pub sync_check_options: BTreeMap<String, sync_check_options::Model>,
    pub redirects: BTreeMap<(String, String), redirects::Model>,
}

impl Tables {
    /// Total number of rows across all tables
    pub fn row_count(&self) -> usize {
        self.applications.len()
            + self.app_limits.len()
            + self.gateway_aat.len()
            + self.gateway_settings.len()
            + self.notification_settings.len()
            + self.pay_plans.len()
            + self.loadbalancers.len()
            + self.stickiness_options.len()
            + self.user_access.len()
            + self.lb_apps.len()
            + self.blockchains.len()
            + self.sync_check_options.len()
            + self.redirects.len()
    }
}

/// In-memory store, cheap to clone; clones share the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<StdMutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the pay plan reference table
    pub async fn seed_pay_plans(&self, plans: impl IntoIterator<Item = pay_plans::Model>) {
        let mut tables = self.tables.lock().await;
        for plan in plans {
            tables.pay_plans.insert(plan.plan_type.clone(), plan);
        }
    }

    /// Make the next write to `table` fail with [`PersistenceError::Injected`]
    pub fn fail_next_write(&self, table: &str) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(table.to_string());
    }

    /// Copy of the committed state
    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction> {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTransaction {
            guard,
            work,
            faults: self.faults.clone(),
        })
    }
}

/// An open in-memory transaction
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
    faults: Arc<StdMutex<Vec<String>>>,
}

impl MemoryTransaction {
    /// Consume a pending fault for `table`, if one is armed
    fn check_fault(&self, table: &'static str) -> Result<()> {
        let mut faults = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        match faults.iter().position(|t| t == table) {
            Some(index) => {
                faults.remove(index);
                Err(PersistenceError::Injected(table))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> Result<()> {
        let MemoryTransaction {
            mut guard, work, ..
        } = self;
        *guard = work;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

/// Primary key of a stored row
trait RowKey: Ord + Clone {
    fn label(&self) -> String;
}

impl RowKey for String {
    fn label(&self) -> String {
        self.clone()
    }
}

impl RowKey for (String, String) {
    fn label(&self) -> String {
        format!("{}/{}", self.0, self.1)
    }
}

fn insert_unique<K: RowKey, V>(
    map: &mut BTreeMap<K, V>,
    table: &'static str,
    key: K,
    row: V,
) -> Result<()> {
    if map.contains_key(&key) {
        return Err(PersistenceError::UniqueViolation {
            table,
            key: key.label(),
        });
    }
    map.insert(key, row);
    Ok(())
}

fn require_parent<V>(parents: &BTreeMap<String, V>, table: &'static str, key: &str) -> Result<()> {
    if !parents.contains_key(key) {
        return Err(PersistenceError::ForeignKeyViolation {
            table,
            key: key.to_string(),
        });
    }
    Ok(())
}
