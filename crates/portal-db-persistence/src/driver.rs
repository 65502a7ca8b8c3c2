//! Driver facade
//!
//! `Driver` owns a [`Repository`] and the [`ChangeListener`] feeding the
//! notification queue. Services depend on the capability traits
//! ([`AggregateWriter`], [`AggregateReader`]) it implements, or on the named
//! operations below.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use portal_db_common::{
    Aggregate, Application, Blockchain, LoadBalancer, Notification, PayPlan, Redirect, RoleName,
    UpdateApplication, UpdateBlockchain, UpdateFirstDateSurpassed, UpdateLoadBalancer, UserAccess,
};
use sea_orm::{Database, DatabaseConnection};
use tokio::sync::{Mutex, mpsc};
use tracing::{error, info};

use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::listener::{
    ChangeListener, EventSource, ListenerCounts, ListenerMetrics, ListenerOptions,
    NOTIFICATION_BUFFER, PgEventSource,
};
use crate::repository::Repository;
use crate::sql::SqlStore;
use crate::traits::{AggregateReader, AggregateWriter, Store};

pub struct Driver<S: Store> {
    repository: Repository<S>,
    listener: Mutex<Option<ChangeListener>>,
    notifications: StdMutex<Option<mpsc::Receiver<Notification>>>,
    metrics: Arc<ListenerMetrics>,
}

impl Driver<SqlStore> {
    /// Connect to PostgreSQL and subscribe to change notifications
    ///
    /// Fails with [`Error::Subscribe`] when the subscription cannot be set up.
    pub async fn connect(config: &DriverConfig) -> Result<Self> {
        let db = Database::connect(config.connect_options()).await?;
        info!(channel = %config.listen_channel, "Connected to database");
        Self::from_database(db, config).await
    }

    /// Build a driver on an existing connection
    ///
    /// # Panics
    ///
    /// Panics if the change notification subscription cannot be set up; the
    /// service cannot keep its caches consistent without it.
    pub async fn from_connection(db: DatabaseConnection, config: &DriverConfig) -> Self {
        match Self::from_database(db, config).await {
            Ok(driver) => driver,
            Err(e) => {
                error!(error = %e, "Change notification subscription failed");
                panic!("cannot start change listener: {e}");
            }
        }
    }

    async fn from_database(db: DatabaseConnection, config: &DriverConfig) -> Result<Self> {
        let source = PgEventSource::connect(&db)
            .await
            .map_err(Error::Subscribe)?;
        Self::start(SqlStore::new(db), source, config).await
    }
}

impl<S: Store> Driver<S> {
    /// Start a driver on any store and event source
    pub async fn start<E: EventSource>(store: S, source: E, config: &DriverConfig) -> Result<Self> {
        let (tx, rx) = mpsc::channel(NOTIFICATION_BUFFER);
        let listener = ChangeListener::start(source, ListenerOptions::from(config), tx)
            .await
            .map_err(Error::Subscribe)?;
        let metrics = listener.metrics();

        Ok(Self {
            repository: Repository::new(store).with_timeout(config.operation_timeout()),
            listener: Mutex::new(Some(listener)),
            notifications: StdMutex::new(Some(rx)),
            metrics,
        })
    }

    /// The receiving end of the notification queue
    ///
    /// Handed out once; later calls return `None`.
    pub fn notification_channel(&self) -> Option<mpsc::Receiver<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn metrics(&self) -> ListenerCounts {
        self.metrics.snapshot()
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    /// Stop the change listener; the notification queue closes once pending
    /// deliveries are cancelled. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let listener = self.listener.lock().await.take();
        if let Some(listener) = listener {
            listener.shutdown().await;
            info!("Driver shut down");
        }
    }

    pub async fn read_applications(&self) -> Result<Vec<Application>> {
        AggregateReader::<Application>::read_all(&self.repository).await
    }

    pub async fn write_application(&self, app: Application) -> Result<Application> {
        AggregateWriter::<Application>::create(&self.repository, app).await
    }

    pub async fn update_application(&self, id: &str, update: UpdateApplication) -> Result<()> {
        AggregateWriter::<Application>::update(&self.repository, id, update).await
    }

    pub async fn update_first_date_surpassed(&self, update: UpdateFirstDateSurpassed) -> Result<()> {
        self.repository.update_first_date_surpassed(update).await
    }

    pub async fn remove_application(&self, id: &str) -> Result<()> {
        AggregateWriter::<Application>::remove(&self.repository, id).await
    }

    pub async fn read_pay_plans(&self) -> Result<Vec<PayPlan>> {
        self.repository.read_pay_plans().await
    }

    pub async fn read_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        AggregateReader::<LoadBalancer>::read_all(&self.repository).await
    }

    pub async fn write_load_balancer(&self, lb: LoadBalancer) -> Result<LoadBalancer> {
        AggregateWriter::<LoadBalancer>::create(&self.repository, lb).await
    }

    pub async fn update_load_balancer(&self, id: &str, update: UpdateLoadBalancer) -> Result<()> {
        AggregateWriter::<LoadBalancer>::update(&self.repository, id, update).await
    }

    pub async fn remove_load_balancer(&self, id: &str) -> Result<()> {
        AggregateWriter::<LoadBalancer>::remove(&self.repository, id).await
    }

    pub async fn write_load_balancer_user(&self, lb_id: &str, user: UserAccess) -> Result<()> {
        self.repository.write_load_balancer_user(lb_id, user).await
    }

    pub async fn update_user_access_role(
        &self,
        lb_id: &str,
        user_id: &str,
        role: RoleName,
    ) -> Result<()> {
        self.repository
            .update_user_access_role(lb_id, user_id, role)
            .await
    }

    pub async fn remove_user_access(&self, lb_id: &str, user_id: &str) -> Result<()> {
        self.repository.remove_user_access(lb_id, user_id).await
    }

    pub async fn read_blockchains(&self) -> Result<Vec<Blockchain>> {
        AggregateReader::<Blockchain>::read_all(&self.repository).await
    }

    pub async fn write_blockchain(&self, chain: Blockchain) -> Result<Blockchain> {
        AggregateWriter::<Blockchain>::create(&self.repository, chain).await
    }

    pub async fn update_blockchain(&self, id: &str, update: UpdateBlockchain) -> Result<()> {
        AggregateWriter::<Blockchain>::update(&self.repository, id, update).await
    }

    pub async fn activate_blockchain(&self, id: &str, active: bool) -> Result<()> {
        self.repository.activate_blockchain(id, active).await
    }

    pub async fn write_redirect(&self, redirect: Redirect) -> Result<Redirect> {
        self.repository.write_redirect(redirect).await
    }

    pub async fn remove_redirect(&self, blockchain_id: &str, domain: &str) -> Result<()> {
        self.repository.remove_redirect(blockchain_id, domain).await
    }
}

#[async_trait]
impl<S, T> AggregateWriter<T> for Driver<S>
where
    S: Store,
    T: Aggregate,
    Repository<S>: AggregateWriter<T>,
{
    async fn create(&self, entity: T) -> Result<T> {
        AggregateWriter::<T>::create(&self.repository, entity).await
    }

    async fn update(&self, id: &str, update: T::Update) -> Result<()> {
        AggregateWriter::<T>::update(&self.repository, id, update).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        AggregateWriter::<T>::remove(&self.repository, id).await
    }
}

#[async_trait]
impl<S, T> AggregateReader<T> for Driver<S>
where
    S: Store,
    T: Aggregate,
    Repository<S>: AggregateReader<T>,
{
    async fn read_all(&self) -> Result<Vec<T>> {
        AggregateReader::<T>::read_all(&self.repository).await
    }
}
