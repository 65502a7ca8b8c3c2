//! PostgreSQL persistence tests
//!
//! Rows are tagged with unique names so the suite can share a database with
//! concurrent runs.

use std::time::Duration;

use portal_db_common::{
    AppStatus, Application, LoadBalancer, Patch, PayPlanType, Payload, RoleName, Table,
    UpdateApplication, UpdateNotificationSettings, ValidationError,
};
use portal_db_persistence::entity::prelude::*;
use portal_db_persistence::entity::{loadbalancers, user_access};
use portal_db_persistence::{AggregateReader, AggregateWriter, Driver, Repository, SqlStore};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tokio::time::timeout;

use crate::common::{self, FREETIER_DAILY_LIMIT, TestDatabase, unique_test_id};

fn repository(db: &TestDatabase) -> Repository<SqlStore> {
    Repository::new(SqlStore::new(db.conn().clone()))
}

/// Test application create, partial update, remove and read
#[tokio::test]
#[ignore = "requires test database"]
async fn test_application_round_trip() {
    let db = TestDatabase::from_env()
        .await
        .expect("Database connection failed");
    let repo = repository(&db);

    let mut app = common::application();
    app.name = format!("app_{}", unique_test_id());
    let created = AggregateWriter::<Application>::create(&repo, app)
        .await
        .unwrap();

    let update = UpdateApplication {
        notification_settings: Some(UpdateNotificationSettings {
            quarter: Patch::Set(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    AggregateWriter::<Application>::update(&repo, &created.id, update)
        .await
        .unwrap();

    let app = AggregateReader::<Application>::read_all(&repo)
        .await
        .unwrap()
        .into_iter()
        .find(|a| a.id == created.id)
        .unwrap();
    assert_eq!(app.name, created.name);
    assert_eq!(app.daily_limit(), FREETIER_DAILY_LIMIT);
    assert_eq!(
        app.limit.as_ref().unwrap().pay_plan.plan_type,
        Some(PayPlanType::FreetierV0)
    );
    assert_eq!(
        app.gateway_settings.as_ref().unwrap().whitelist_contracts,
        created.gateway_settings.as_ref().unwrap().whitelist_contracts
    );
    let notifications = app.notification_settings.unwrap();
    assert!(notifications.quarter && notifications.half);

    AggregateWriter::<Application>::remove(&repo, &created.id)
        .await
        .unwrap();
    let row = Applications::find_by_id(created.id.clone())
        .one(db.conn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        row.status.as_deref(),
        Some(AppStatus::AwaitingGracePeriod.as_str())
    );
}

/// Test a foreign key failure rolls back the whole load balancer
#[tokio::test]
#[ignore = "requires test database"]
async fn test_load_balancer_rollback_on_missing_app() {
    let db = TestDatabase::from_env()
        .await
        .expect("Database connection failed");
    let repo = repository(&db);

    let mut lb = common::load_balancer(&["missing-app"]);
    lb.name = format!("lb_{}", unique_test_id());
    let name = lb.name.clone();

    let err = AggregateWriter::<LoadBalancer>::create(&repo, lb)
        .await
        .unwrap_err();
    assert!(err.as_validation().is_none());

    let stored = Loadbalancers::find()
        .filter(loadbalancers::Column::Name.eq(name))
        .count(db.conn())
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

/// Test owner assignment and role changes on stored user access rows
#[tokio::test]
#[ignore = "requires test database"]
async fn test_load_balancer_users() {
    let db = TestDatabase::from_env()
        .await
        .expect("Database connection failed");
    let repo = repository(&db);

    let mut lb = common::load_balancer(&[]);
    lb.name = format!("lb_{}", unique_test_id());
    let created = AggregateWriter::<LoadBalancer>::create(&repo, lb)
        .await
        .unwrap();

    let owner = UserAccess::find_by_id((created.id.clone(), "user-1".to_string()))
        .one(db.conn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner.role_name, RoleName::Owner.as_str());

    let err = repo
        .update_user_access_role(&created.id, "user-2", RoleName::Owner)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::CannotSetToOwner));

    let err = repo
        .remove_user_access(&created.id, "user-1")
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::CannotChangeOwner));

    repo.remove_user_access(&created.id, "user-2").await.unwrap();
    let remaining = UserAccess::find()
        .filter(user_access::Column::LbId.eq(created.id.clone()))
        .count(db.conn())
        .await
        .unwrap();
    assert_eq!(remaining, 1);
}

/// Test trigger notifications reach the driver's queue
#[tokio::test]
#[ignore = "requires test database"]
async fn test_driver_receives_notifications() {
    let db = TestDatabase::from_env()
        .await
        .expect("Database connection failed");
    let driver = Driver::connect(&db.driver_config()).await.unwrap();
    let mut rx = driver.notification_channel().unwrap();

    let id = unique_test_id();
    driver.write_blockchain(common::blockchain(&id)).await.unwrap();

    let mut tables = Vec::new();
    timeout(Duration::from_secs(10), async {
        while let Some(notification) = rx.recv().await {
            let ours = match &notification.data {
                Payload::Blockchain(chain) => chain.id == id,
                Payload::SyncCheckOptions(options) => options.blockchain_id == id,
                Payload::Redirect(redirect) => redirect.blockchain_id == id,
                _ => false,
            };
            if ours {
                tables.push(notification.table);
            }
            if tables.len() == 3 {
                break;
            }
        }
    })
    .await
    .expect("notifications never arrived");

    tables.sort();
    assert_eq!(
        tables,
        vec![Table::Blockchains, Table::Redirects, Table::SyncCheckOptions]
    );
    driver.shutdown().await;
}
