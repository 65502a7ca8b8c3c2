//! A failing statement rolls back every row the operation wrote

use std::time::Duration;

use portal_db_common::{
    Application, Blockchain, LoadBalancer, Patch, UpdateApplication, UpdateNotificationSettings,
};
use portal_db_persistence::{
    AggregateReader, AggregateWriter, Error, PersistenceError, Repository, Store,
};

use crate::common;

#[tokio::test]
async fn test_create_application_child_failure_rolls_back() {
    for table in [
        "app_limits",
        "gateway_aat",
        "gateway_settings",
        "notification_settings",
    ] {
        let (repo, store) = common::repository().await;
        let before = store.snapshot().await;
        store.fail_next_write(table);

        let err = AggregateWriter::<Application>::create(&repo, common::application())
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Persistence(PersistenceError::Injected(t)) if t == table),
            "unexpected error for {table}: {err}"
        );

        let after = store.snapshot().await;
        assert_eq!(after.row_count(), before.row_count(), "rows left behind by {table}");
        assert!(after.applications.is_empty());
    }
}

#[tokio::test]
async fn test_update_application_rolls_back_parent_change() {
    let (repo, store) = common::repository().await;
    let created = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    store.fail_next_write("notification_settings");

    let update = UpdateApplication {
        name: Patch::Set("renamed".to_string()),
        notification_settings: Some(UpdateNotificationSettings {
            quarter: Patch::Set(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    AggregateWriter::<Application>::update(&repo, &created.id, update)
        .await
        .unwrap_err();

    let apps = AggregateReader::<Application>::read_all(&repo).await.unwrap();
    assert_eq!(apps[0].name, "pokt-wallet");
    assert!(!apps[0].notification_settings.as_ref().unwrap().quarter);
}

#[tokio::test]
async fn test_create_load_balancer_join_failure_rolls_back() {
    let (repo, store) = common::repository().await;
    let app = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    let before = store.snapshot().await.row_count();
    store.fail_next_write("lb_apps");

    AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&[&app.id]))
        .await
        .unwrap_err();

    let after = store.snapshot().await;
    assert_eq!(after.row_count(), before);
    assert!(after.loadbalancers.is_empty());
    assert!(after.user_access.is_empty());
    assert!(after.stickiness_options.is_empty());
}

#[tokio::test]
async fn test_create_load_balancer_with_missing_app_rolls_back() {
    let (repo, store) = common::repository().await;
    let before = store.snapshot().await.row_count();

    let err = AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&["missing"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Persistence(PersistenceError::ForeignKeyViolation {
            table: "lb_apps",
            ..
        })
    ));
    assert_eq!(store.snapshot().await.row_count(), before);
}

#[tokio::test]
async fn test_create_blockchain_redirect_failure_rolls_back() {
    let (repo, store) = common::repository().await;
    let before = store.snapshot().await.row_count();
    store.fail_next_write("redirects");

    AggregateWriter::<Blockchain>::create(&repo, common::blockchain("0021"))
        .await
        .unwrap_err();

    let after = store.snapshot().await;
    assert_eq!(after.row_count(), before);
    assert!(after.blockchains.is_empty());
    assert!(after.sync_check_options.is_empty());
}

#[tokio::test]
async fn test_operation_times_out_while_store_is_busy() {
    let store = common::seeded_store().await;
    let repo = Repository::new(store.clone()).with_timeout(Duration::from_millis(50));

    // An open transaction holds the store until it is dropped
    let busy = store.begin().await.unwrap();
    let err = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Persistence(PersistenceError::Timeout {
            operation: "create_application",
            ..
        })
    ));
    drop(busy);

    assert!(store.snapshot().await.applications.is_empty());
    AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
}
