//! Load balancer aggregate tests against the in-memory store

use portal_db_common::{
    Application, LoadBalancer, Patch, RoleName, UpdateLoadBalancer, UpdateStickyOptions,
    UserAccess, ValidationError,
};
use portal_db_persistence::{AggregateReader, AggregateWriter, MemoryStore, Repository};

use crate::common;

async fn read_one(repo: &Repository<MemoryStore>, id: &str) -> LoadBalancer {
    AggregateReader::<LoadBalancer>::read_all(repo)
        .await
        .unwrap()
        .into_iter()
        .find(|lb| lb.id == id)
        .expect("load balancer not found")
}

/// A repository holding one application, plus that application's id
async fn repository_with_app() -> (Repository<MemoryStore>, MemoryStore, String) {
    let (repo, store) = common::repository().await;
    let app = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    (repo, store, app.id)
}

#[tokio::test]
async fn test_create_makes_first_user_owner() {
    let (repo, _store, app_id) = repository_with_app().await;

    let created = AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&[&app_id]))
        .await
        .unwrap();
    assert_eq!(created.user_id, "user-1");
    assert_eq!(created.users[0].role_name, Some(RoleName::Owner));
    assert_eq!(created.users[1].role_name, Some(RoleName::Admin));

    let lb = read_one(&repo, &created.id).await;
    assert_eq!(lb.name, "wallet-lb");
    assert_eq!(lb.user_id, "user-1");
    assert_eq!(lb.request_timeout, 5_000);
    assert!(lb.gigastake);
    assert!(!lb.gigastake_redirect);
    assert_eq!(lb.application_ids, vec![app_id]);

    assert_eq!(lb.users.len(), 2);
    assert_eq!(lb.users[0].user_id, "user-1");
    assert_eq!(lb.users[0].role_name, Some(RoleName::Owner));
    assert_eq!(lb.users[0].email, "owner@example.com");
    assert_eq!(lb.users[1].role_name, Some(RoleName::Admin));

    let sticky = lb.sticky_options.unwrap();
    assert_eq!(sticky.id, created.id);
    assert_eq!(sticky.sticky_origins, vec!["chrome-extension://"]);
    assert_eq!(sticky.sticky_max, 300);
    assert!(sticky.stickiness);
}

#[tokio::test]
async fn test_create_keeps_explicit_user_id() {
    let (repo, _store) = common::repository().await;

    let mut lb = common::load_balancer(&[]);
    lb.user_id = "account-9".to_string();
    lb.sticky_options = None;
    let created = AggregateWriter::<LoadBalancer>::create(&repo, lb)
        .await
        .unwrap();

    let lb = read_one(&repo, &created.id).await;
    assert_eq!(lb.user_id, "account-9");
    assert!(lb.application_ids.is_empty());
    assert!(lb.sticky_options.is_none());
}

#[tokio::test]
async fn test_create_requires_valid_users() {
    let (repo, store) = common::repository().await;
    let before = store.snapshot().await.row_count();

    let mut lb = common::load_balancer(&[]);
    lb.users.clear();
    let err = AggregateWriter::<LoadBalancer>::create(&repo, lb)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::LoadBalancerMustHaveUser)
    );

    let mut lb = common::load_balancer(&[]);
    lb.users[1].role_name = Some(RoleName::Owner);
    let err = AggregateWriter::<LoadBalancer>::create(&repo, lb)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::CannotSetToOwner));

    let mut lb = common::load_balancer(&[]);
    lb.users[0].email.clear();
    let err = AggregateWriter::<LoadBalancer>::create(&repo, lb)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingRequiredField("email"))
    );

    assert_eq!(store.snapshot().await.row_count(), before);
}

#[tokio::test]
async fn test_user_access_lifecycle() {
    let (repo, _store) = common::repository().await;
    let created = AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&[]))
        .await
        .unwrap();

    repo.write_load_balancer_user(
        &created.id,
        UserAccess::new("user-3", RoleName::Member, "member@example.com"),
    )
    .await
    .unwrap();
    let lb = read_one(&repo, &created.id).await;
    assert_eq!(lb.users.len(), 3);
    assert_eq!(lb.users[0].role_name, Some(RoleName::Owner));

    repo.update_user_access_role(&created.id, "user-3", RoleName::Admin)
        .await
        .unwrap();
    let lb = read_one(&repo, &created.id).await;
    let user = lb.users.iter().find(|u| u.user_id == "user-3").unwrap();
    assert_eq!(user.role_name, Some(RoleName::Admin));

    repo.remove_user_access(&created.id, "user-3").await.unwrap();
    let lb = read_one(&repo, &created.id).await;
    assert!(lb.users.iter().all(|u| u.user_id != "user-3"));
    assert_eq!(lb.users.len(), 2);
}

#[tokio::test]
async fn test_ownership_cannot_be_granted() {
    let (repo, store) = common::repository().await;
    let created = AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&[]))
        .await
        .unwrap();
    let before = store.snapshot().await.row_count();

    let err = repo
        .write_load_balancer_user(
            &created.id,
            UserAccess::new("user-3", RoleName::Owner, "thief@example.com"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::CannotSetToOwner));

    let err = repo
        .update_user_access_role(&created.id, "user-2", RoleName::Owner)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::CannotSetToOwner));

    let err = repo
        .update_user_access_role(&created.id, "user-2", RoleName::from("SUPERUSER"))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::InvalidRole("SUPERUSER".to_string()))
    );

    assert_eq!(store.snapshot().await.row_count(), before);
    let lb = read_one(&repo, &created.id).await;
    assert_eq!(lb.users[1].role_name, Some(RoleName::Admin));
}

#[tokio::test]
async fn test_owner_cannot_be_demoted_or_removed() {
    let (repo, store) = common::repository().await;
    let created = AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&[]))
        .await
        .unwrap();
    let before = store.snapshot().await.row_count();

    let err = repo
        .update_user_access_role(&created.id, "user-1", RoleName::Member)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::CannotChangeOwner));

    let err = repo
        .remove_user_access(&created.id, "user-1")
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::CannotChangeOwner));

    assert_eq!(store.snapshot().await.row_count(), before);
    let lb = read_one(&repo, &created.id).await;
    let owners: Vec<&str> = lb
        .users
        .iter()
        .filter(|user| user.role_name == Some(RoleName::Owner))
        .map(|user| user.user_id.as_str())
        .collect();
    assert_eq!(owners, vec!["user-1"]);

    // Other users stay editable
    repo.update_user_access_role(&created.id, "user-2", RoleName::Member)
        .await
        .unwrap();
    repo.remove_user_access(&created.id, "user-2").await.unwrap();
    assert_eq!(read_one(&repo, &created.id).await.users.len(), 1);
}

#[tokio::test]
async fn test_user_operations_require_ids() {
    let (repo, _store) = common::repository().await;

    let err = repo
        .update_user_access_role("", "user-2", RoleName::Admin)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::MissingId));

    let err = repo
        .update_user_access_role("lb-1", "", RoleName::Admin)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::MissingId));

    let err = repo.remove_user_access("lb-1", "").await.unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::MissingId));

    let err = repo
        .write_load_balancer_user(
            "",
            UserAccess::new("user-3", RoleName::Member, "member@example.com"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::MissingId));
}

#[tokio::test]
async fn test_update_name_and_stickiness() {
    let (repo, _store) = common::repository().await;
    let created = AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&[]))
        .await
        .unwrap();

    let update = UpdateLoadBalancer {
        name: Patch::Set("renamed-lb".to_string()),
        sticky_options: Some(UpdateStickyOptions {
            sticky_max: Patch::Set(500),
            sticky_origins: Patch::Set(vec!["https://app.example.com".to_string()]),
            ..Default::default()
        }),
    };
    AggregateWriter::<LoadBalancer>::update(&repo, &created.id, update)
        .await
        .unwrap();

    let lb = read_one(&repo, &created.id).await;
    assert_eq!(lb.name, "renamed-lb");
    let sticky = lb.sticky_options.unwrap();
    assert_eq!(sticky.sticky_max, 500);
    assert_eq!(sticky.sticky_origins, vec!["https://app.example.com"]);
    assert_eq!(sticky.duration, "60");
    assert!(sticky.stickiness);

    let err = AggregateWriter::<LoadBalancer>::update(
        &repo,
        &created.id,
        UpdateLoadBalancer {
            sticky_options: Some(UpdateStickyOptions::default()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::NoFieldsToUpdate));
}

#[tokio::test]
async fn test_remove_detaches_owner() {
    let (repo, store, app_id) = repository_with_app().await;
    let created = AggregateWriter::<LoadBalancer>::create(&repo, common::load_balancer(&[&app_id]))
        .await
        .unwrap();
    let rows = store.snapshot().await.row_count();

    AggregateWriter::<LoadBalancer>::remove(&repo, &created.id)
        .await
        .unwrap();

    let lb = read_one(&repo, &created.id).await;
    assert_eq!(lb.user_id, "");
    assert_eq!(lb.users.len(), 2);
    assert_eq!(lb.application_ids, vec![app_id]);
    assert_eq!(store.snapshot().await.row_count(), rows);
}
