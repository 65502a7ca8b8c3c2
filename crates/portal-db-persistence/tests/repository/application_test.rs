//! Application aggregate tests against the in-memory store

use chrono::NaiveDate;
use portal_db_common::{
    AppLimit, AppStatus, Application, ID_LENGTH, Patch, PayPlanType, UpdateApplication,
    UpdateFirstDateSurpassed, UpdateGatewaySettings, UpdateNotificationSettings, ValidationError,
};
use portal_db_persistence::entity::pay_plans;
use portal_db_persistence::{AggregateReader, AggregateWriter, Repository, Store};

use crate::common::{self, FREETIER_DAILY_LIMIT};

async fn read_one<S: Store>(repo: &Repository<S>, id: &str) -> Application {
    AggregateReader::<Application>::read_all(repo)
        .await
        .unwrap()
        .into_iter()
        .find(|app| app.id == id)
        .expect("application not found")
}

#[tokio::test]
async fn test_create_and_read_application() {
    let (repo, _store) = common::repository().await;

    let created = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    assert_eq!(created.id.len(), ID_LENGTH);
    assert!(created.created_at.is_some());
    assert_eq!(created.created_at, created.updated_at);

    let app = read_one(&repo, &created.id).await;
    assert_eq!(app.name, "pokt-wallet");
    assert_eq!(app.user_id, "user-1");
    assert_eq!(app.status, Some(AppStatus::InService));
    assert_eq!(app.created_at, created.created_at);

    let aat = app.gateway_aat.as_ref().unwrap();
    assert_eq!(aat.id, created.id);
    assert_eq!(aat.application_public_key, "pubkey");
    assert_eq!(aat.application_signature, "signature");

    let settings = app.gateway_settings.as_ref().unwrap();
    assert_eq!(settings.secret_key, "secret");
    assert!(settings.secret_key_required);
    assert_eq!(
        settings.whitelist_contracts,
        common::application()
            .gateway_settings
            .unwrap()
            .whitelist_contracts
    );
    assert!(settings.whitelist_methods.is_empty());

    let limit = app.limit.as_ref().unwrap();
    assert_eq!(limit.pay_plan.plan_type, Some(PayPlanType::FreetierV0));
    assert_eq!(limit.pay_plan.daily_limit, FREETIER_DAILY_LIMIT);
    assert_eq!(app.daily_limit(), FREETIER_DAILY_LIMIT);

    let notifications = app.notification_settings.as_ref().unwrap();
    assert!(notifications.signed_up && notifications.half && notifications.full);
    assert!(!notifications.quarter);
}

#[tokio::test]
async fn test_create_application_without_children() {
    let (repo, store) = common::repository().await;
    let before = store.snapshot().await.row_count();

    let created = AggregateWriter::<Application>::create(
        &repo,
        Application {
            name: "bare".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(store.snapshot().await.row_count(), before + 1);
    let app = read_one(&repo, &created.id).await;
    assert!(app.gateway_aat.is_none());
    assert!(app.gateway_settings.is_none());
    assert!(app.limit.is_none());
    assert!(app.notification_settings.is_none());
    assert_eq!(app.daily_limit(), 0);
}

#[tokio::test]
async fn test_enterprise_coupling_rejected_before_storage() {
    let (repo, store) = common::repository().await;
    let before = store.snapshot().await.row_count();

    let mut app = common::application();
    app.limit = Some(AppLimit::new(PayPlanType::Enterprise, 0));
    let err = AggregateWriter::<Application>::create(&repo, app)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::EnterpriseWithoutCustomLimit)
    );

    let mut app = common::application();
    app.limit = Some(AppLimit::new(PayPlanType::FreetierV0, 100));
    let err = AggregateWriter::<Application>::create(&repo, app)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::CustomLimitWithoutEnterprise)
    );

    assert_eq!(store.snapshot().await.row_count(), before);
}

#[tokio::test]
async fn test_enterprise_daily_limit_uses_custom_limit() {
    let (repo, _store) = common::repository().await;

    let mut app = common::application();
    app.limit = Some(AppLimit::new(PayPlanType::Enterprise, 2_000_000));
    let created = AggregateWriter::<Application>::create(&repo, app)
        .await
        .unwrap();

    let app = read_one(&repo, &created.id).await;
    assert_eq!(app.daily_limit(), 2_000_000);
    assert_eq!(app.limit.unwrap().custom_limit, 2_000_000);
}

#[tokio::test]
async fn test_create_rejects_unknown_status_and_plan() {
    let (repo, _store) = common::repository().await;

    let mut app = common::application();
    app.status = Some(AppStatus::from("BROKEN"));
    let err = AggregateWriter::<Application>::create(&repo, app)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::InvalidStatus("BROKEN".to_string()))
    );

    let mut app = common::application();
    app.limit = Some(AppLimit::new(PayPlanType::from("GOLD"), 0));
    let err = AggregateWriter::<Application>::create(&repo, app)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::InvalidPayPlanType("GOLD".to_string()))
    );
}

#[tokio::test]
async fn test_update_parent_fields() {
    let (repo, _store) = common::repository().await;
    let created = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    let original = read_one(&repo, &created.id).await;

    let update = UpdateApplication {
        name: Patch::Set("renamed".to_string()),
        status: Patch::Set(AppStatus::Decomissioned),
        ..Default::default()
    };
    AggregateWriter::<Application>::update(&repo, &created.id, update)
        .await
        .unwrap();

    let app = read_one(&repo, &created.id).await;
    assert_eq!(app.name, "renamed");
    assert_eq!(app.status, Some(AppStatus::Decomissioned));
    assert_eq!(app.contact_email, original.contact_email);
    assert!(app.updated_at >= original.updated_at);
    assert_eq!(app.created_at, original.created_at);
    assert_eq!(app.gateway_settings, original.gateway_settings);
    assert_eq!(app.notification_settings, original.notification_settings);
}

#[tokio::test]
async fn test_update_groups_are_independent() {
    let (repo, _store) = common::repository().await;
    let created = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    let original = read_one(&repo, &created.id).await;

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

    let app = read_one(&repo, &created.id).await;
    assert_eq!(app.name, original.name);
    assert_eq!(app.gateway_settings, original.gateway_settings);
    assert_eq!(app.limit, original.limit);
    let notifications = app.notification_settings.unwrap();
    assert!(notifications.quarter);
    assert!(notifications.half);

    let update = UpdateApplication {
        gateway_settings: Some(UpdateGatewaySettings {
            secret_key: Patch::Clear,
            whitelist_blockchains: Patch::Set(vec!["0021".to_string()]),
            ..Default::default()
        }),
        ..Default::default()
    };
    AggregateWriter::<Application>::update(&repo, &created.id, update)
        .await
        .unwrap();

    let settings = read_one(&repo, &created.id).await.gateway_settings.unwrap();
    let before = original.gateway_settings.unwrap();
    assert_eq!(settings.secret_key, "");
    assert_eq!(settings.whitelist_blockchains, vec!["0021"]);
    assert_eq!(settings.whitelist_origins, before.whitelist_origins);
    assert_eq!(settings.whitelist_contracts, before.whitelist_contracts);
    assert!(settings.secret_key_required);
}

#[tokio::test]
async fn test_update_creates_missing_child_group() {
    let (repo, _store) = common::repository().await;
    let created = AggregateWriter::<Application>::create(
        &repo,
        Application {
            name: "bare".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let update = UpdateApplication {
        gateway_settings: Some(UpdateGatewaySettings {
            secret_key_required: Patch::Set(true),
            ..Default::default()
        }),
        limit: Some(AppLimit::new(PayPlanType::PayAsYouGoV0, 0)),
        ..Default::default()
    };
    AggregateWriter::<Application>::update(&repo, &created.id, update)
        .await
        .unwrap();

    let app = read_one(&repo, &created.id).await;
    let settings = app.gateway_settings.unwrap();
    assert!(settings.secret_key_required);
    assert_eq!(settings.secret_key, "");
    assert_eq!(
        app.limit.unwrap().pay_plan.plan_type,
        Some(PayPlanType::PayAsYouGoV0)
    );
    assert!(app.notification_settings.is_none());
}

#[tokio::test]
async fn test_update_requires_id_and_fields() {
    let (repo, _store) = common::repository().await;

    let update = UpdateApplication {
        name: Patch::Set("x".to_string()),
        ..Default::default()
    };
    let err = AggregateWriter::<Application>::update(&repo, "", update)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::MissingId));

    let err = AggregateWriter::<Application>::update(&repo, "a1", UpdateApplication::default())
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::NoFieldsToUpdate));

    let update = UpdateApplication {
        gateway_settings: Some(UpdateGatewaySettings::default()),
        ..Default::default()
    };
    let err = AggregateWriter::<Application>::update(&repo, "a1", update)
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::NoFieldsToUpdate));

    let update = UpdateApplication {
        limit: Some(AppLimit::new(PayPlanType::Enterprise, 0)),
        ..Default::default()
    };
    let err = AggregateWriter::<Application>::update(&repo, "a1", update)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::EnterpriseWithoutCustomLimit)
    );
}

#[tokio::test]
async fn test_remove_marks_grace_period() {
    let (repo, store) = common::repository().await;
    let created = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    let rows = store.snapshot().await.row_count();

    AggregateWriter::<Application>::remove(&repo, &created.id)
        .await
        .unwrap();

    let app = read_one(&repo, &created.id).await;
    assert_eq!(app.status, Some(AppStatus::AwaitingGracePeriod));
    assert!(app.gateway_aat.is_some());
    assert_eq!(store.snapshot().await.row_count(), rows);

    let err = AggregateWriter::<Application>::remove(&repo, "")
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::MissingId));
}

#[tokio::test]
async fn test_update_first_date_surpassed() {
    let (repo, _store) = common::repository().await;
    let first = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    let second = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();
    let untouched = AggregateWriter::<Application>::create(&repo, common::application())
        .await
        .unwrap();

    let surpassed = NaiveDate::from_ymd_opt(2022, 11, 7)
        .unwrap()
        .and_hms_opt(16, 27, 57)
        .unwrap();
    repo.update_first_date_surpassed(UpdateFirstDateSurpassed {
        application_ids: vec![first.id.clone(), second.id.clone()],
        first_date_surpassed: surpassed,
    })
    .await
    .unwrap();

    assert_eq!(read_one(&repo, &first.id).await.first_date_surpassed, Some(surpassed));
    assert_eq!(read_one(&repo, &second.id).await.first_date_surpassed, Some(surpassed));
    assert!(read_one(&repo, &untouched.id).await.first_date_surpassed.is_none());

    let err = repo
        .update_first_date_surpassed(UpdateFirstDateSurpassed {
            application_ids: Vec::new(),
            first_date_surpassed: surpassed,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingRequiredField("application_ids"))
    );
}

#[tokio::test]
async fn test_read_pay_plans() {
    let (repo, _store) = common::repository().await;

    let plans = repo.read_pay_plans().await.unwrap();
    assert_eq!(plans.len(), common::pay_plans().len());
    let freetier = plans
        .iter()
        .find(|plan| plan.plan_type == Some(PayPlanType::FreetierV0))
        .unwrap();
    assert_eq!(freetier.daily_limit, FREETIER_DAILY_LIMIT);
}

#[tokio::test]
async fn test_read_pay_plans_rejects_unknown_plan() {
    let (repo, store) = common::repository().await;
    store
        .seed_pay_plans([pay_plans::Model {
            plan_type: "GOLD".to_string(),
            daily_limit: 1,
        }])
        .await;

    let err = repo.read_pay_plans().await.unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::InvalidPayPlanType("GOLD".to_string()))
    );
}
