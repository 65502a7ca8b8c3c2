//! Application aggregate: applications plus app_limits, gateway_aat,
//! gateway_settings and notification_settings

use std::collections::HashMap;

use async_trait::async_trait;
use portal_db_common::nullable::{nullable, or_zero};
use portal_db_common::utils::{generate_id, now};
use portal_db_common::validation::{
    require_id, validate_application, validate_application_update, validate_pay_plan,
};
use portal_db_common::{
    AppLimit, AppStatus, Application, GatewayAat, GatewaySettings, NotificationSettings, PayPlan,
    PayPlanType, UpdateApplication, UpdateFirstDateSurpassed, UpdateGatewaySettings,
    UpdateNotificationSettings, ValidationError, WhitelistContract, WhitelistMethod,
};
use serde::Serialize;
use tracing::info;

use super::{Repository, finish};
use crate::entity::{
    app_limits, applications, gateway_aat, gateway_settings, notification_settings, pay_plans,
};
use crate::error::{PersistenceError, Result};
use crate::model::{ApplicationPatch, GatewaySettingsPatch, NotificationSettingsPatch};
use crate::traits::{AggregateReader, AggregateWriter, ApplicationQueries, Store};

#[async_trait]
impl<S: Store> AggregateWriter<Application> for Repository<S> {
    async fn create(&self, mut app: Application) -> Result<Application> {
        validate_application(&app)?;

        app.id = generate_id();
        let timestamp = now();
        app.created_at = Some(timestamp);
        app.updated_at = Some(timestamp);
        let rows = ApplicationRows::from_application(&app)?;

        self.deadline("create_application", async {
            let mut tx = self.store().begin().await?;
            let result = rows.insert(&mut tx).await;
            finish("create_application", tx, result).await
        })
        .await?;

        info!(application_id = %app.id, user_id = %app.user_id, "Created application");
        Ok(app)
    }

    async fn update(&self, id: &str, update: UpdateApplication) -> Result<()> {
        require_id(id)?;
        validate_application_update(&update)?;

        let parent = update.has_parent_fields().then(|| ApplicationPatch {
            name: update.name.clone(),
            status: update.status.as_ref().map(|s| s.as_str().to_string()),
            first_date_surpassed: update.first_date_surpassed.clone(),
        });
        let gateway_settings = update
            .gateway_settings
            .as_ref()
            .filter(|settings| !settings.is_empty())
            .map(gateway_settings_patch)
            .transpose()?;
        let notification_settings = update
            .notification_settings
            .as_ref()
            .filter(|settings| !settings.is_empty())
            .map(notification_settings_patch);
        let limit = update.limit.as_ref().map(|limit| app_limit_row(id, limit));
        let timestamp = now();

        self.deadline("update_application", async {
            let mut tx = self.store().begin().await?;
            let result = async {
                if let Some(patch) = parent {
                    tx.update_application(id, patch, timestamp).await?;
                }
                if let Some(patch) = gateway_settings {
                    tx.upsert_gateway_settings(id, patch).await?;
                }
                if let Some(patch) = notification_settings {
                    tx.upsert_notification_settings(id, patch).await?;
                }
                if let Some(row) = limit {
                    tx.upsert_app_limit(row).await?;
                }
                Ok(())
            }
            .await;
            finish("update_application", tx, result).await
        })
        .await?;

        info!(application_id = %id, "Updated application");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        require_id(id)?;
        let timestamp = now();

        self.deadline("remove_application", async {
            let mut tx = self.store().begin().await?;
            let result = tx
                .remove_application(id, AppStatus::AwaitingGracePeriod.as_str(), timestamp)
                .await
                .map_err(Into::into);
            finish("remove_application", tx, result).await
        })
        .await?;

        info!(application_id = %id, "Removed application");
        Ok(())
    }
}

#[async_trait]
impl<S: Store> AggregateReader<Application> for Repository<S> {
    async fn read_all(&self) -> Result<Vec<Application>> {
        self.deadline("read_applications", async {
            let mut tx = self.store().begin().await?;
            let result = select_applications(&mut tx).await;
            finish("read_applications", tx, result).await
        })
        .await
    }
}

impl<S: Store> Repository<S> {
    /// Set the first-date-surpassed timestamp of several applications at once
    pub async fn update_first_date_surpassed(&self, update: UpdateFirstDateSurpassed) -> Result<()> {
        if update.application_ids.is_empty() {
            return Err(ValidationError::MissingRequiredField("application_ids").into());
        }
        for id in &update.application_ids {
            require_id(id)?;
        }
        let timestamp = now();

        self.deadline("update_first_date_surpassed", async {
            let mut tx = self.store().begin().await?;
            let result = tx
                .update_first_date_surpassed(
                    &update.application_ids,
                    update.first_date_surpassed,
                    timestamp,
                )
                .await
                .map_err(Into::into);
            finish("update_first_date_surpassed", tx, result).await
        })
        .await?;

        info!(
            count = update.application_ids.len(),
            "Updated first date surpassed"
        );
        Ok(())
    }

    /// All pay plans; any row with an unknown plan type is an error
    pub async fn read_pay_plans(&self) -> Result<Vec<PayPlan>> {
        let rows = self
            .deadline("read_pay_plans", async {
                let mut tx = self.store().begin().await?;
                let result = tx.select_pay_plans().await.map_err(Into::into);
                finish("read_pay_plans", tx, result).await
            })
            .await?;

        rows.into_iter()
            .map(|row| -> Result<PayPlan> {
                let plan = PayPlan {
                    plan_type: Some(PayPlanType::from(row.plan_type)),
                    daily_limit: row.daily_limit,
                };
                validate_pay_plan(&plan)?;
                Ok(plan)
            })
            .collect()
    }
}

/// All rows of one new application
struct ApplicationRows {
    application: applications::Model,
    limit: Option<app_limits::Model>,
    gateway_aat: Option<gateway_aat::Model>,
    gateway_settings: Option<gateway_settings::Model>,
    notification_settings: Option<notification_settings::Model>,
}

impl ApplicationRows {
    fn from_application(app: &Application) -> Result<Self, PersistenceError> {
        let id = app.id.as_str();
        let timestamp = app.created_at.unwrap_or_else(now);
        let application = applications::Model {
            application_id: app.id.clone(),
            user_id: nullable(app.user_id.clone()),
            name: nullable(app.name.clone()),
            contact_email: nullable(app.contact_email.clone()),
            description: nullable(app.description.clone()),
            owner: nullable(app.owner.clone()),
            url: nullable(app.url.clone()),
            status: app.status.as_ref().map(|s| s.as_str().to_string()),
            dummy: nullable(app.dummy),
            first_date_surpassed: app.first_date_surpassed,
            created_at: timestamp,
            updated_at: app.updated_at.unwrap_or(timestamp),
        };
        let gateway_settings = match &app.gateway_settings {
            Some(settings) => Some(gateway_settings_row(id, settings)?),
            None => None,
        };

        Ok(Self {
            application,
            limit: app
                .limit
                .as_ref()
                .map(|limit| app_limit_row(id, limit))
                .filter(app_limits::Model::is_not_null),
            gateway_aat: app
                .gateway_aat
                .as_ref()
                .map(|aat| gateway_aat_row(id, aat))
                .filter(gateway_aat::Model::is_not_null),
            gateway_settings: gateway_settings.filter(gateway_settings::Model::is_not_null),
            notification_settings: app
                .notification_settings
                .as_ref()
                .map(|settings| notification_settings_row(id, settings))
                .filter(notification_settings::Model::is_not_null),
        })
    }

    /// Insert parent first, then children in foreign key order
    async fn insert<Q: ApplicationQueries>(self, tx: &mut Q) -> Result<()> {
        tx.insert_application(self.application).await?;
        if let Some(row) = self.limit {
            tx.insert_app_limit(row).await?;
        }
        if let Some(row) = self.gateway_aat {
            tx.insert_gateway_aat(row).await?;
        }
        if let Some(row) = self.gateway_settings {
            tx.insert_gateway_settings(row).await?;
        }
        if let Some(row) = self.notification_settings {
            tx.insert_notification_settings(row).await?;
        }
        Ok(())
    }
}

fn app_limit_row(id: &str, limit: &AppLimit) -> app_limits::Model {
    app_limits::Model {
        application_id: id.to_string(),
        pay_plan: limit
            .pay_plan
            .plan_type
            .as_ref()
            .map(|plan| plan.as_str().to_string()),
        custom_limit: nullable(limit.custom_limit),
    }
}

fn gateway_aat_row(id: &str, aat: &GatewayAat) -> gateway_aat::Model {
    gateway_aat::Model {
        application_id: id.to_string(),
        address: nullable(aat.address.clone()),
        client_public_key: nullable(aat.client_public_key.clone()),
        private_key: nullable(aat.private_key.clone()),
        public_key: nullable(aat.application_public_key.clone()),
        signature: nullable(aat.application_signature.clone()),
        version: nullable(aat.version.clone()),
    }
}

fn gateway_settings_row(
    id: &str,
    settings: &GatewaySettings,
) -> Result<gateway_settings::Model, PersistenceError> {
    Ok(gateway_settings::Model {
        application_id: id.to_string(),
        secret_key: nullable(settings.secret_key.clone()),
        secret_key_required: nullable(settings.secret_key_required),
        whitelist_contracts: encode_list("whitelist_contracts", &settings.whitelist_contracts)?,
        whitelist_methods: encode_list("whitelist_methods", &settings.whitelist_methods)?,
        whitelist_origins: nullable(settings.whitelist_origins.clone()),
        whitelist_user_agents: nullable(settings.whitelist_user_agents.clone()),
        whitelist_blockchains: nullable(settings.whitelist_blockchains.clone()),
    })
}

fn notification_settings_row(
    id: &str,
    settings: &NotificationSettings,
) -> notification_settings::Model {
    notification_settings::Model {
        application_id: id.to_string(),
        signed_up: nullable(settings.signed_up),
        on_quarter: nullable(settings.quarter),
        on_half: nullable(settings.half),
        on_three_quarters: nullable(settings.three_quarters),
        on_full: nullable(settings.full),
    }
}

fn gateway_settings_patch(
    update: &UpdateGatewaySettings,
) -> Result<GatewaySettingsPatch, PersistenceError> {
    Ok(GatewaySettingsPatch {
        secret_key: update.secret_key.clone(),
        secret_key_required: update.secret_key_required.clone(),
        whitelist_contracts: update
            .whitelist_contracts
            .as_ref()
            .try_map(|list| encode_json("whitelist_contracts", list))?,
        whitelist_methods: update
            .whitelist_methods
            .as_ref()
            .try_map(|list| encode_json("whitelist_methods", list))?,
        whitelist_origins: update.whitelist_origins.clone(),
        whitelist_user_agents: update.whitelist_user_agents.clone(),
        whitelist_blockchains: update.whitelist_blockchains.clone(),
    })
}

fn notification_settings_patch(update: &UpdateNotificationSettings) -> NotificationSettingsPatch {
    NotificationSettingsPatch {
        signed_up: update.signed_up.clone(),
        on_quarter: update.quarter.clone(),
        on_half: update.half.clone(),
        on_three_quarters: update.three_quarters.clone(),
        on_full: update.full.clone(),
    }
}

fn encode_json<T: Serialize + ?Sized>(
    column: &'static str,
    value: &T,
) -> Result<String, PersistenceError> {
    serde_json::to_string(value).map_err(|source| PersistenceError::Encoding {
        table: "gateway_settings",
        column,
        source,
    })
}

fn encode_list<T: Serialize>(
    column: &'static str,
    list: &[T],
) -> Result<Option<String>, PersistenceError> {
    if list.is_empty() {
        return Ok(None);
    }
    encode_json(column, list).map(Some)
}

async fn select_applications<Q: ApplicationQueries>(tx: &mut Q) -> Result<Vec<Application>> {
    let plans: HashMap<String, pay_plans::Model> = tx
        .select_pay_plans()
        .await?
        .into_iter()
        .map(|plan| (plan.plan_type.clone(), plan))
        .collect();
    let mut limits = by_application(tx.select_app_limits().await?, |r| &r.application_id);
    let mut aats = by_application(tx.select_gateway_aat().await?, |r| &r.application_id);
    let mut settings = by_application(tx.select_gateway_settings().await?, |r| &r.application_id);
    let mut notifications =
        by_application(tx.select_notification_settings().await?, |r| &r.application_id);

    let apps = tx
        .select_applications()
        .await?
        .into_iter()
        .map(|row| {
            let id = row.application_id.clone();
            Application {
                limit: limits.remove(&id).map(|limit| AppLimit {
                    id: id.clone(),
                    pay_plan: PayPlan {
                        daily_limit: limit
                            .pay_plan
                            .as_ref()
                            .and_then(|plan| plans.get(plan))
                            .map_or(0, |plan| plan.daily_limit),
                        plan_type: limit.pay_plan.map(PayPlanType::from),
                    },
                    custom_limit: or_zero(limit.custom_limit),
                }),
                gateway_aat: aats.remove(&id).map(|aat| GatewayAat {
                    id: id.clone(),
                    address: or_zero(aat.address),
                    application_public_key: or_zero(aat.public_key),
                    application_signature: or_zero(aat.signature),
                    client_public_key: or_zero(aat.client_public_key),
                    private_key: or_zero(aat.private_key),
                    version: or_zero(aat.version),
                }),
                gateway_settings: settings.remove(&id).map(|s| GatewaySettings {
                    id: id.clone(),
                    secret_key: or_zero(s.secret_key),
                    secret_key_required: or_zero(s.secret_key_required),
                    whitelist_origins: or_zero(s.whitelist_origins),
                    whitelist_user_agents: or_zero(s.whitelist_user_agents),
                    whitelist_contracts: WhitelistContract::parse_list(
                        s.whitelist_contracts.as_deref().unwrap_or_default(),
                    ),
                    whitelist_methods: WhitelistMethod::parse_list(
                        s.whitelist_methods.as_deref().unwrap_or_default(),
                    ),
                    whitelist_blockchains: or_zero(s.whitelist_blockchains),
                }),
                notification_settings: notifications.remove(&id).map(|n| NotificationSettings {
                    id: id.clone(),
                    signed_up: or_zero(n.signed_up),
                    quarter: or_zero(n.on_quarter),
                    half: or_zero(n.on_half),
                    three_quarters: or_zero(n.on_three_quarters),
                    full: or_zero(n.on_full),
                }),
                id,
                user_id: or_zero(row.user_id),
                name: or_zero(row.name),
                contact_email: or_zero(row.contact_email),
                description: or_zero(row.description),
                owner: or_zero(row.owner),
                url: or_zero(row.url),
                dummy: or_zero(row.dummy),
                status: row.status.map(AppStatus::from),
                first_date_surpassed: row.first_date_surpassed,
                created_at: Some(row.created_at),
                updated_at: Some(row.updated_at),
            }
        })
        .collect();
    Ok(apps)
}

fn by_application<R>(rows: Vec<R>, key: impl Fn(&R) -> &String) -> HashMap<String, R> {
    rows.into_iter().map(|row| (key(&row).clone(), row)).collect()
}
