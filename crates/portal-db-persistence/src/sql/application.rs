use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use super::{SqlTransaction, Supplied, patch_value};
use crate::entity::{
    app_limits, applications, gateway_aat, gateway_settings, notification_settings, pay_plans,
};
use crate::error::PersistenceError;
use crate::model::{ApplicationPatch, GatewaySettingsPatch, NotificationSettingsPatch};
use crate::traits::ApplicationQueries;

type Result<T> = std::result::Result<T, PersistenceError>;

#[async_trait]
impl ApplicationQueries for SqlTransaction {
    async fn insert_application(&mut self, row: applications::Model) -> Result<()> {
        applications::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_app_limit(&mut self, row: app_limits::Model) -> Result<()> {
        app_limits::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_gateway_aat(&mut self, row: gateway_aat::Model) -> Result<()> {
        gateway_aat::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_gateway_settings(&mut self, row: gateway_settings::Model) -> Result<()> {
        gateway_settings::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_notification_settings(
        &mut self,
        row: notification_settings::Model,
    ) -> Result<()> {
        notification_settings::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn update_application(
        &mut self,
        application_id: &str,
        patch: ApplicationPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let active = applications::ActiveModel {
            name: patch_value(patch.name),
            status: patch_value(patch.status),
            first_date_surpassed: patch_value(patch.first_date_surpassed),
            updated_at: Set(updated_at),
            ..Default::default()
        };

        applications::Entity::update_many()
            .set(active)
            .filter(applications::Column::ApplicationId.eq(application_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn upsert_app_limit(&mut self, row: app_limits::Model) -> Result<()> {
        app_limits::Entity::insert(row.into_active_model())
            .on_conflict(
                OnConflict::column(app_limits::Column::ApplicationId)
                    .update_columns([
                        app_limits::Column::PayPlan,
                        app_limits::Column::CustomLimit,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn upsert_gateway_settings(
        &mut self,
        application_id: &str,
        patch: GatewaySettingsPatch,
    ) -> Result<()> {
        use gateway_settings::Column;

        let mut supplied = Supplied::new();
        let active = gateway_settings::ActiveModel {
            application_id: Set(application_id.to_string()),
            secret_key: supplied.value(patch.secret_key, Column::SecretKey),
            secret_key_required: supplied
                .value(patch.secret_key_required, Column::SecretKeyRequired),
            whitelist_contracts: supplied
                .value(patch.whitelist_contracts, Column::WhitelistContracts),
            whitelist_methods: supplied.value(patch.whitelist_methods, Column::WhitelistMethods),
            whitelist_origins: supplied.value(patch.whitelist_origins, Column::WhitelistOrigins),
            whitelist_user_agents: supplied
                .value(patch.whitelist_user_agents, Column::WhitelistUserAgents),
            whitelist_blockchains: supplied
                .value(patch.whitelist_blockchains, Column::WhitelistBlockchains),
        };
        if supplied.is_empty() {
            return Ok(());
        }

        gateway_settings::Entity::insert(active)
            .on_conflict(
                OnConflict::column(Column::ApplicationId)
                    .update_columns(supplied.into_columns())
                    .to_owned(),
            )
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn upsert_notification_settings(
        &mut self,
        application_id: &str,
        patch: NotificationSettingsPatch,
    ) -> Result<()> {
        use notification_settings::Column;

        let mut supplied = Supplied::new();
        let active = notification_settings::ActiveModel {
            application_id: Set(application_id.to_string()),
            signed_up: supplied.value(patch.signed_up, Column::SignedUp),
            on_quarter: supplied.value(patch.on_quarter, Column::OnQuarter),
            on_half: supplied.value(patch.on_half, Column::OnHalf),
            on_three_quarters: supplied.value(patch.on_three_quarters, Column::OnThreeQuarters),
            on_full: supplied.value(patch.on_full, Column::OnFull),
        };
        if supplied.is_empty() {
            return Ok(());
        }

        notification_settings::Entity::insert(active)
            .on_conflict(
                OnConflict::column(Column::ApplicationId)
                    .update_columns(supplied.into_columns())
                    .to_owned(),
            )
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn update_first_date_surpassed(
        &mut self,
        application_ids: &[String],
        first_date_surpassed: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        if application_ids.is_empty() {
            return Ok(());
        }

        let active = applications::ActiveModel {
            first_date_surpassed: Set(Some(first_date_surpassed)),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        applications::Entity::update_many()
            .set(active)
            .filter(applications::Column::ApplicationId.is_in(application_ids.iter().cloned()))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn remove_application(
        &mut self,
        application_id: &str,
        status: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let active = applications::ActiveModel {
            status: Set(Some(status.to_string())),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        applications::Entity::update_many()
            .set(active)
            .filter(applications::Column::ApplicationId.eq(application_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn select_applications(&mut self) -> Result<Vec<applications::Model>> {
        Ok(applications::Entity::find().all(&self.tx).await?)
    }

    async fn select_app_limits(&mut self) -> Result<Vec<app_limits::Model>> {
        Ok(app_limits::Entity::find().all(&self.tx).await?)
    }

    async fn select_gateway_aat(&mut self) -> Result<Vec<gateway_aat::Model>> {
        Ok(gateway_aat::Entity::find().all(&self.tx).await?)
    }

    async fn select_gateway_settings(&mut self) -> Result<Vec<gateway_settings::Model>> {
        Ok(gateway_settings::Entity::find().all(&self.tx).await?)
    }

    async fn select_notification_settings(
        &mut self,
    ) -> Result<Vec<notification_settings::Model>> {
        Ok(notification_settings::Entity::find().all(&self.tx).await?)
    }

    async fn select_pay_plans(&mut self) -> Result<Vec<pay_plans::Model>> {
        Ok(pay_plans::Entity::find()
            .order_by_asc(pay_plans::Column::PlanType)
            .all(&self.tx)
            .await?)
    }
}
