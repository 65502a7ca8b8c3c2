use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{MemoryTransaction, Result, insert_unique, require_parent};
use crate::entity::{
    app_limits, applications, gateway_aat, gateway_settings, notification_settings, pay_plans,
};
use crate::model::{ApplicationPatch, GatewaySettingsPatch, NotificationSettingsPatch};
use crate::traits::ApplicationQueries;

#[async_trait]
impl ApplicationQueries for MemoryTransaction {
    async fn insert_application(&mut self, row: applications::Model) -> Result<()> {
        self.check_fault("applications")?;
        let key = row.application_id.clone();
        insert_unique(&mut self.work.applications, "applications", key, row)
    }

    async fn insert_app_limit(&mut self, row: app_limits::Model) -> Result<()> {
        self.check_fault("app_limits")?;
        require_parent(&self.work.applications, "app_limits", &row.application_id)?;
        let key = row.application_id.clone();
        insert_unique(&mut self.work.app_limits, "app_limits", key, row)
    }

    async fn insert_gateway_aat(&mut self, row: gateway_aat::Model) -> Result<()> {
        self.check_fault("gateway_aat")?;
        require_parent(&self.work.applications, "gateway_aat", &row.application_id)?;
        let key = row.application_id.clone();
        insert_unique(&mut self.work.gateway_aat, "gateway_aat", key, row)
    }

    async fn insert_gateway_settings(&mut self, row: gateway_settings::Model) -> Result<()> {
        self.check_fault("gateway_settings")?;
        require_parent(&self.work.applications, "gateway_settings", &row.application_id)?;
        let key = row.application_id.clone();
        insert_unique(&mut self.work.gateway_settings, "gateway_settings", key, row)
    }

    async fn insert_notification_settings(
        &mut self,
        row: notification_settings::Model,
    ) -> Result<()> {
        self.check_fault("notification_settings")?;
        require_parent(
            &self.work.applications,
            "notification_settings",
            &row.application_id,
        )?;
        let key = row.application_id.clone();
        insert_unique(
            &mut self.work.notification_settings,
            "notification_settings",
            key,
            row,
        )
    }

    async fn update_application(
        &mut self,
        application_id: &str,
        patch: ApplicationPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("applications")?;
        if let Some(row) = self.work.applications.get_mut(application_id) {
            patch.name.apply_to(&mut row.name);
            patch.status.apply_to(&mut row.status);
            patch
                .first_date_surpassed
                .apply_to(&mut row.first_date_surpassed);
            row.updated_at = updated_at;
        }
        Ok(())
    }

    async fn upsert_app_limit(&mut self, row: app_limits::Model) -> Result<()> {
        self.check_fault("app_limits")?;
        require_parent(&self.work.applications, "app_limits", &row.application_id)?;
        self.work
            .app_limits
            .insert(row.application_id.clone(), row);
        Ok(())
    }

    async fn upsert_gateway_settings(
        &mut self,
        application_id: &str,
        patch: GatewaySettingsPatch,
    ) -> Result<()> {
        self.check_fault("gateway_settings")?;
        require_parent(&self.work.applications, "gateway_settings", application_id)?;
        let row = self
            .work
            .gateway_settings
            .entry(application_id.to_string())
            .or_insert_with(|| gateway_settings::Model {
                application_id: application_id.to_string(),
                secret_key: None,
                secret_key_required: None,
                whitelist_contracts: None,
                whitelist_methods: None,
                whitelist_origins: None,
                whitelist_user_agents: None,
                whitelist_blockchains: None,
            });
        patch.secret_key.apply_to(&mut row.secret_key);
        patch
            .secret_key_required
            .apply_to(&mut row.secret_key_required);
        patch
            .whitelist_contracts
            .apply_to(&mut row.whitelist_contracts);
        patch.whitelist_methods.apply_to(&mut row.whitelist_methods);
        patch.whitelist_origins.apply_to(&mut row.whitelist_origins);
        patch
            .whitelist_user_agents
            .apply_to(&mut row.whitelist_user_agents);
        patch
            .whitelist_blockchains
            .apply_to(&mut row.whitelist_blockchains);
        Ok(())
    }

    async fn upsert_notification_settings(
        &mut self,
        application_id: &str,
        patch: NotificationSettingsPatch,
    ) -> Result<()> {
        self.check_fault("notification_settings")?;
        require_parent(
            &self.work.applications,
            "notification_settings",
            application_id,
        )?;
        let row = self
            .work
            .notification_settings
            .entry(application_id.to_string())
            .or_insert_with(|| notification_settings::Model {
                application_id: application_id.to_string(),
                signed_up: None,
                on_quarter: None,
                on_half: None,
                on_three_quarters: None,
                on_full: None,
            });
        patch.signed_up.apply_to(&mut row.signed_up);
        patch.on_quarter.apply_to(&mut row.on_quarter);
        patch.on_half.apply_to(&mut row.on_half);
        patch.on_three_quarters.apply_to(&mut row.on_three_quarters);
        patch.on_full.apply_to(&mut row.on_full);
        Ok(())
    }

    async fn update_first_date_surpassed(
        &mut self,
        application_ids: &[String],
        first_date_surpassed: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("applications")?;
        for id in application_ids {
            if let Some(row) = self.work.applications.get_mut(id) {
                row.first_date_surpassed = Some(first_date_surpassed);
                row.updated_at = updated_at;
            }
        }
        Ok(())
    }

    async fn remove_application(
        &mut self,
        application_id: &str,
        status: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("applications")?;
        if let Some(row) = self.work.applications.get_mut(application_id) {
            row.status = Some(status.to_string());
            row.updated_at = updated_at;
        }
        Ok(())
    }

    async fn select_applications(&mut self) -> Result<Vec<applications::Model>> {
        Ok(self.work.applications.values().cloned().collect())
    }

    async fn select_app_limits(&mut self) -> Result<Vec<app_limits::Model>> {
        Ok(self.work.app_limits.values().cloned().collect())
    }

    async fn select_gateway_aat(&mut self) -> Result<Vec<gateway_aat::Model>> {
        Ok(self.work.gateway_aat.values().cloned().collect())
    }

    async fn select_gateway_settings(&mut self) -> Result<Vec<gateway_settings::Model>> {
        Ok(self.work.gateway_settings.values().cloned().collect())
    }

    async fn select_notification_settings(
        &mut self,
    ) -> Result<Vec<notification_settings::Model>> {
        Ok(self.work.notification_settings.values().cloned().collect())
    }

    async fn select_pay_plans(&mut self) -> Result<Vec<pay_plans::Model>> {
        Ok(self.work.pay_plans.values().cloned().collect())
    }
}
