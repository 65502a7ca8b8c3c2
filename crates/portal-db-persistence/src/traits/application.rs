//! Application row operations

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::entity::{
    app_limits, applications, gateway_aat, gateway_settings, notification_settings, pay_plans,
};
use crate::error::PersistenceError;
use crate::model::{ApplicationPatch, GatewaySettingsPatch, NotificationSettingsPatch};

type Result<T> = std::result::Result<T, PersistenceError>;

/// Row operations on the application tables
#[async_trait]
pub trait ApplicationQueries: Send {
    async fn insert_application(&mut self, row: applications::Model) -> Result<()>;

    async fn insert_app_limit(&mut self, row: app_limits::Model) -> Result<()>;

    async fn insert_gateway_aat(&mut self, row: gateway_aat::Model) -> Result<()>;

    async fn insert_gateway_settings(&mut self, row: gateway_settings::Model) -> Result<()>;

    async fn insert_notification_settings(
        &mut self,
        row: notification_settings::Model,
    ) -> Result<()>;

    /// Apply the supplied parent fields and stamp `updated_at`
    async fn update_application(
        &mut self,
        application_id: &str,
        patch: ApplicationPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()>;

    /// Insert the limit row, or replace it if one exists
    async fn upsert_app_limit(&mut self, row: app_limits::Model) -> Result<()>;

    /// Insert a settings row from the supplied fields, or update only those
    /// fields if one exists
    async fn upsert_gateway_settings(
        &mut self,
        application_id: &str,
        patch: GatewaySettingsPatch,
    ) -> Result<()>;

    async fn upsert_notification_settings(
        &mut self,
        application_id: &str,
        patch: NotificationSettingsPatch,
    ) -> Result<()>;

    async fn update_first_date_surpassed(
        &mut self,
        application_ids: &[String],
        first_date_surpassed: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<()>;

    /// Soft delete: set the given status and stamp `updated_at`
    async fn remove_application(
        &mut self,
        application_id: &str,
        status: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()>;

    async fn select_applications(&mut self) -> Result<Vec<applications::Model>>;

    async fn select_app_limits(&mut self) -> Result<Vec<app_limits::Model>>;

    async fn select_gateway_aat(&mut self) -> Result<Vec<gateway_aat::Model>>;

    async fn select_gateway_settings(&mut self) -> Result<Vec<gateway_settings::Model>>;

    async fn select_notification_settings(&mut self)
    -> Result<Vec<notification_settings::Model>>;

    async fn select_pay_plans(&mut self) -> Result<Vec<pay_plans::Model>>;
}
