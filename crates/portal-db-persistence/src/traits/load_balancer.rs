//! Load balancer row operations

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::entity::{lb_apps, loadbalancers, stickiness_options, user_access};
use crate::error::PersistenceError;
use crate::model::{LoadBalancerPatch, StickinessOptionsPatch};

type Result<T> = std::result::Result<T, PersistenceError>;

/// Row operations on the load balancer tables
#[async_trait]
pub trait LoadBalancerQueries: Send {
    async fn insert_load_balancer(&mut self, row: loadbalancers::Model) -> Result<()>;

    async fn insert_stickiness_options(&mut self, row: stickiness_options::Model) -> Result<()>;

    async fn insert_user_access(&mut self, row: user_access::Model) -> Result<()>;

    async fn insert_lb_apps(&mut self, rows: Vec<lb_apps::Model>) -> Result<()>;

    async fn update_load_balancer(
        &mut self,
        lb_id: &str,
        patch: LoadBalancerPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()>;

    async fn upsert_stickiness_options(
        &mut self,
        lb_id: &str,
        patch: StickinessOptionsPatch,
    ) -> Result<()>;

    async fn update_user_access_role(
        &mut self,
        lb_id: &str,
        user_id: &str,
        role_name: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()>;

    async fn delete_user_access(&mut self, lb_id: &str, user_id: &str) -> Result<()>;

    /// Stored role of one user, `None` when the row does not exist
    async fn select_user_role(&mut self, lb_id: &str, user_id: &str) -> Result<Option<String>>;

    /// Soft delete: clear the owning user and stamp `updated_at`
    async fn remove_load_balancer(&mut self, lb_id: &str, updated_at: NaiveDateTime)
    -> Result<()>;

    async fn select_load_balancers(&mut self) -> Result<Vec<loadbalancers::Model>>;

    async fn select_stickiness_options(&mut self) -> Result<Vec<stickiness_options::Model>>;

    async fn select_user_access(&mut self) -> Result<Vec<user_access::Model>>;

    async fn select_lb_apps(&mut self) -> Result<Vec<lb_apps::Model>>;
}
