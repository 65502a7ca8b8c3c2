use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use super::{SqlTransaction, Supplied, patch_value};
use crate::entity::{lb_apps, loadbalancers, stickiness_options, user_access};
use crate::error::PersistenceError;
use crate::model::{LoadBalancerPatch, StickinessOptionsPatch};
use crate::traits::LoadBalancerQueries;

type Result<T> = std::result::Result<T, PersistenceError>;

#[async_trait]
impl LoadBalancerQueries for SqlTransaction {
    async fn insert_load_balancer(&mut self, row: loadbalancers::Model) -> Result<()> {
        loadbalancers::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_stickiness_options(&mut self, row: stickiness_options::Model) -> Result<()> {
        stickiness_options::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_user_access(&mut self, row: user_access::Model) -> Result<()> {
        user_access::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_lb_apps(&mut self, rows: Vec<lb_apps::Model>) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        lb_apps::Entity::insert_many(rows.into_iter().map(IntoActiveModel::into_active_model))
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn update_load_balancer(
        &mut self,
        lb_id: &str,
        patch: LoadBalancerPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let active = loadbalancers::ActiveModel {
            name: patch_value(patch.name),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        loadbalancers::Entity::update_many()
            .set(active)
            .filter(loadbalancers::Column::LbId.eq(lb_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn upsert_stickiness_options(
        &mut self,
        lb_id: &str,
        patch: StickinessOptionsPatch,
    ) -> Result<()> {
        use stickiness_options::Column;

        let mut supplied = Supplied::new();
        let active = stickiness_options::ActiveModel {
            lb_id: Set(lb_id.to_string()),
            duration: supplied.value(patch.duration, Column::Duration),
            origins: supplied.value(patch.origins, Column::Origins),
            sticky_max: supplied.value(patch.sticky_max, Column::StickyMax),
            stickiness: supplied.value(patch.stickiness, Column::Stickiness),
        };
        if supplied.is_empty() {
            return Ok(());
        }

        stickiness_options::Entity::insert(active)
            .on_conflict(
                OnConflict::column(Column::LbId)
                    .update_columns(supplied.into_columns())
                    .to_owned(),
            )
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn update_user_access_role(
        &mut self,
        lb_id: &str,
        user_id: &str,
        role_name: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let active = user_access::ActiveModel {
            role_name: Set(role_name.to_string()),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        user_access::Entity::update_many()
            .set(active)
            .filter(user_access::Column::LbId.eq(lb_id))
            .filter(user_access::Column::UserId.eq(user_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn delete_user_access(&mut self, lb_id: &str, user_id: &str) -> Result<()> {
        user_access::Entity::delete_many()
            .filter(user_access::Column::LbId.eq(lb_id))
            .filter(user_access::Column::UserId.eq(user_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn select_user_role(&mut self, lb_id: &str, user_id: &str) -> Result<Option<String>> {
        Ok(user_access::Entity::find_by_id((lb_id.to_string(), user_id.to_string()))
            .one(&self.tx)
            .await?
            .map(|row| row.role_name))
    }

    async fn remove_load_balancer(
        &mut self,
        lb_id: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let active = loadbalancers::ActiveModel {
            user_id: Set(None),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        loadbalancers::Entity::update_many()
            .set(active)
            .filter(loadbalancers::Column::LbId.eq(lb_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn select_load_balancers(&mut self) -> Result<Vec<loadbalancers::Model>> {
        Ok(loadbalancers::Entity::find().all(&self.tx).await?)
    }

    async fn select_stickiness_options(&mut self) -> Result<Vec<stickiness_options::Model>> {
        Ok(stickiness_options::Entity::find().all(&self.tx).await?)
    }

    async fn select_user_access(&mut self) -> Result<Vec<user_access::Model>> {
        Ok(user_access::Entity::find()
            .order_by_asc(user_access::Column::CreatedAt)
            .all(&self.tx)
            .await?)
    }

    async fn select_lb_apps(&mut self) -> Result<Vec<lb_apps::Model>> {
        Ok(lb_apps::Entity::find().all(&self.tx).await?)
    }
}
