use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{MemoryTransaction, Result, insert_unique, require_parent};
use crate::entity::{lb_apps, loadbalancers, stickiness_options, user_access};
use crate::model::{LoadBalancerPatch, StickinessOptionsPatch};
use crate::traits::LoadBalancerQueries;

#[async_trait]
impl LoadBalancerQueries for MemoryTransaction {
    async fn insert_load_balancer(&mut self, row: loadbalancers::Model) -> Result<()> {
        self.check_fault("loadbalancers")?;
        let key = row.lb_id.clone();
        insert_unique(&mut self.work.loadbalancers, "loadbalancers", key, row)
    }

    async fn insert_stickiness_options(&mut self, row: stickiness_options::Model) -> Result<()> {
        self.check_fault("stickiness_options")?;
        require_parent(&self.work.loadbalancers, "stickiness_options", &row.lb_id)?;
        let key = row.lb_id.clone();
        insert_unique(
            &mut self.work.stickiness_options,
            "stickiness_options",
            key,
            row,
        )
    }

    async fn insert_user_access(&mut self, row: user_access::Model) -> Result<()> {
        self.check_fault("user_access")?;
        require_parent(&self.work.loadbalancers, "user_access", &row.lb_id)?;
        let key = (row.lb_id.clone(), row.user_id.clone());
        insert_unique(&mut self.work.user_access, "user_access", key, row)
    }

    async fn insert_lb_apps(&mut self, rows: Vec<lb_apps::Model>) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.check_fault("lb_apps")?;
        for row in rows {
            require_parent(&self.work.loadbalancers, "lb_apps", &row.lb_id)?;
            require_parent(&self.work.applications, "lb_apps", &row.app_id)?;
            let key = (row.lb_id.clone(), row.app_id.clone());
            insert_unique(&mut self.work.lb_apps, "lb_apps", key, row)?;
        }
        Ok(())
    }

    async fn update_load_balancer(
        &mut self,
        lb_id: &str,
        patch: LoadBalancerPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("loadbalancers")?;
        if let Some(row) = self.work.loadbalancers.get_mut(lb_id) {
            patch.name.apply_to(&mut row.name);
            row.updated_at = updated_at;
        }
        Ok(())
    }

    async fn upsert_stickiness_options(
        &mut self,
        lb_id: &str,
        patch: StickinessOptionsPatch,
    ) -> Result<()> {
        self.check_fault("stickiness_options")?;
        require_parent(&self.work.loadbalancers, "stickiness_options", lb_id)?;
        let row = self
            .work
            .stickiness_options
            .entry(lb_id.to_string())
            .or_insert_with(|| stickiness_options::Model {
                lb_id: lb_id.to_string(),
                duration: None,
                origins: None,
                sticky_max: None,
                stickiness: None,
            });
        patch.duration.apply_to(&mut row.duration);
        patch.origins.apply_to(&mut row.origins);
        patch.sticky_max.apply_to(&mut row.sticky_max);
        patch.stickiness.apply_to(&mut row.stickiness);
        Ok(())
    }

    async fn update_user_access_role(
        &mut self,
        lb_id: &str,
        user_id: &str,
        role_name: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("user_access")?;
        let key = (lb_id.to_string(), user_id.to_string());
        if let Some(row) = self.work.user_access.get_mut(&key) {
            row.role_name = role_name.to_string();
            row.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_user_access(&mut self, lb_id: &str, user_id: &str) -> Result<()> {
        self.check_fault("user_access")?;
        self.work
            .user_access
            .remove(&(lb_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn select_user_role(&mut self, lb_id: &str, user_id: &str) -> Result<Option<String>> {
        Ok(self
            .work
            .user_access
            .get(&(lb_id.to_string(), user_id.to_string()))
            .map(|row| row.role_name.clone()))
    }

    async fn remove_load_balancer(
        &mut self,
        lb_id: &str,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("loadbalancers")?;
        if let Some(row) = self.work.loadbalancers.get_mut(lb_id) {
            row.user_id = None;
            row.updated_at = updated_at;
        }
        Ok(())
    }

    async fn select_load_balancers(&mut self) -> Result<Vec<loadbalancers::Model>> {
        Ok(self.work.loadbalancers.values().cloned().collect())
    }

    async fn select_stickiness_options(&mut self) -> Result<Vec<stickiness_options::Model>> {
        Ok(self.work.stickiness_options.values().cloned().collect())
    }

    async fn select_user_access(&mut self) -> Result<Vec<user_access::Model>> {
        let mut rows: Vec<_> = self.work.user_access.values().cloned().collect();
        rows.sort_by_key(|row| row.created_at);
        Ok(rows)
    }

    async fn select_lb_apps(&mut self) -> Result<Vec<lb_apps::Model>> {
        Ok(self.work.lb_apps.values().cloned().collect())
    }
}
