//! Load balancer aggregate: loadbalancers plus stickiness_options,
//! user_access and the lb_apps join

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use portal_db_common::nullable::{nullable, or_zero};
use portal_db_common::utils::{generate_id, now};
use portal_db_common::validation::{
    require_id, validate_load_balancer, validate_load_balancer_update, validate_not_owner,
    validate_role_update, validate_user_access,
};
use portal_db_common::{
    LoadBalancer, RoleName, StickyOptions, UpdateLoadBalancer, UpdateStickyOptions, UserAccess,
};
use tracing::info;

use super::{Repository, finish};
use crate::entity::{lb_apps, loadbalancers, stickiness_options, user_access};
use crate::error::Result;
use crate::model::{LoadBalancerPatch, StickinessOptionsPatch};
use crate::traits::{AggregateReader, AggregateWriter, LoadBalancerQueries, Store};

#[async_trait]
impl<S: Store> AggregateWriter<LoadBalancer> for Repository<S> {
    async fn create(&self, mut lb: LoadBalancer) -> Result<LoadBalancer> {
        validate_load_balancer(&lb)?;

        lb.id = generate_id();
        let timestamp = now();
        lb.created_at = Some(timestamp);
        lb.updated_at = Some(timestamp);
        for (index, user) in lb.users.iter_mut().enumerate() {
            if index == 0 {
                user.role_name = Some(RoleName::Owner);
            }
            user.created_at = Some(timestamp);
            user.updated_at = Some(timestamp);
        }
        if lb.user_id.is_empty()
            && let Some(owner) = lb.users.first()
        {
            lb.user_id = owner.user_id.clone();
        }
        let rows = LoadBalancerRows::from_load_balancer(&lb, timestamp);

        self.deadline("create_load_balancer", async {
            let mut tx = self.store().begin().await?;
            let result = rows.insert(&mut tx).await;
            finish("create_load_balancer", tx, result).await
        })
        .await?;

        info!(lb_id = %lb.id, user_id = %lb.user_id, users = lb.users.len(), "Created load balancer");
        Ok(lb)
    }

    async fn update(&self, id: &str, update: UpdateLoadBalancer) -> Result<()> {
        require_id(id)?;
        validate_load_balancer_update(&update)?;

        let parent = update.has_parent_fields().then(|| LoadBalancerPatch {
            name: update.name.clone(),
        });
        let sticky = update
            .sticky_options
            .as_ref()
            .filter(|options| !options.is_empty())
            .map(stickiness_patch);
        let timestamp = now();

        self.deadline("update_load_balancer", async {
            let mut tx = self.store().begin().await?;
            let result = async {
                if let Some(patch) = parent {
                    tx.update_load_balancer(id, patch, timestamp).await?;
                }
                if let Some(patch) = sticky {
                    tx.upsert_stickiness_options(id, patch).await?;
                }
                Ok(())
            }
            .await;
            finish("update_load_balancer", tx, result).await
        })
        .await?;

        info!(lb_id = %id, "Updated load balancer");
        Ok(())
    }

    /// Detaches the load balancer from its owner; the rows are kept
    async fn remove(&self, id: &str) -> Result<()> {
        require_id(id)?;
        let timestamp = now();

        self.deadline("remove_load_balancer", async {
            let mut tx = self.store().begin().await?;
            let result = tx
                .remove_load_balancer(id, timestamp)
                .await
                .map_err(Into::into);
            finish("remove_load_balancer", tx, result).await
        })
        .await?;

        info!(lb_id = %id, "Removed load balancer");
        Ok(())
    }
}

#[async_trait]
impl<S: Store> AggregateReader<LoadBalancer> for Repository<S> {
    async fn read_all(&self) -> Result<Vec<LoadBalancer>> {
        self.deadline("read_load_balancers", async {
            let mut tx = self.store().begin().await?;
            let result = select_load_balancers(&mut tx).await;
            finish("read_load_balancers", tx, result).await
        })
        .await
    }
}

impl<S: Store> Repository<S> {
    /// Grant a user access to an existing load balancer
    ///
    /// The user may not be given the OWNER role.
    pub async fn write_load_balancer_user(&self, lb_id: &str, user: UserAccess) -> Result<()> {
        require_id(lb_id)?;
        validate_user_access(&user)?;
        let row = user_access_row(lb_id, &user, now());

        self.deadline("write_load_balancer_user", async {
            let mut tx = self.store().begin().await?;
            let result = tx.insert_user_access(row).await.map_err(Into::into);
            finish("write_load_balancer_user", tx, result).await
        })
        .await?;

        info!(lb_id = %lb_id, user_id = %user.user_id, "Added load balancer user");
        Ok(())
    }

    /// Change a non-owner user's role; the owner row is fixed
    pub async fn update_user_access_role(
        &self,
        lb_id: &str,
        user_id: &str,
        role: RoleName,
    ) -> Result<()> {
        require_id(lb_id)?;
        require_id(user_id)?;
        validate_role_update(&role)?;
        let timestamp = now();

        self.deadline("update_user_access_role", async {
            let mut tx = self.store().begin().await?;
            let result = change_user_role(&mut tx, lb_id, user_id, &role, timestamp).await;
            finish("update_user_access_role", tx, result).await
        })
        .await?;

        info!(lb_id = %lb_id, user_id = %user_id, role = %role, "Updated user access role");
        Ok(())
    }

    /// Delete a non-owner user's access row
    pub async fn remove_user_access(&self, lb_id: &str, user_id: &str) -> Result<()> {
        require_id(lb_id)?;
        require_id(user_id)?;

        self.deadline("remove_user_access", async {
            let mut tx = self.store().begin().await?;
            let result = delete_user(&mut tx, lb_id, user_id).await;
            finish("remove_user_access", tx, result).await
        })
        .await?;

        info!(lb_id = %lb_id, user_id = %user_id, "Removed user access");
        Ok(())
    }
}

async fn ensure_not_owner<Q: LoadBalancerQueries>(
    tx: &mut Q,
    lb_id: &str,
    user_id: &str,
) -> Result<()> {
    let role = tx.select_user_role(lb_id, user_id).await?.map(RoleName::from);
    validate_not_owner(role.as_ref())?;
    Ok(())
}

async fn change_user_role<Q: LoadBalancerQueries>(
    tx: &mut Q,
    lb_id: &str,
    user_id: &str,
    role: &RoleName,
    timestamp: NaiveDateTime,
) -> Result<()> {
    ensure_not_owner(tx, lb_id, user_id).await?;
    tx.update_user_access_role(lb_id, user_id, role.as_str(), timestamp)
        .await?;
    Ok(())
}

async fn delete_user<Q: LoadBalancerQueries>(
    tx: &mut Q,
    lb_id: &str,
    user_id: &str,
) -> Result<()> {
    ensure_not_owner(tx, lb_id, user_id).await?;
    tx.delete_user_access(lb_id, user_id).await?;
    Ok(())
}

struct LoadBalancerRows {
    load_balancer: loadbalancers::Model,
    stickiness: Option<stickiness_options::Model>,
    users: Vec<user_access::Model>,
    apps: Vec<lb_apps::Model>,
}

impl LoadBalancerRows {
    fn from_load_balancer(lb: &LoadBalancer, timestamp: NaiveDateTime) -> Self {
        let id = lb.id.as_str();
        Self {
            load_balancer: loadbalancers::Model {
                lb_id: lb.id.clone(),
                name: nullable(lb.name.clone()),
                user_id: nullable(lb.user_id.clone()),
                request_timeout: nullable(lb.request_timeout),
                gigastake: nullable(lb.gigastake),
                gigastake_redirect: nullable(lb.gigastake_redirect),
                created_at: timestamp,
                updated_at: timestamp,
            },
            stickiness: lb
                .sticky_options
                .as_ref()
                .map(|options| stickiness_row(id, options))
                .filter(stickiness_options::Model::is_not_null),
            users: lb
                .users
                .iter()
                .map(|user| user_access_row(id, user, timestamp))
                .collect(),
            apps: lb
                .application_ids
                .iter()
                .map(|app_id| lb_apps::Model {
                    lb_id: lb.id.clone(),
                    app_id: app_id.clone(),
                })
                .collect(),
        }
    }

    /// Parent, stickiness, users with the owner first, then the app joins
    async fn insert<Q: LoadBalancerQueries>(self, tx: &mut Q) -> Result<()> {
        tx.insert_load_balancer(self.load_balancer).await?;
        if let Some(row) = self.stickiness {
            tx.insert_stickiness_options(row).await?;
        }
        for row in self.users {
            tx.insert_user_access(row).await?;
        }
        tx.insert_lb_apps(self.apps).await?;
        Ok(())
    }
}

fn stickiness_row(id: &str, options: &StickyOptions) -> stickiness_options::Model {
    stickiness_options::Model {
        lb_id: id.to_string(),
        duration: nullable(options.duration.clone()),
        origins: nullable(options.sticky_origins.clone()),
        sticky_max: nullable(options.sticky_max),
        stickiness: nullable(options.stickiness),
    }
}

fn user_access_row(lb_id: &str, user: &UserAccess, timestamp: NaiveDateTime) -> user_access::Model {
    user_access::Model {
        lb_id: lb_id.to_string(),
        user_id: user.user_id.clone(),
        role_name: user
            .role_name
            .as_ref()
            .map(|role| role.as_str().to_string())
            .unwrap_or_default(),
        email: user.email.clone(),
        accepted: user.accepted,
        created_at: timestamp,
        updated_at: timestamp,
    }
}

fn stickiness_patch(update: &UpdateStickyOptions) -> StickinessOptionsPatch {
    StickinessOptionsPatch {
        duration: update.duration.clone(),
        origins: update.sticky_origins.clone(),
        sticky_max: update.sticky_max.clone(),
        stickiness: update.stickiness.clone(),
    }
}

async fn select_load_balancers<Q: LoadBalancerQueries>(tx: &mut Q) -> Result<Vec<LoadBalancer>> {
    let mut sticky: HashMap<String, stickiness_options::Model> = tx
        .select_stickiness_options()
        .await?
        .into_iter()
        .map(|row| (row.lb_id.clone(), row))
        .collect();

    let mut users: HashMap<String, Vec<UserAccess>> = HashMap::new();
    for row in tx.select_user_access().await? {
        users.entry(row.lb_id).or_default().push(UserAccess {
            user_id: row.user_id,
            role_name: Some(RoleName::from(row.role_name)),
            email: row.email,
            accepted: row.accepted,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        });
    }

    let mut apps: HashMap<String, Vec<String>> = HashMap::new();
    for row in tx.select_lb_apps().await? {
        apps.entry(row.lb_id).or_default().push(row.app_id);
    }

    let lbs = tx
        .select_load_balancers()
        .await?
        .into_iter()
        .map(|row| {
            let mut lb_users = users.remove(&row.lb_id).unwrap_or_default();
            lb_users.sort_by_key(|user| (user.role_name != Some(RoleName::Owner), user.created_at));
            LoadBalancer {
                sticky_options: sticky.remove(&row.lb_id).map(|s| StickyOptions {
                    id: s.lb_id,
                    duration: or_zero(s.duration),
                    sticky_origins: or_zero(s.origins),
                    sticky_max: or_zero(s.sticky_max),
                    stickiness: or_zero(s.stickiness),
                }),
                application_ids: apps.remove(&row.lb_id).unwrap_or_default(),
                users: lb_users,
                id: row.lb_id,
                name: or_zero(row.name),
                user_id: or_zero(row.user_id),
                request_timeout: or_zero(row.request_timeout),
                gigastake: or_zero(row.gigastake),
                gigastake_redirect: or_zero(row.gigastake_redirect),
                created_at: Some(row.created_at),
                updated_at: Some(row.updated_at),
            }
        })
        .collect();
    Ok(lbs)
}
