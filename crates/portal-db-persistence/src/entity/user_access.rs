//! Users with access to a load balancer
//!
//! Exactly one row per load balancer carries the `OWNER` role.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_access")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub lb_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub role_name: String,
    pub email: String,
    pub accepted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
