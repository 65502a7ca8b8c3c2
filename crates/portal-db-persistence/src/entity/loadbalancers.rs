//! Load balancer parent rows

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loadbalancers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub lb_id: String,
    pub name: Option<String>,
    /// Owner; cleared when the load balancer is removed
    pub user_id: Option<String>,
    pub request_timeout: Option<i32>,
    pub gigastake: Option<bool>,
    pub gigastake_redirect: Option<bool>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
