//! Load balancer to application join table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lb_apps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub lb_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub app_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
