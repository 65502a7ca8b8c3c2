//! Session stickiness of a load balancer

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stickiness_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub lb_id: String,
    pub duration: Option<String>,
    pub origins: Option<Vec<String>>,
    pub sticky_max: Option<i32>,
    pub stickiness: Option<bool>,
}

impl Model {
    pub fn is_not_null(&self) -> bool {
        self.duration.is_some()
            || self.origins.is_some()
            || self.sticky_max.is_some()
            || self.stickiness.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
