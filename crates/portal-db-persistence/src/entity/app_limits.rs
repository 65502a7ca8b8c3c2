//! Pay plan and custom limit of an application

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "app_limits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub application_id: String,
    /// References `pay_plans.plan_type`
    pub pay_plan: Option<String>,
    pub custom_limit: Option<i32>,
}

impl Model {
    pub fn is_not_null(&self) -> bool {
        self.pay_plan.is_some() || self.custom_limit.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
