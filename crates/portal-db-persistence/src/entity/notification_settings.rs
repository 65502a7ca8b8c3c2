//! Usage notification preferences of an application

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub application_id: String,
    pub signed_up: Option<bool>,
    pub on_quarter: Option<bool>,
    pub on_half: Option<bool>,
    pub on_three_quarters: Option<bool>,
    pub on_full: Option<bool>,
}

impl Model {
    pub fn is_not_null(&self) -> bool {
        self.signed_up.is_some()
            || self.on_quarter.is_some()
            || self.on_half.is_some()
            || self.on_three_quarters.is_some()
            || self.on_full.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
