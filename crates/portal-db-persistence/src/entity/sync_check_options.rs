//! Sync check request used to health-check nodes of a blockchain

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_check_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub blockchain_id: String,
    pub synccheck: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    pub path: Option<String>,
    pub result_key: Option<String>,
    pub allowance: Option<i32>,
}

impl Model {
    pub fn is_not_null(&self) -> bool {
        self.synccheck.is_some()
            || self.body.is_some()
            || self.path.is_some()
            || self.result_key.is_some()
            || self.allowance.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
