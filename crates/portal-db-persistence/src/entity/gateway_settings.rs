//! Gateway access settings of an application

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gateway_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub application_id: String,
    pub secret_key: Option<String>,
    pub secret_key_required: Option<bool>,
    /// JSON list of per-blockchain contract whitelists
    #[sea_orm(column_type = "Text", nullable)]
    pub whitelist_contracts: Option<String>,
    /// JSON list of per-blockchain method whitelists
    #[sea_orm(column_type = "Text", nullable)]
    pub whitelist_methods: Option<String>,
    pub whitelist_origins: Option<Vec<String>>,
    pub whitelist_user_agents: Option<Vec<String>>,
    pub whitelist_blockchains: Option<Vec<String>>,
}

impl Model {
    pub fn is_not_null(&self) -> bool {
        self.secret_key.is_some()
            || self.whitelist_contracts.is_some()
            || self.whitelist_methods.is_some()
            || self.whitelist_origins.is_some()
            || self.whitelist_user_agents.is_some()
            || self.whitelist_blockchains.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
