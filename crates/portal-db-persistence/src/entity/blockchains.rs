//! Blockchain parent rows

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "blockchains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub blockchain_id: String,
    pub altruist: Option<String>,
    pub blockchain: String,
    pub chain_id: Option<String>,
    pub chain_id_check: Option<String>,
    pub path: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub enforce_result: Option<String>,
    pub network: Option<String>,
    pub ticker: Option<String>,
    pub blockchain_aliases: Option<Vec<String>>,
    pub log_limit_blocks: Option<i32>,
    pub request_timeout: Option<i32>,
    pub active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
