//! Application authentication token of an application

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gateway_aat")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub application_id: String,
    pub address: Option<String>,
    pub client_public_key: Option<String>,
    pub private_key: Option<String>,
    /// Application public key
    pub public_key: Option<String>,
    /// Application signature
    pub signature: Option<String>,
    pub version: Option<String>,
}

impl Model {
    pub fn is_not_null(&self) -> bool {
        self.address.is_some()
            || self.client_public_key.is_some()
            || self.private_key.is_some()
            || self.public_key.is_some()
            || self.signature.is_some()
            || self.version.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
