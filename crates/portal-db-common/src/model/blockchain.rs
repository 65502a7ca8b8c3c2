use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::nullable::Patch;

/// A blockchain, its sync check options and redirects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blockchain {
    pub id: String,
    pub altruist: String,
    pub blockchain: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    #[serde(rename = "chainIDCheck")]
    pub chain_id_check: String,
    pub description: String,
    #[serde(rename = "enforceResult")]
    pub enforce_result: String,
    pub network: String,
    pub path: String,
    pub ticker: String,
    #[serde(rename = "blockchainAliases")]
    pub blockchain_aliases: Vec<String>,
    #[serde(rename = "logLimitBlocks")]
    pub log_limit_blocks: i32,
    #[serde(rename = "requestTimeout")]
    pub request_timeout: i32,
    pub active: bool,
    pub redirects: Vec<Redirect>,
    #[serde(rename = "syncCheckOptions")]
    pub sync_check_options: Option<SyncCheckOptions>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Domain alias routed to a load balancer for a blockchain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Redirect {
    #[serde(rename = "blockchainID")]
    pub blockchain_id: String,
    pub alias: String,
    pub domain: String,
    #[serde(rename = "loadBalancerID")]
    pub load_balancer_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncCheckOptions {
    #[serde(rename = "blockchainID")]
    pub blockchain_id: String,
    #[serde(rename = "syncCheck")]
    pub sync_check: String,
    pub body: String,
    pub path: String,
    #[serde(rename = "resultKey")]
    pub result_key: String,
    pub allowance: i32,
}

/// Partial update of a blockchain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBlockchain {
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub altruist: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub blockchain: Patch<String>,
    #[serde(
        rename = "blockchainAliases",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub blockchain_aliases: Patch<Vec<String>>,
    #[serde(rename = "chainID", default, skip_serializing_if = "Patch::is_unchanged")]
    pub chain_id: Patch<String>,
    #[serde(rename = "chainIDCheck", default, skip_serializing_if = "Patch::is_unchanged")]
    pub chain_id_check: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub description: Patch<String>,
    #[serde(rename = "enforceResult", default, skip_serializing_if = "Patch::is_unchanged")]
    pub enforce_result: Patch<String>,
    #[serde(rename = "logLimitBlocks", default, skip_serializing_if = "Patch::is_unchanged")]
    pub log_limit_blocks: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub network: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub path: Patch<String>,
    #[serde(rename = "requestTimeout", default, skip_serializing_if = "Patch::is_unchanged")]
    pub request_timeout: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub ticker: Patch<String>,
    #[serde(
        rename = "syncCheckOptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sync_check_options: Option<UpdateSyncCheckOptions>,
}

impl UpdateBlockchain {
    pub fn has_parent_fields(&self) -> bool {
        self.altruist.is_supplied()
            || self.blockchain.is_supplied()
            || self.blockchain_aliases.is_supplied()
            || self.chain_id.is_supplied()
            || self.chain_id_check.is_supplied()
            || self.description.is_supplied()
            || self.enforce_result.is_supplied()
            || self.log_limit_blocks.is_supplied()
            || self.network.is_supplied()
            || self.path.is_supplied()
            || self.request_timeout.is_supplied()
            || self.ticker.is_supplied()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_parent_fields()
            && self
                .sync_check_options
                .as_ref()
                .is_none_or(|s| s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSyncCheckOptions {
    #[serde(rename = "syncCheck", default, skip_serializing_if = "Patch::is_unchanged")]
    pub sync_check: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub body: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub path: Patch<String>,
    #[serde(rename = "resultKey", default, skip_serializing_if = "Patch::is_unchanged")]
    pub result_key: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub allowance: Patch<i32>,
}

impl UpdateSyncCheckOptions {
    pub fn is_empty(&self) -> bool {
        !(self.sync_check.is_supplied()
            || self.body.is_supplied()
            || self.path.is_supplied()
            || self.result_key.is_supplied()
            || self.allowance.is_supplied())
    }
}
