//! Row-level patch types passed to the store
//!
//! These mirror the nullable column layout of their tables. A field left
//! `Patch::Unchanged` is not written; the parent-level `updated_at` is
//! always written.

use chrono::NaiveDateTime;
use portal_db_common::Patch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub name: Patch<String>,
    pub status: Patch<String>,
    pub first_date_surpassed: Patch<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewaySettingsPatch {
    pub secret_key: Patch<String>,
    pub secret_key_required: Patch<bool>,
    pub whitelist_contracts: Patch<String>,
    pub whitelist_methods: Patch<String>,
    pub whitelist_origins: Patch<Vec<String>>,
    pub whitelist_user_agents: Patch<Vec<String>>,
    pub whitelist_blockchains: Patch<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationSettingsPatch {
    pub signed_up: Patch<bool>,
    pub on_quarter: Patch<bool>,
    pub on_half: Patch<bool>,
    pub on_three_quarters: Patch<bool>,
    pub on_full: Patch<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadBalancerPatch {
    pub name: Patch<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StickinessOptionsPatch {
    pub duration: Patch<String>,
    pub origins: Patch<Vec<String>>,
    pub sticky_max: Patch<i32>,
    pub stickiness: Patch<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockchainPatch {
    pub altruist: Patch<String>,
    pub blockchain: Patch<String>,
    pub blockchain_aliases: Patch<Vec<String>>,
    pub chain_id: Patch<String>,
    pub chain_id_check: Patch<String>,
    pub description: Patch<String>,
    pub enforce_result: Patch<String>,
    pub log_limit_blocks: Patch<i32>,
    pub network: Patch<String>,
    pub path: Patch<String>,
    pub request_timeout: Patch<i32>,
    pub ticker: Patch<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncCheckOptionsPatch {
    pub synccheck: Patch<String>,
    pub body: Patch<String>,
    pub path: Patch<String>,
    pub result_key: Patch<String>,
    pub allowance: Patch<i32>,
}
