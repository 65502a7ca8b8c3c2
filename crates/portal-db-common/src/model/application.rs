use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{AppStatus, PayPlan, PayPlanType};
use crate::nullable::Patch;

/// An application and its optional child groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
    #[serde(rename = "contactEmail")]
    pub contact_email: String,
    pub description: String,
    pub owner: String,
    pub url: String,
    pub dummy: bool,
    pub status: Option<AppStatus>,
    #[serde(rename = "firstDateSurpassed")]
    pub first_date_surpassed: Option<NaiveDateTime>,
    #[serde(rename = "gatewayAAT")]
    pub gateway_aat: Option<GatewayAat>,
    #[serde(rename = "gatewaySettings")]
    pub gateway_settings: Option<GatewaySettings>,
    pub limit: Option<AppLimit>,
    #[serde(rename = "notificationSettings")]
    pub notification_settings: Option<NotificationSettings>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Application {
    /// Effective daily relay limit
    ///
    /// Enterprise plans use the custom limit, every other plan uses the
    /// plan's own limit. An application without a limit group has none.
    pub fn daily_limit(&self) -> i32 {
        match &self.limit {
            Some(limit) if limit.pay_plan.is_enterprise() => limit.custom_limit,
            Some(limit) => limit.pay_plan.daily_limit,
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayAat {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub address: String,
    #[serde(rename = "applicationPublicKey")]
    pub application_public_key: String,
    #[serde(rename = "applicationSignature")]
    pub application_signature: String,
    #[serde(rename = "clientPublicKey")]
    pub client_public_key: String,
    #[serde(rename = "privateKey")]
    pub private_key: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "secretKey")]
    pub secret_key: String,
    #[serde(rename = "secretKeyRequired")]
    pub secret_key_required: bool,
    #[serde(rename = "whitelistOrigins", skip_serializing_if = "Vec::is_empty")]
    pub whitelist_origins: Vec<String>,
    #[serde(rename = "whitelistUserAgents", skip_serializing_if = "Vec::is_empty")]
    pub whitelist_user_agents: Vec<String>,
    #[serde(rename = "whitelistContracts", skip_serializing_if = "Vec::is_empty")]
    pub whitelist_contracts: Vec<WhitelistContract>,
    #[serde(rename = "whitelistMethods", skip_serializing_if = "Vec::is_empty")]
    pub whitelist_methods: Vec<WhitelistMethod>,
    #[serde(rename = "whitelistBlockchains", skip_serializing_if = "Vec::is_empty")]
    pub whitelist_blockchains: Vec<String>,
}

/// Contracts a blockchain whitelist allows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistContract {
    #[serde(rename = "blockchainID")]
    pub blockchain_id: String,
    pub contracts: Vec<String>,
}

/// Methods a blockchain whitelist allows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistMethod {
    #[serde(rename = "blockchainID")]
    pub blockchain_id: String,
    pub methods: Vec<String>,
}

impl WhitelistContract {
    /// Parse the JSON text stored in `gateway_settings.whitelist_contracts`
    ///
    /// Unparseable text yields an empty list. Every entry is trimmed.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        parse_json_list::<Self>(raw)
            .into_iter()
            .map(|entry| Self {
                blockchain_id: entry.blockchain_id.trim().to_string(),
                contracts: trim_all(entry.contracts),
            })
            .collect()
    }
}

impl WhitelistMethod {
    /// Parse the JSON text stored in `gateway_settings.whitelist_methods`
    ///
    /// Unparseable text yields an empty list. Every entry is trimmed.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        parse_json_list::<Self>(raw)
            .into_iter()
            .map(|entry| Self {
                blockchain_id: entry.blockchain_id.trim().to_string(),
                methods: trim_all(entry.methods),
            })
            .collect()
    }
}

fn parse_json_list<T: for<'de> Deserialize<'de>>(raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppLimit {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "payPlan")]
    pub pay_plan: PayPlan,
    #[serde(rename = "customLimit")]
    pub custom_limit: i32,
}

impl AppLimit {
    pub fn new(plan_type: PayPlanType, custom_limit: i32) -> Self {
        Self {
            id: String::new(),
            pay_plan: PayPlan {
                plan_type: Some(plan_type),
                daily_limit: 0,
            },
            custom_limit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "signedUp")]
    pub signed_up: bool,
    pub quarter: bool,
    pub half: bool,
    #[serde(rename = "threeQuarters")]
    pub three_quarters: bool,
    pub full: bool,
}

/// Partial update of an application
///
/// Parent fields are applied only when supplied. Each child group is upserted
/// independently when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateApplication {
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub status: Patch<AppStatus>,
    #[serde(
        rename = "firstDateSurpassed",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub first_date_surpassed: Patch<NaiveDateTime>,
    #[serde(
        rename = "gatewaySettings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub gateway_settings: Option<UpdateGatewaySettings>,
    #[serde(
        rename = "notificationSettings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_settings: Option<UpdateNotificationSettings>,
    #[serde(rename = "appLimit", default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<AppLimit>,
}

impl UpdateApplication {
    /// `true` when the application row itself carries changes
    pub fn has_parent_fields(&self) -> bool {
        self.name.is_supplied()
            || self.status.is_supplied()
            || self.first_date_surpassed.is_supplied()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_parent_fields()
            && self.gateway_settings.as_ref().is_none_or(|g| g.is_empty())
            && self
                .notification_settings
                .as_ref()
                .is_none_or(|n| n.is_empty())
            && self.limit.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGatewaySettings {
    #[serde(rename = "secretKey", default, skip_serializing_if = "Patch::is_unchanged")]
    pub secret_key: Patch<String>,
    #[serde(
        rename = "secretKeyRequired",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub secret_key_required: Patch<bool>,
    #[serde(
        rename = "whitelistOrigins",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub whitelist_origins: Patch<Vec<String>>,
    #[serde(
        rename = "whitelistUserAgents",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub whitelist_user_agents: Patch<Vec<String>>,
    #[serde(
        rename = "whitelistContracts",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub whitelist_contracts: Patch<Vec<WhitelistContract>>,
    #[serde(
        rename = "whitelistMethods",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub whitelist_methods: Patch<Vec<WhitelistMethod>>,
    #[serde(
        rename = "whitelistBlockchains",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub whitelist_blockchains: Patch<Vec<String>>,
}

impl UpdateGatewaySettings {
    pub fn is_empty(&self) -> bool {
        !(self.secret_key.is_supplied()
            || self.secret_key_required.is_supplied()
            || self.whitelist_origins.is_supplied()
            || self.whitelist_user_agents.is_supplied()
            || self.whitelist_contracts.is_supplied()
            || self.whitelist_methods.is_supplied()
            || self.whitelist_blockchains.is_supplied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNotificationSettings {
    #[serde(rename = "signedUp", default, skip_serializing_if = "Patch::is_unchanged")]
    pub signed_up: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub quarter: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub half: Patch<bool>,
    #[serde(
        rename = "threeQuarters",
        default,
        skip_serializing_if = "Patch::is_unchanged"
    )]
    pub three_quarters: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub full: Patch<bool>,
}

impl UpdateNotificationSettings {
    pub fn is_empty(&self) -> bool {
        !(self.signed_up.is_supplied()
            || self.quarter.is_supplied()
            || self.half.is_supplied()
            || self.three_quarters.is_supplied()
            || self.full.is_supplied())
    }
}

/// Bulk update of the first-date-surpassed timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFirstDateSurpassed {
    #[serde(rename = "applicationIDs")]
    pub application_ids: Vec<String>,
    #[serde(rename = "firstDateSurpassed")]
    pub first_date_surpassed: NaiveDateTime,
}
