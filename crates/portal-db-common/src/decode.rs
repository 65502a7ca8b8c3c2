//! Change-notification decoder
//!
//! Turns the raw payload published on the events channel into a typed
//! [`Notification`]. The envelope is `{"table", "action", "data"}` where
//! `data` is the changed row rendered with `row_to_json`.
//!
//! Decoding never fails from the caller's point of view: every outcome is a
//! [`Decoded`] variant, and [`DecodeStats`] counts them so dropped events are
//! observable.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::model::{
    Action, AppLimit, AppStatus, Application, Blockchain, GatewayAat, GatewaySettings, LbApp,
    LoadBalancer, Notification, NotificationSettings, PayPlan, PayPlanType, Payload, Redirect,
    StickyOptions, SyncCheckOptions, Table, WhitelistContract, WhitelistMethod,
};
use crate::nullable::or_zero;
use crate::utils::parse_psql_time;

/// Outcome of decoding one raw change event
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A well-formed event
    Notification(Notification),
    /// Known table, but the row data did not match its shape; the
    /// notification carries a zero-valued payload
    Malformed {
        notification: Notification,
        reason: String,
    },
    /// The table tag is not one of the known tables
    UnknownTable(String),
    /// The envelope itself could not be read, or the action is unknown
    InvalidEnvelope(String),
}

impl Decoded {
    /// The notification to deliver, if this outcome produces one
    pub fn into_notification(self) -> Option<Notification> {
        match self {
            Decoded::Notification(notification) => Some(notification),
            Decoded::Malformed { notification, .. } => Some(notification),
            Decoded::UnknownTable(_) | Decoded::InvalidEnvelope(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    table: String,
    action: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Decode a raw change event
pub fn decode(raw: &[u8]) -> Decoded {
    let envelope: Envelope = match serde_json::from_slice(raw) {
        Ok(envelope) => envelope,
        Err(e) => return Decoded::InvalidEnvelope(e.to_string()),
    };

    let Ok(table) = envelope.table.parse::<Table>() else {
        return Decoded::UnknownTable(envelope.table);
    };
    let action = match envelope.action.parse::<Action>() {
        Ok(action) => action,
        Err(e) => return Decoded::InvalidEnvelope(e),
    };

    match decode_payload(table, envelope.data) {
        Ok(data) => Decoded::Notification(Notification {
            table,
            action,
            data,
        }),
        Err(e) => Decoded::Malformed {
            notification: Notification {
                table,
                action,
                data: Payload::empty(table),
            },
            reason: e.to_string(),
        },
    }
}

fn decode_payload(table: Table, data: serde_json::Value) -> Result<Payload, serde_json::Error> {
    Ok(match table {
        Table::Applications => Payload::Application(row::<AppRow>(data)?.into()),
        Table::AppLimits => Payload::AppLimit(row::<AppLimitRow>(data)?.into()),
        Table::GatewayAat => Payload::GatewayAat(row::<GatewayAatRow>(data)?.into()),
        Table::GatewaySettings => {
            Payload::GatewaySettings(row::<GatewaySettingsRow>(data)?.into())
        }
        Table::NotificationSettings => {
            Payload::NotificationSettings(row::<NotificationSettingsRow>(data)?.into())
        }
        Table::LbApps => Payload::LbApp(row::<LbAppRow>(data)?.into()),
        Table::LoadBalancers => Payload::LoadBalancer(row::<LoadBalancerRow>(data)?.into()),
        Table::StickinessOptions => {
            Payload::StickyOptions(row::<StickinessOptionsRow>(data)?.into())
        }
        Table::Blockchains => Payload::Blockchain(row::<BlockchainRow>(data)?.into()),
        Table::Redirects => Payload::Redirect(row::<RedirectRow>(data)?.into()),
        Table::SyncCheckOptions => {
            Payload::SyncCheckOptions(row::<SyncCheckOptionsRow>(data)?.into())
        }
    })
}

fn row<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(data)
}

fn time(raw: Option<String>) -> Option<chrono::NaiveDateTime> {
    raw.as_deref().and_then(parse_psql_time)
}

// Row shapes as rendered by row_to_json. Every column is nullable.

#[derive(Deserialize, Default)]
#[serde(default)]
struct AppRow {
    application_id: Option<String>,
    user_id: Option<String>,
    name: Option<String>,
    contact_email: Option<String>,
    description: Option<String>,
    owner: Option<String>,
    url: Option<String>,
    status: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    first_date_surpassed: Option<String>,
    dummy: Option<bool>,
}

impl From<AppRow> for Application {
    fn from(r: AppRow) -> Self {
        Application {
            id: or_zero(r.application_id),
            user_id: or_zero(r.user_id),
            name: or_zero(r.name),
            contact_email: or_zero(r.contact_email),
            description: or_zero(r.description),
            owner: or_zero(r.owner),
            url: or_zero(r.url),
            dummy: or_zero(r.dummy),
            status: r.status.filter(|s| !s.is_empty()).map(AppStatus::from),
            first_date_surpassed: time(r.first_date_surpassed),
            created_at: time(r.created_at),
            updated_at: time(r.updated_at),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AppLimitRow {
    application_id: Option<String>,
    pay_plan: Option<String>,
    custom_limit: Option<i32>,
}

impl From<AppLimitRow> for AppLimit {
    fn from(r: AppLimitRow) -> Self {
        AppLimit {
            id: or_zero(r.application_id),
            pay_plan: PayPlan {
                plan_type: r.pay_plan.filter(|p| !p.is_empty()).map(PayPlanType::from),
                daily_limit: 0,
            },
            custom_limit: or_zero(r.custom_limit),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GatewayAatRow {
    application_id: Option<String>,
    address: Option<String>,
    client_public_key: Option<String>,
    private_key: Option<String>,
    public_key: Option<String>,
    signature: Option<String>,
    version: Option<String>,
}

impl From<GatewayAatRow> for GatewayAat {
    fn from(r: GatewayAatRow) -> Self {
        GatewayAat {
            id: or_zero(r.application_id),
            address: or_zero(r.address),
            application_public_key: or_zero(r.public_key),
            application_signature: or_zero(r.signature),
            client_public_key: or_zero(r.client_public_key),
            private_key: or_zero(r.private_key),
            version: or_zero(r.version),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GatewaySettingsRow {
    application_id: Option<String>,
    secret_key: Option<String>,
    secret_key_required: Option<bool>,
    whitelist_contracts: Option<String>,
    whitelist_methods: Option<String>,
    whitelist_origins: Option<Vec<String>>,
    whitelist_user_agents: Option<Vec<String>>,
    whitelist_blockchains: Option<Vec<String>>,
}

impl From<GatewaySettingsRow> for GatewaySettings {
    fn from(r: GatewaySettingsRow) -> Self {
        GatewaySettings {
            id: or_zero(r.application_id),
            secret_key: or_zero(r.secret_key),
            secret_key_required: or_zero(r.secret_key_required),
            whitelist_origins: or_zero(r.whitelist_origins),
            whitelist_user_agents: or_zero(r.whitelist_user_agents),
            whitelist_contracts: WhitelistContract::parse_list(
                r.whitelist_contracts.as_deref().unwrap_or_default(),
            ),
            whitelist_methods: WhitelistMethod::parse_list(
                r.whitelist_methods.as_deref().unwrap_or_default(),
            ),
            whitelist_blockchains: or_zero(r.whitelist_blockchains),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct NotificationSettingsRow {
    application_id: Option<String>,
    signed_up: Option<bool>,
    on_quarter: Option<bool>,
    on_half: Option<bool>,
    on_three_quarters: Option<bool>,
    on_full: Option<bool>,
}

impl From<NotificationSettingsRow> for NotificationSettings {
    fn from(r: NotificationSettingsRow) -> Self {
        NotificationSettings {
            id: or_zero(r.application_id),
            signed_up: or_zero(r.signed_up),
            quarter: or_zero(r.on_quarter),
            half: or_zero(r.on_half),
            three_quarters: or_zero(r.on_three_quarters),
            full: or_zero(r.on_full),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LbAppRow {
    lb_id: Option<String>,
    app_id: Option<String>,
}

impl From<LbAppRow> for LbApp {
    fn from(r: LbAppRow) -> Self {
        LbApp {
            lb_id: or_zero(r.lb_id),
            app_id: or_zero(r.app_id),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LoadBalancerRow {
    lb_id: Option<String>,
    name: Option<String>,
    user_id: Option<String>,
    request_timeout: Option<i32>,
    gigastake: Option<bool>,
    gigastake_redirect: Option<bool>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<LoadBalancerRow> for LoadBalancer {
    fn from(r: LoadBalancerRow) -> Self {
        LoadBalancer {
            id: or_zero(r.lb_id),
            name: or_zero(r.name),
            user_id: or_zero(r.user_id),
            request_timeout: or_zero(r.request_timeout),
            gigastake: or_zero(r.gigastake),
            gigastake_redirect: or_zero(r.gigastake_redirect),
            created_at: time(r.created_at),
            updated_at: time(r.updated_at),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StickinessOptionsRow {
    lb_id: Option<String>,
    duration: Option<String>,
    origins: Option<Vec<String>>,
    sticky_max: Option<i32>,
    stickiness: Option<bool>,
}

impl From<StickinessOptionsRow> for StickyOptions {
    fn from(r: StickinessOptionsRow) -> Self {
        StickyOptions {
            id: or_zero(r.lb_id),
            duration: or_zero(r.duration),
            sticky_origins: or_zero(r.origins),
            sticky_max: or_zero(r.sticky_max),
            stickiness: or_zero(r.stickiness),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BlockchainRow {
    blockchain_id: Option<String>,
    altruist: Option<String>,
    blockchain: Option<String>,
    chain_id: Option<String>,
    chain_id_check: Option<String>,
    path: Option<String>,
    description: Option<String>,
    enforce_result: Option<String>,
    network: Option<String>,
    ticker: Option<String>,
    blockchain_aliases: Option<Vec<String>>,
    log_limit_blocks: Option<i32>,
    request_timeout: Option<i32>,
    active: Option<bool>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<BlockchainRow> for Blockchain {
    fn from(r: BlockchainRow) -> Self {
        Blockchain {
            id: or_zero(r.blockchain_id),
            altruist: or_zero(r.altruist),
            blockchain: or_zero(r.blockchain),
            chain_id: or_zero(r.chain_id),
            chain_id_check: or_zero(r.chain_id_check),
            path: or_zero(r.path),
            description: or_zero(r.description),
            enforce_result: or_zero(r.enforce_result),
            network: or_zero(r.network),
            ticker: or_zero(r.ticker),
            blockchain_aliases: or_zero(r.blockchain_aliases),
            log_limit_blocks: or_zero(r.log_limit_blocks),
            request_timeout: or_zero(r.request_timeout),
            active: or_zero(r.active),
            created_at: time(r.created_at),
            updated_at: time(r.updated_at),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RedirectRow {
    blockchain_id: Option<String>,
    alias: Option<String>,
    domain: Option<String>,
    loadbalancer: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<RedirectRow> for Redirect {
    fn from(r: RedirectRow) -> Self {
        Redirect {
            blockchain_id: or_zero(r.blockchain_id),
            alias: or_zero(r.alias),
            domain: or_zero(r.domain),
            load_balancer_id: or_zero(r.loadbalancer),
            created_at: time(r.created_at),
            updated_at: time(r.updated_at),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SyncCheckOptionsRow {
    blockchain_id: Option<String>,
    synccheck: Option<String>,
    body: Option<String>,
    path: Option<String>,
    result_key: Option<String>,
    allowance: Option<i32>,
}

impl From<SyncCheckOptionsRow> for SyncCheckOptions {
    fn from(r: SyncCheckOptionsRow) -> Self {
        SyncCheckOptions {
            blockchain_id: or_zero(r.blockchain_id),
            sync_check: or_zero(r.synccheck),
            body: or_zero(r.body),
            path: or_zero(r.path),
            result_key: or_zero(r.result_key),
            allowance: or_zero(r.allowance),
        }
    }
}

/// Counters for every decode outcome
#[derive(Debug, Default)]
pub struct DecodeStats {
    decoded: AtomicU64,
    malformed: AtomicU64,
    unknown_table: AtomicU64,
    invalid_envelope: AtomicU64,
}

/// Point-in-time copy of [`DecodeStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeCounts {
    pub decoded: u64,
    pub malformed: u64,
    pub unknown_table: u64,
    pub invalid_envelope: u64,
}

impl DecodeCounts {
    /// Events that produced no notification
    pub fn dropped(&self) -> u64 {
        self.unknown_table + self.invalid_envelope
    }
}

impl DecodeStats {
    pub fn record(&self, outcome: &Decoded) {
        let counter = match outcome {
            Decoded::Notification(_) => &self.decoded,
            Decoded::Malformed { .. } => &self.malformed,
            Decoded::UnknownTable(_) => &self.unknown_table,
            Decoded::InvalidEnvelope(_) => &self.invalid_envelope,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DecodeCounts {
        DecodeCounts {
            decoded: self.decoded.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            unknown_table: self.unknown_table.load(Ordering::Relaxed),
            invalid_envelope: self.invalid_envelope.load(Ordering::Relaxed),
        }
    }
}
