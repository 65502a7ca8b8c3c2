use serde::{Deserialize, Serialize};

use super::{
    AppLimit, Application, Blockchain, GatewayAat, GatewaySettings, LbApp, LoadBalancer,
    NotificationSettings, Redirect, StickyOptions, SyncCheckOptions,
};

/// Tables that publish change events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    #[serde(rename = "applications")]
    Applications,
    #[serde(rename = "app_limits")]
    AppLimits,
    #[serde(rename = "gateway_aat")]
    GatewayAat,
    #[serde(rename = "gateway_settings")]
    GatewaySettings,
    #[serde(rename = "notification_settings")]
    NotificationSettings,
    #[serde(rename = "lb_apps")]
    LbApps,
    #[serde(rename = "loadbalancers")]
    LoadBalancers,
    #[serde(rename = "stickiness_options")]
    StickinessOptions,
    #[serde(rename = "blockchains")]
    Blockchains,
    #[serde(rename = "redirects")]
    Redirects,
    #[serde(rename = "sync_check_options")]
    SyncCheckOptions,
}

impl Table {
    pub const ALL: [Table; 11] = [
        Table::Applications,
        Table::AppLimits,
        Table::GatewayAat,
        Table::GatewaySettings,
        Table::NotificationSettings,
        Table::LbApps,
        Table::LoadBalancers,
        Table::StickinessOptions,
        Table::Blockchains,
        Table::Redirects,
        Table::SyncCheckOptions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Applications => "applications",
            Table::AppLimits => "app_limits",
            Table::GatewayAat => "gateway_aat",
            Table::GatewaySettings => "gateway_settings",
            Table::NotificationSettings => "notification_settings",
            Table::LbApps => "lb_apps",
            Table::LoadBalancers => "loadbalancers",
            Table::StickinessOptions => "stickiness_options",
            Table::Blockchains => "blockchains",
            Table::Redirects => "redirects",
            Table::SyncCheckOptions => "sync_check_options",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| format!("Unknown table: {}", s))
    }
}

/// Kind of row change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Insert => "INSERT",
            Action::Update => "UPDATE",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(Action::Insert),
            "UPDATE" => Ok(Action::Update),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// Typed row carried by a notification, one variant per [`Table`]
///
/// Aggregate payloads only carry the columns of their own table; child
/// groups and relations arrive as separate notifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Application(Application),
    AppLimit(AppLimit),
    GatewayAat(GatewayAat),
    GatewaySettings(GatewaySettings),
    NotificationSettings(NotificationSettings),
    LbApp(LbApp),
    LoadBalancer(LoadBalancer),
    StickyOptions(StickyOptions),
    Blockchain(Blockchain),
    Redirect(Redirect),
    SyncCheckOptions(SyncCheckOptions),
}

impl Payload {
    pub fn table(&self) -> Table {
        match self {
            Payload::Application(_) => Table::Applications,
            Payload::AppLimit(_) => Table::AppLimits,
            Payload::GatewayAat(_) => Table::GatewayAat,
            Payload::GatewaySettings(_) => Table::GatewaySettings,
            Payload::NotificationSettings(_) => Table::NotificationSettings,
            Payload::LbApp(_) => Table::LbApps,
            Payload::LoadBalancer(_) => Table::LoadBalancers,
            Payload::StickyOptions(_) => Table::StickinessOptions,
            Payload::Blockchain(_) => Table::Blockchains,
            Payload::Redirect(_) => Table::Redirects,
            Payload::SyncCheckOptions(_) => Table::SyncCheckOptions,
        }
    }

    /// Zero-valued payload for a table
    pub fn empty(table: Table) -> Self {
        match table {
            Table::Applications => Payload::Application(Application::default()),
            Table::AppLimits => Payload::AppLimit(AppLimit::default()),
            Table::GatewayAat => Payload::GatewayAat(GatewayAat::default()),
            Table::GatewaySettings => Payload::GatewaySettings(GatewaySettings::default()),
            Table::NotificationSettings => {
                Payload::NotificationSettings(NotificationSettings::default())
            }
            Table::LbApps => Payload::LbApp(LbApp::default()),
            Table::LoadBalancers => Payload::LoadBalancer(LoadBalancer::default()),
            Table::StickinessOptions => Payload::StickyOptions(StickyOptions::default()),
            Table::Blockchains => Payload::Blockchain(Blockchain::default()),
            Table::Redirects => Payload::Redirect(Redirect::default()),
            Table::SyncCheckOptions => Payload::SyncCheckOptions(SyncCheckOptions::default()),
        }
    }
}

/// A decoded change event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub table: Table,
    pub action: Action,
    pub data: Payload,
}
