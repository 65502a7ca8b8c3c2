pub use super::app_limits::Entity as AppLimits;
pub use super::applications::Entity as Applications;
pub use super::blockchains::Entity as Blockchains;
pub use super::gateway_aat::Entity as GatewayAat;
pub use super::gateway_settings::Entity as GatewaySettings;
pub use super::lb_apps::Entity as LbApps;
pub use super::loadbalancers::Entity as Loadbalancers;
pub use super::notification_settings::Entity as NotificationSettings;
pub use super::pay_plans::Entity as PayPlans;
pub use super::redirects::Entity as Redirects;
pub use super::stickiness_options::Entity as StickinessOptions;
pub use super::sync_check_options::Entity as SyncCheckOptions;
pub use super::user_access::Entity as UserAccess;
