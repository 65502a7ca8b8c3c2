//! SeaORM entity definitions, one module per table

pub mod prelude;

pub mod app_limits;
pub mod applications;
pub mod blockchains;
pub mod gateway_aat;
pub mod gateway_settings;
pub mod lb_apps;
pub mod loadbalancers;
pub mod notification_settings;
pub mod pay_plans;
pub mod redirects;
pub mod stickiness_options;
pub mod sync_check_options;
pub mod user_access;
