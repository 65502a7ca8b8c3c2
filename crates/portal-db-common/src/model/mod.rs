//! Domain model types
//!
//! Each aggregate is stored as one parent row plus optional child rows keyed
//! by the parent identifier. Plain scalars use their zero value for "not set";
//! see [`crate::nullable`] for the conversions to nullable columns.

mod application;
mod blockchain;
mod load_balancer;
mod notification;

pub use application::*;
pub use blockchain::*;
pub use load_balancer::*;
pub use notification::*;

/// An aggregate that can be created, partially updated and soft-removed
pub trait Aggregate: Send + Sync + 'static {
    /// Partial update payload accepted for this aggregate
    type Update: Send + Sync + 'static;

    /// Human readable kind, used in logs
    const KIND: &'static str;

    /// Identifier of the aggregate, empty until created
    fn id(&self) -> &str;
}

impl Aggregate for Application {
    type Update = UpdateApplication;
    const KIND: &'static str = "application";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Aggregate for LoadBalancer {
    type Update = UpdateLoadBalancer;
    const KIND: &'static str = "load_balancer";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Aggregate for Blockchain {
    type Update = UpdateBlockchain;
    const KIND: &'static str = "blockchain";

    fn id(&self) -> &str {
        &self.id
    }
}

wire_enum! {
    /// Lifecycle status of an application
    pub enum AppStatus {
        AwaitingFreetierFunds => "AWAITING_FREETIER_FUNDS",
        AwaitingFreetierStaking => "AWAITING_FREETIER_STAKING",
        AwaitingFunds => "AWAITING_FUNDS",
        AwaitingFundsRemoval => "AWAITING_FUNDS_REMOVAL",
        /// Soft-removed applications land here
        AwaitingGracePeriod => "AWAITING_GRACE_PERIOD",
        AwaitingSlotFunds => "AWAITING_SLOT_FUNDS",
        AwaitingSlotStaking => "AWAITING_SLOT_STAKING",
        AwaitingStaking => "AWAITING_STAKING",
        AwaitingUnstaking => "AWAITING_UNSTAKING",
        Decomissioned => "DECOMISSIONED",
        InService => "IN_SERVICE",
        Orphaned => "ORPHANED",
        Ready => "READY",
        Swappable => "SWAPPABLE",
    }
}

wire_enum! {
    /// Pay plan an application is billed under
    pub enum PayPlanType {
        TestPlanV0 => "TEST_PLAN_V0",
        TestPlan10K => "TEST_PLAN_10K",
        TestPlan90K => "TEST_PLAN_90K",
        FreetierV0 => "FREETIER_V0",
        PayAsYouGoV0 => "PAY_AS_YOU_GO_V0",
        Enterprise => "ENTERPRISE",
    }
}

wire_enum! {
    /// Role of a user on a load balancer
    pub enum RoleName {
        Owner => "OWNER",
        Admin => "ADMIN",
        Member => "MEMBER",
    }
}

/// Read-only pay plan reference row
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PayPlan {
    #[serde(rename = "planType", default)]
    pub plan_type: Option<PayPlanType>,
    #[serde(rename = "dailyLimit", default)]
    pub daily_limit: i32,
}

impl PayPlan {
    pub fn is_enterprise(&self) -> bool {
        matches!(self.plan_type, Some(PayPlanType::Enterprise))
    }
}
