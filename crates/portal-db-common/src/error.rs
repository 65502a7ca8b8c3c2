//! Validation error taxonomy
//!
//! Every variant is produced before any I/O happens, so a `ValidationError`
//! always means storage was left untouched.

/// Business-rule violations detected on aggregates and update payloads
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid app status: {0}")]
    InvalidStatus(String),

    #[error("invalid pay plan type: {0}")]
    InvalidPayPlanType(String),

    #[error("custom limits may only be set on enterprise plans")]
    CustomLimitWithoutEnterprise,

    #[error("enterprise plans must have a custom limit set")]
    EnterpriseWithoutCustomLimit,

    #[error("no fields to update")]
    NoFieldsToUpdate,

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("missing id")]
    MissingId,

    #[error("load balancer must have a user")]
    LoadBalancerMustHaveUser,

    #[error("role cannot be set to OWNER")]
    CannotSetToOwner,

    #[error("the OWNER of a load balancer cannot be changed or removed")]
    CannotChangeOwner,

    #[error("invalid role name: {0}")]
    InvalidRole(String),
}
