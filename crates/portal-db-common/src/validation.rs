//! Business rule validation
//!
//! Pure checks run before any storage access. A value that passes here may
//! still be rejected by the store (constraint violations), but a value that
//! fails here never reaches it.

use crate::error::ValidationError;
use crate::model::{
    AppLimit, AppStatus, Application, Blockchain, LoadBalancer, PayPlan, PayPlanType, Redirect,
    RoleName, UpdateApplication, UpdateBlockchain, UpdateLoadBalancer, UserAccess,
};
use crate::nullable::Patch;

type Result<T = ()> = std::result::Result<T, ValidationError>;

/// Reject empty identifiers
pub fn require_id(id: &str) -> Result {
    if id.is_empty() {
        return Err(ValidationError::MissingId);
    }
    Ok(())
}

fn require(value: &str, field: &'static str) -> Result {
    if value.is_empty() {
        return Err(ValidationError::MissingRequiredField(field));
    }
    Ok(())
}

fn validate_status(status: Option<&AppStatus>) -> Result {
    match status {
        Some(AppStatus::Other(value)) => Err(ValidationError::InvalidStatus(value.clone())),
        _ => Ok(()),
    }
}

fn validate_plan_type(plan_type: Option<&PayPlanType>) -> Result {
    match plan_type {
        Some(PayPlanType::Other(value)) => Err(ValidationError::InvalidPayPlanType(value.clone())),
        _ => Ok(()),
    }
}

/// Plan membership plus the Enterprise / custom limit coupling
pub fn validate_limit(limit: &AppLimit) -> Result {
    validate_plan_type(limit.pay_plan.plan_type.as_ref())?;

    match (limit.pay_plan.is_enterprise(), limit.custom_limit) {
        (false, custom) if custom != 0 => Err(ValidationError::CustomLimitWithoutEnterprise),
        (true, 0) => Err(ValidationError::EnterpriseWithoutCustomLimit),
        _ => Ok(()),
    }
}

pub fn validate_application(app: &Application) -> Result {
    validate_status(app.status.as_ref())?;
    if let Some(limit) = &app.limit {
        validate_limit(limit)?;
    }
    Ok(())
}

pub fn validate_application_update(update: &UpdateApplication) -> Result {
    if update.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    validate_status(update.status.value())?;
    if let Some(limit) = &update.limit {
        validate_limit(limit)?;
    }
    Ok(())
}

pub fn validate_pay_plan(plan: &PayPlan) -> Result {
    validate_plan_type(plan.plan_type.as_ref())
}

/// A new load balancer needs at least one user; the first becomes the owner
/// and every other user must carry a non-owner role
pub fn validate_load_balancer(lb: &LoadBalancer) -> Result {
    let Some((owner, others)) = lb.users.split_first() else {
        return Err(ValidationError::LoadBalancerMustHaveUser);
    };

    require(&owner.user_id, "user_id")?;
    require(&owner.email, "email")?;
    others.iter().try_for_each(validate_user_access)
}

pub fn validate_load_balancer_update(update: &UpdateLoadBalancer) -> Result {
    if update.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    Ok(())
}

/// A user added to an existing load balancer
pub fn validate_user_access(user: &UserAccess) -> Result {
    if user.role_name == Some(RoleName::Owner) {
        return Err(ValidationError::CannotSetToOwner);
    }
    require(&user.user_id, "user_id")?;
    match &user.role_name {
        None => return Err(ValidationError::MissingRequiredField("role_name")),
        Some(RoleName::Other(value)) => return Err(ValidationError::InvalidRole(value.clone())),
        Some(_) => {}
    }
    require(&user.email, "email")
}

/// Role changes may never grant ownership
pub fn validate_role_update(role: &RoleName) -> Result {
    match role {
        RoleName::Owner => Err(ValidationError::CannotSetToOwner),
        RoleName::Other(value) => Err(ValidationError::InvalidRole(value.clone())),
        _ => Ok(()),
    }
}

/// The stored role of a user about to be changed or removed; the owner row
/// is fixed for the life of the load balancer
pub fn validate_not_owner(current_role: Option<&RoleName>) -> Result {
    if current_role == Some(&RoleName::Owner) {
        return Err(ValidationError::CannotChangeOwner);
    }
    Ok(())
}

pub fn validate_blockchain(chain: &Blockchain) -> Result {
    require(&chain.blockchain, "blockchain")?;
    chain.redirects.iter().try_for_each(validate_redirect_fields)
}

pub fn validate_blockchain_update(update: &UpdateBlockchain) -> Result {
    if update.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    match &update.blockchain {
        Patch::Clear => Err(ValidationError::MissingRequiredField("blockchain")),
        Patch::Set(name) => require(name, "blockchain"),
        Patch::Unchanged => Ok(()),
    }
}

pub fn validate_redirect(redirect: &Redirect) -> Result {
    require(&redirect.blockchain_id, "blockchain_id")?;
    validate_redirect_fields(redirect)
}

// Redirects nested in a new blockchain get their blockchain id on write.
fn validate_redirect_fields(redirect: &Redirect) -> Result {
    require(&redirect.alias, "alias")?;
    require(&redirect.domain, "domain")?;
    require(&redirect.load_balancer_id, "load_balancer_id")
}
