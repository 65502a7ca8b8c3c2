use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::RoleName;
use crate::nullable::Patch;

/// A load balancer, its stickiness options, users and applications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    /// Owner of the load balancer, cleared on removal
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "applicationIDs", skip_serializing_if = "Vec::is_empty")]
    pub application_ids: Vec<String>,
    #[serde(rename = "requestTimeout")]
    pub request_timeout: i32,
    pub gigastake: bool,
    #[serde(rename = "gigastakeRedirect")]
    pub gigastake_redirect: bool,
    #[serde(rename = "stickinessOptions")]
    pub sticky_options: Option<StickyOptions>,
    /// Users with access; the first one becomes the owner on creation
    pub users: Vec<UserAccess>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickyOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub duration: String,
    #[serde(rename = "stickyOrigins")]
    pub sticky_origins: Vec<String>,
    #[serde(rename = "stickyMax")]
    pub sticky_max: i32,
    pub stickiness: bool,
}

/// A user's access to a load balancer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccess {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "roleName")]
    pub role_name: Option<RoleName>,
    pub email: String,
    pub accepted: bool,
    #[serde(rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

impl UserAccess {
    pub fn new(user_id: impl Into<String>, role_name: RoleName, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role_name: Some(role_name),
            email: email.into(),
            ..Default::default()
        }
    }
}

/// Join row between a load balancer and an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LbApp {
    pub lb_id: String,
    pub app_id: String,
}

/// Partial update of a load balancer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLoadBalancer {
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub name: Patch<String>,
    #[serde(
        rename = "stickinessOptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sticky_options: Option<UpdateStickyOptions>,
}

impl UpdateLoadBalancer {
    pub fn has_parent_fields(&self) -> bool {
        self.name.is_supplied()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_parent_fields() && self.sticky_options.as_ref().is_none_or(|s| s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStickyOptions {
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub duration: Patch<String>,
    #[serde(rename = "stickyOrigins", default, skip_serializing_if = "Patch::is_unchanged")]
    pub sticky_origins: Patch<Vec<String>>,
    #[serde(rename = "stickyMax", default, skip_serializing_if = "Patch::is_unchanged")]
    pub sticky_max: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub stickiness: Patch<bool>,
}

impl UpdateStickyOptions {
    pub fn is_empty(&self) -> bool {
        !(self.duration.is_supplied()
            || self.sticky_origins.is_supplied()
            || self.sticky_max.is_supplied()
            || self.stickiness.is_supplied())
    }
}
