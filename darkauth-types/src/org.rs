use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Organization {
    pub id: uuid::Uuid,
    pub slug: String,
    pub name: String,
    pub force_otp: bool,
    pub created_by_user_sub: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "member_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Invited,
    Suspended,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrganizationMember {
    pub id: uuid::Uuid,
    pub organization_id: uuid::Uuid,
    pub user_sub: String,
    pub status: MemberStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Role {
    pub id: uuid::Uuid,
    pub key: String,
    pub name: String,
    pub system: bool,
}

/// Built-in role keys created by the installation bootstrap (§4.10).
pub const ROLE_MEMBER: &str = "member";
pub const ROLE_ORG_ADMIN: &str = "org_admin";
pub const ROLE_OTP_REQUIRED: &str = "otp_required";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Permission {
    pub key: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Group {
    pub key: String,
    pub name: String,
    pub enable_login: bool,
    pub require_otp: bool,
}

/// `key = "default"` is the undeletable legacy group (§3 invariant).
pub const DEFAULT_GROUP_KEY: &str = "default";

/// The resolved permission set and policy flags for a (user, org) pair,
/// produced by the RBAC resolver (§4.7).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectiveAccess {
    pub permissions: Vec<String>,
    pub groups: Vec<String>,
    pub otp_required: bool,
}
