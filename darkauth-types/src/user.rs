use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A registered end-user identity. `sub` is opaque and immutable once
/// assigned; `email` is the only mutable identifying field.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub password_reset_required: bool,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "admin_role", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Read,
    Write,
}

/// An operator identity distinct from end-users; admins authenticate through
/// the same PAKE ceremony but are never subject to RBAC/OIDC claims.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub password_reset_required: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("sub", &self.sub)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("password_reset_required", &self.password_reset_required)
            .finish()
    }
}
