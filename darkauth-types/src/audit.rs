use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "actor_kind", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    User,
    Admin,
    Client,
    System,
}

/// One append-only audit record, emitted around every mutating or
/// security-sensitive operation (§7 "Audit").
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuditEvent {
    pub id: uuid::Uuid,
    pub event_type: String,
    pub actor_kind: ActorKind,
    pub actor_id: Option<String>,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status_code: i32,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
    pub details: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields the caller supplies; `id`/`created_at` are assigned at insertion.
#[derive(Clone, Debug)]
pub struct NewAuditEvent {
    pub event_type: String,
    pub actor_kind: ActorKind,
    pub actor_id: Option<String>,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status_code: i32,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
    pub details: serde_json::Value,
}
