use darkauth_types::{ActorKind, NewAuditEvent};
use sqlx::PgPool;

/// Emission must not fail the originating operation (§7 "Audit"): a write
/// failure here is logged, never propagated, so a handler's own
/// success/failure is never masked by an audit-sink hiccup.
pub async fn emit(pool: &PgPool, event: NewAuditEvent) {
    if let Err(e) = crate::queries::audit::insert(pool, &event).await {
        log::error!(
            "audit sink write failed for event_type={} resource_type={}: {e}",
            event.event_type,
            event.resource_type
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub fn event(
    event_type: &str,
    actor_kind: ActorKind,
    actor_id: Option<String>,
    resource_type: &str,
    resource_id: Option<String>,
    method: &str,
    path: &str,
    status_code: i32,
    success: bool,
) -> NewAuditEvent {
    NewAuditEvent {
        event_type: event_type.to_string(),
        actor_kind,
        actor_id,
        resource_type: resource_type.to_string(),
        resource_id,
        method: method.to_string(),
        path: path.to_string(),
        status_code,
        ip_address: None,
        user_agent: None,
        success,
        error_message: None,
        details: serde_json::json!({}),
    }
}
