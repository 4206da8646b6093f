use darkauth_types::{ActorKind, NewAuditEvent};
use sqlx::PgPool;

pub async fn insert(pool: &PgPool, event: &NewAuditEvent) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO audit_log (event_type, actor_kind, actor_id, resource_type, resource_id,
            method, path, status_code, ip_address, user_agent, success, error_message, details)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"#,
        event.event_type,
        event.actor_kind as ActorKind,
        event.actor_id,
        event.resource_type,
        event.resource_id,
        event.method,
        event.path,
        event.status_code,
        event.ip_address,
        event.user_agent,
        event.success,
        event.error_message,
        event.details,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<darkauth_types::AuditEvent>> {
    sqlx::query_as!(
        darkauth_types::AuditEvent,
        r#"SELECT id, event_type, actor_kind as "actor_kind: ActorKind", actor_id, resource_type,
            resource_id, method, path, status_code, ip_address, user_agent, success, error_message,
            details, created_at
           FROM audit_log ORDER BY created_at DESC LIMIT $1 OFFSET $2"#,
        limit,
        offset
    )
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar!(r#"SELECT count(*) as "count!" FROM audit_log"#)
        .fetch_one(pool)
        .await
}
