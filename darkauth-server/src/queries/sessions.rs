use darkauth_types::ActorKind;
use sqlx::PgPool;
use time::OffsetDateTime;

pub struct SessionRow {
    pub session_id_hash: String,
    pub actor_kind: ActorKind,
    pub actor_ref: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub client_id: Option<String>,
    pub csrf_secret: String,
    pub otp_required: bool,
    pub otp_verified: bool,
    pub expires_at: OffsetDateTime,
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &PgPool,
    session_id_hash: &str,
    actor_kind: ActorKind,
    actor_ref: &str,
    email: Option<&str>,
    name: Option<&str>,
    client_id: Option<&str>,
    csrf_secret: &str,
    otp_required: bool,
    expires_at: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO sessions (session_id_hash, actor_kind, actor_ref, email, name, client_id,
            csrf_secret, otp_required, expires_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        session_id_hash,
        actor_kind as ActorKind,
        actor_ref,
        email,
        name,
        client_id,
        csrf_secret,
        otp_required,
        expires_at,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(pool: &PgPool, session_id_hash: &str) -> sqlx::Result<Option<SessionRow>> {
    sqlx::query_as!(
        SessionRow,
        r#"SELECT session_id_hash, actor_kind as "actor_kind: ActorKind", actor_ref, email, name,
            client_id, csrf_secret, otp_required, otp_verified, expires_at
           FROM sessions WHERE session_id_hash = $1 AND expires_at > now()"#,
        session_id_hash
    )
    .fetch_optional(pool)
    .await
}

pub async fn mark_otp_verified(pool: &PgPool, session_id_hash: &str) -> sqlx::Result<()> {
    sqlx::query!(
        r#"UPDATE sessions SET otp_verified = true WHERE session_id_hash = $1"#,
        session_id_hash
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, session_id_hash: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(
        r#"DELETE FROM sessions WHERE session_id_hash = $1"#,
        session_id_hash
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn sweep_expired(pool: &PgPool) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM sessions WHERE expires_at < now()"#)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
