use sqlx::PgPool;
use time::OffsetDateTime;

pub struct OtpCredential {
    pub actor_ref: String,
    pub secret_enc: Vec<u8>,
    pub enabled: bool,
    pub verified: bool,
    pub failure_count: i32,
    pub locked_until: Option<OffsetDateTime>,
    pub last_step: i64,
}

pub async fn find(pool: &PgPool, actor_ref: &str) -> sqlx::Result<Option<OtpCredential>> {
    sqlx::query_as!(
        OtpCredential,
        r#"SELECT actor_ref, secret_enc, enabled, verified, failure_count, locked_until, last_step
           FROM otp_credentials WHERE actor_ref = $1"#,
        actor_ref
    )
    .fetch_optional(pool)
    .await
}

pub async fn upsert_pending(pool: &PgPool, actor_ref: &str, secret_enc: &[u8]) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO otp_credentials (actor_ref, secret_enc, enabled, verified)
           VALUES ($1, $2, false, false)
           ON CONFLICT (actor_ref) DO UPDATE SET secret_enc = $2, enabled = false, verified = false,
               failure_count = 0, locked_until = NULL, last_step = 0"#,
        actor_ref,
        secret_enc
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_enabled(pool: &PgPool, actor_ref: &str, step: i64) -> sqlx::Result<()> {
    sqlx::query!(
        r#"UPDATE otp_credentials SET enabled = true, verified = true, last_step = $2,
               last_used_at = now()
           WHERE actor_ref = $1"#,
        actor_ref,
        step
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn record_success(pool: &PgPool, actor_ref: &str, step: i64) -> sqlx::Result<()> {
    sqlx::query!(
        r#"UPDATE otp_credentials SET last_step = $2, last_used_at = now(), failure_count = 0,
               locked_until = NULL
           WHERE actor_ref = $1"#,
        actor_ref,
        step
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Increments the failure counter and, at the fifth failure, sets
/// `locked_until = now() + 15 minutes` (§4.8). Returns the row after the
/// update so the caller can report lockout state without a second query.
pub async fn record_failure(pool: &PgPool, actor_ref: &str) -> sqlx::Result<Option<OtpCredential>> {
    sqlx::query_as!(
        OtpCredential,
        r#"UPDATE otp_credentials SET
               failure_count = failure_count + 1,
               locked_until = CASE WHEN failure_count + 1 >= 5 THEN now() + interval '15 minutes'
                                   ELSE locked_until END
           WHERE actor_ref = $1
           RETURNING actor_ref, secret_enc, enabled, verified, failure_count, locked_until, last_step"#,
        actor_ref
    )
    .fetch_optional(pool)
    .await
}

pub async fn disable(pool: &PgPool, actor_ref: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM otp_credentials WHERE actor_ref = $1"#, actor_ref)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn unlock(pool: &PgPool, actor_ref: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(
        r#"UPDATE otp_credentials SET failure_count = 0, locked_until = NULL WHERE actor_ref = $1"#,
        actor_ref
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
