use sqlx::PgPool;
use time::OffsetDateTime;

pub struct RefreshTokenRow {
    pub token_hash: String,
    pub session_id_hash: String,
    pub expires_at: OffsetDateTime,
}

pub async fn insert(
    pool: &PgPool,
    token_hash: &str,
    session_id_hash: &str,
    rotated_from_hash: Option<&str>,
    expires_at: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO refresh_tokens (token_hash, session_id_hash, rotated_from_hash, expires_at)
           VALUES ($1, $2, $3, $4)"#,
        token_hash,
        session_id_hash,
        rotated_from_hash,
        expires_at,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Atomic rotation (§4.2, §8): flips `consumed` false→true via CAS. Exactly
/// one of N concurrent callers with the same `token_hash` observes the
/// transition and may mint a successor; the rest see `None`.
pub async fn consume(pool: &PgPool, token_hash: &str) -> sqlx::Result<Option<RefreshTokenRow>> {
    sqlx::query_as!(
        RefreshTokenRow,
        r#"UPDATE refresh_tokens SET consumed = true
           WHERE token_hash = $1 AND consumed = false AND expires_at > now()
           RETURNING token_hash, session_id_hash, expires_at"#,
        token_hash
    )
    .fetch_optional(pool)
    .await
}

pub async fn delete_for_session(pool: &PgPool, session_id_hash: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(
        r#"DELETE FROM refresh_tokens WHERE session_id_hash = $1"#,
        session_id_hash
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn sweep_expired(pool: &PgPool) -> sqlx::Result<u64> {
    let result = sqlx::query!(
        r#"DELETE FROM refresh_tokens WHERE consumed = true OR expires_at < now()"#
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
