use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct PendingAuth {
    pub request_id: Uuid,
    pub client_id: String,
    pub redirect_uri: String,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub zk_pub_kid: Option<String>,
    pub zk_pub_jwk: Option<String>,
    pub user_sub: Option<String>,
    pub origin: String,
    pub expires_at: OffsetDateTime,
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &PgPool,
    client_id: &str,
    redirect_uri: &str,
    state: Option<&str>,
    nonce: Option<&str>,
    code_challenge: Option<&str>,
    code_challenge_method: Option<&str>,
    zk_pub_kid: Option<&str>,
    zk_pub_jwk: Option<&str>,
    origin: &str,
    expires_at: OffsetDateTime,
) -> sqlx::Result<Uuid> {
    sqlx::query_scalar!(
        r#"INSERT INTO pending_auths (client_id, redirect_uri, state, nonce, code_challenge,
            code_challenge_method, zk_pub_kid, zk_pub_jwk, origin, expires_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
           RETURNING request_id"#,
        client_id,
        redirect_uri,
        state,
        nonce,
        code_challenge,
        code_challenge_method,
        zk_pub_kid,
        zk_pub_jwk,
        origin,
        expires_at,
    )
    .fetch_one(pool)
    .await
}

pub async fn find(pool: &PgPool, request_id: Uuid) -> sqlx::Result<Option<PendingAuth>> {
    sqlx::query_as!(
        PendingAuth,
        r#"SELECT request_id, client_id, redirect_uri, state, nonce, code_challenge,
            code_challenge_method, zk_pub_kid, zk_pub_jwk, user_sub, origin, expires_at
           FROM pending_auths WHERE request_id = $1"#,
        request_id
    )
    .fetch_optional(pool)
    .await
}

/// Binds `user_sub` only if it is currently unset — the CAS behind the
/// "first authenticated finalize wins" invariant in §4.4/§8. Returns the
/// sub that ends up bound (the caller's, or whichever already won the race)
/// so the handler can tell a legitimate re-finalize from a hijack attempt.
pub async fn bind_user_if_unset(
    pool: &PgPool,
    request_id: Uuid,
    user_sub: &str,
) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar!(
        r#"UPDATE pending_auths SET user_sub = $2
           WHERE request_id = $1 AND user_sub IS NULL
           RETURNING user_sub"#,
        request_id,
        user_sub
    )
    .fetch_optional(pool)
    .await
    .map(|opt| opt.flatten())
}

pub async fn delete(pool: &PgPool, request_id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM pending_auths WHERE request_id = $1"#, request_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn sweep_expired(pool: &PgPool) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM pending_auths WHERE expires_at < now()"#)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
