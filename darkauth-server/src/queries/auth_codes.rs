use sqlx::PgPool;
use time::OffsetDateTime;

pub struct AuthCode {
    pub code: String,
    pub client_id: String,
    pub user_sub: String,
    pub redirect_uri: String,
    pub nonce: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub has_zk: bool,
    pub zk_pub_kid: Option<String>,
    pub drk_hash: Option<String>,
    pub expires_at: OffsetDateTime,
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &PgPool,
    code: &str,
    client_id: &str,
    user_sub: &str,
    redirect_uri: &str,
    nonce: Option<&str>,
    code_challenge: Option<&str>,
    code_challenge_method: Option<&str>,
    has_zk: bool,
    zk_pub_kid: Option<&str>,
    drk_hash: Option<&str>,
    expires_at: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO auth_codes (code, client_id, user_sub, redirect_uri, nonce, code_challenge,
            code_challenge_method, has_zk, zk_pub_kid, drk_hash, expires_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        code,
        client_id,
        user_sub,
        redirect_uri,
        nonce,
        code_challenge,
        code_challenge_method,
        has_zk,
        zk_pub_kid,
        drk_hash,
        expires_at,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Atomic single-use redemption (§4.5.1 step 3, §8): flips `consumed` from
/// false to true via `UPDATE ... WHERE consumed = false RETURNING`. Under N
/// concurrent calls with the same code, the database linearizes this and
/// exactly one returns `Some`.
pub async fn redeem(pool: &PgPool, code: &str) -> sqlx::Result<Option<AuthCode>> {
    sqlx::query_as!(
        AuthCode,
        r#"UPDATE auth_codes SET consumed = true
           WHERE code = $1 AND consumed = false
           RETURNING code, client_id, user_sub, redirect_uri, nonce, code_challenge,
               code_challenge_method, has_zk, zk_pub_kid, drk_hash, expires_at"#,
        code
    )
    .fetch_optional(pool)
    .await
}

pub async fn find(pool: &PgPool, code: &str) -> sqlx::Result<Option<AuthCode>> {
    sqlx::query_as!(
        AuthCode,
        r#"SELECT code, client_id, user_sub, redirect_uri, nonce, code_challenge,
            code_challenge_method, has_zk, zk_pub_kid, drk_hash, expires_at
           FROM auth_codes WHERE code = $1"#,
        code
    )
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, code: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM auth_codes WHERE code = $1"#, code)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Observes only `consumed = true OR expires_at < now() - grace` so the
/// sweeper never races a concurrent redemption that is mid-flight on an
/// unconsumed, not-yet-expired code (§4.9).
pub async fn sweep_expired(pool: &PgPool, grace_seconds: i64) -> sqlx::Result<u64> {
    let result = sqlx::query!(
        r#"DELETE FROM auth_codes
           WHERE consumed = true OR expires_at < now() - make_interval(secs => $1)"#,
        grace_seconds as f64
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
