use sqlx::PgPool;
use time::{Duration, OffsetDateTime};

use crate::crypto::b64;
use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::queries::auth_codes::AuthCode;

pub const AUTH_CODE_TTL_SECONDS: i64 = 60;

#[allow(clippy::too_many_arguments)]
pub async fn mint(
    pool: &PgPool,
    client_id: &str,
    user_sub: &str,
    redirect_uri: &str,
    nonce: Option<&str>,
    code_challenge: Option<&str>,
    code_challenge_method: Option<&str>,
    has_zk: bool,
    zk_pub_kid: Option<&str>,
    drk_hash: Option<&str>,
) -> ApiResult<String> {
    let code = b64::random_token(32);
    let expires_at = OffsetDateTime::now_utc() + Duration::seconds(AUTH_CODE_TTL_SECONDS);
    queries::auth_codes::insert(
        pool,
        &code,
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
    .await?;
    Ok(code)
}

/// Redeems `code` exactly once (§4.5.1 steps 1-4, §8). The expiry check
/// runs after the atomic flip so an expired-but-unconsumed code is still
/// consumed by the first caller (preventing a second caller from reviving
/// it), then rejected with `invalid_grant "expired"`.
pub async fn redeem(pool: &PgPool, code: &str) -> ApiResult<AuthCode> {
    let redeemed = queries::auth_codes::redeem(pool, code)
        .await?
        .ok_or_else(|| ApiError::InvalidGrant("authorization code already used".into()))?;

    if redeemed.expires_at < OffsetDateTime::now_utc() {
        queries::auth_codes::delete(pool, code).await?;
        return Err(ApiError::InvalidGrant("authorization code expired".into()));
    }

    Ok(redeemed)
}
