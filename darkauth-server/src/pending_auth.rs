use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::queries::pending_auths::PendingAuth;

pub const PENDING_AUTH_TTL_SECONDS: i64 = 10 * 60;

#[allow(clippy::too_many_arguments)]
pub async fn create(
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
) -> ApiResult<Uuid> {
    let expires_at = OffsetDateTime::now_utc() + Duration::seconds(PENDING_AUTH_TTL_SECONDS);
    Ok(queries::pending_auths::insert(
        pool,
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
    .await?)
}

pub async fn load_not_expired(pool: &PgPool, request_id: Uuid) -> ApiResult<PendingAuth> {
    let pending = queries::pending_auths::find(pool, request_id)
        .await?
        .ok_or_else(|| ApiError::InvalidRequest("pending authorization not found".into()))?;
    if pending.expires_at < OffsetDateTime::now_utc() {
        queries::pending_auths::delete(pool, request_id).await?;
        return Err(ApiError::InvalidRequest("pending authorization expired".into()));
    }
    Ok(pending)
}

/// Implements the binding invariant in §4.4/§8: the first authenticated
/// finalize claims `userSub`; a later finalize from a different session is
/// `forbidden`.
pub async fn bind_or_verify_user(pool: &PgPool, request_id: Uuid, user_sub: &str) -> ApiResult<()> {
    if let Some(bound) = queries::pending_auths::bind_user_if_unset(pool, request_id, user_sub).await? {
        if bound != user_sub {
            return Err(ApiError::Forbidden);
        }
        return Ok(());
    }
    // Already bound by a previous call; it must be this same session's user.
    let pending = queries::pending_auths::find(pool, request_id)
        .await?
        .ok_or_else(|| ApiError::InvalidRequest("pending authorization not found".into()))?;
    match pending.user_sub {
        Some(existing) if existing == user_sub => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}

pub async fn delete(pool: &PgPool, request_id: Uuid) -> ApiResult<()> {
    queries::pending_auths::delete(pool, request_id).await?;
    Ok(())
}
