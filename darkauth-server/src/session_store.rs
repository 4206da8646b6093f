use darkauth_types::ActorKind;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};

use crate::crypto::{b64, hash::sha256_b64};
use crate::error::{ApiError, ApiResult};
use crate::queries;

pub const SESSION_TTL_SECONDS: i64 = 12 * 3600;
pub const REFRESH_TTL_SECONDS: i64 = 30 * 24 * 3600;

pub struct NewSession {
    pub session_id: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

/// Cookie name prefixes for the two realms (§4.2, §6).
#[derive(Clone, Copy)]
pub enum Realm {
    User,
    Admin,
}

impl Realm {
    pub fn cookie_prefix(self) -> &'static str {
        match self {
            Realm::User => "__Host-DarkAuth-User",
            Realm::Admin => "__Host-DarkAuth-Admin",
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn create_session(
    pool: &PgPool,
    actor_kind: ActorKind,
    actor_ref: &str,
    email: Option<&str>,
    name: Option<&str>,
    client_id: Option<&str>,
    otp_required: bool,
    refresh_ttl_seconds: i64,
) -> ApiResult<NewSession> {
    let session_id = b64::random_token(32);
    let refresh_secret = b64::random_token(32);
    let csrf_token = b64::random_token(32);

    let session_id_hash = sha256_b64(session_id.as_bytes());
    let refresh_hash = sha256_b64(refresh_secret.as_bytes());

    let now = OffsetDateTime::now_utc();
    queries::sessions::insert(
        pool,
        &session_id_hash,
        actor_kind,
        actor_ref,
        email,
        name,
        client_id,
        &csrf_token,
        otp_required,
        now + Duration::seconds(SESSION_TTL_SECONDS),
    )
    .await?;

    queries::refresh_tokens::insert(
        pool,
        &refresh_hash,
        &session_id_hash,
        None,
        now + Duration::seconds(refresh_ttl_seconds),
    )
    .await?;

    Ok(NewSession { session_id, refresh_token: refresh_secret, csrf_token })
}

pub struct LoadedSession {
    pub session_id_hash: String,
    pub actor_kind: ActorKind,
    pub actor_ref: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub client_id: Option<String>,
    pub csrf_secret: String,
    pub otp_required: bool,
    pub otp_verified: bool,
}

pub async fn load(pool: &PgPool, session_id: &str) -> ApiResult<LoadedSession> {
    let hash = sha256_b64(session_id.as_bytes());
    let row = queries::sessions::find(pool, &hash).await?.ok_or(ApiError::Unauthorized)?;
    Ok(LoadedSession {
        session_id_hash: row.session_id_hash,
        actor_kind: row.actor_kind,
        actor_ref: row.actor_ref,
        email: row.email,
        name: row.name,
        client_id: row.client_id,
        csrf_secret: row.csrf_secret,
        otp_required: row.otp_required,
        otp_verified: row.otp_verified,
    })
}

pub async fn mark_otp_verified(pool: &PgPool, session_id_hash: &str) -> ApiResult<()> {
    queries::sessions::mark_otp_verified(pool, session_id_hash).await?;
    Ok(())
}

pub async fn destroy(pool: &PgPool, session_id: &str) -> ApiResult<()> {
    let hash = sha256_b64(session_id.as_bytes());
    queries::refresh_tokens::delete_for_session(pool, &hash).await?;
    queries::sessions::delete(pool, &hash).await?;
    Ok(())
}

pub struct RotatedRefresh {
    pub refresh_token: String,
    pub session: LoadedSession,
}

/// Atomic rotation (§4.2). Returns `invalid_grant` for an absent, expired,
/// or already-rotated token — the caller maps this straight onto the
/// `/token refresh_token` grant's error response.
pub async fn rotate_refresh(pool: &PgPool, refresh_token: &str, refresh_ttl_seconds: i64) -> ApiResult<RotatedRefresh> {
    let old_hash = sha256_b64(refresh_token.as_bytes());
    let consumed = queries::refresh_tokens::consume(pool, &old_hash)
        .await?
        .ok_or_else(|| ApiError::InvalidGrant("refresh token is invalid or already used".into()))?;

    let new_secret = b64::random_token(32);
    let new_hash = sha256_b64(new_secret.as_bytes());
    queries::refresh_tokens::insert(
        pool,
        &new_hash,
        &consumed.session_id_hash,
        Some(&old_hash),
        OffsetDateTime::now_utc() + Duration::seconds(refresh_ttl_seconds),
    )
    .await?;

    let session = queries::sessions::find(pool, &consumed.session_id_hash)
        .await?
        .ok_or_else(|| ApiError::InvalidGrant("session expired".into()))?;

    Ok(RotatedRefresh {
        refresh_token: new_secret,
        session: LoadedSession {
            session_id_hash: session.session_id_hash,
            actor_kind: session.actor_kind,
            actor_ref: session.actor_ref,
            email: session.email,
            name: session.name,
            client_id: session.client_id,
            csrf_secret: session.csrf_secret,
            otp_required: session.otp_required,
            otp_verified: session.otp_verified,
        },
    })
}
