use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use darkauth_types::ActorKind;

use crate::crypto::hash::constant_time_eq;
use crate::error::ApiError;
use crate::session_store::{self, LoadedSession, Realm};
use crate::state::AppState;

/// An authenticated user-realm session, extracted from the
/// `__Host-DarkAuth-User` cookie (§4.2, §6).
pub struct UserSession(pub LoadedSession);

/// An authenticated admin-realm session, extracted from the
/// `__Host-DarkAuth-Admin` cookie.
pub struct AdminSession(pub LoadedSession);

async fn load_session(
    parts: &Parts,
    state: &AppState,
    realm: Realm,
    expected_kind: ActorKind,
) -> Result<LoadedSession, ApiError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let session_id = jar.get(realm.cookie_prefix()).map(|c| c.value().to_string()).ok_or(ApiError::Unauthorized)?;

    let session = session_store::load(&state.db, &session_id).await?;
    if session.actor_kind != expected_kind {
        return Err(ApiError::Unauthorized);
    }
    Ok(session)
}

impl FromRequestParts<AppState> for UserSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        load_session(parts, state, Realm::User, ActorKind::User).await.map(UserSession)
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        load_session(parts, state, Realm::Admin, ActorKind::Admin).await.map(AdminSession)
    }
}

/// Enforces the CSRF contract (§4.2): the `x-csrf-token` header must match
/// the session's CSRF secret in constant time. Applied to every mutating,
/// cookie-authenticated endpoint except the OAuth token endpoint (§9 open
/// question — CSRF stays off there since Basic auth already authenticates
/// the caller).
pub fn verify_csrf(parts: &Parts, session: &LoadedSession) -> Result<(), ApiError> {
    let header = parts
        .headers
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Forbidden)?;
    if constant_time_eq(header, &session.csrf_secret) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
