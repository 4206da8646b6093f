use axum::Json;
use axum::extract::State;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use darkauth_types::SessionResponse;

use crate::auth_session::{UserSession, verify_csrf};
use crate::cookies::clear_session_cookies;
use crate::error::ApiResult;
use crate::queries;
use crate::session_store::Realm;
use crate::state::AppState;

/// `GET /session` (§6).
pub async fn get_session(State(state): State<AppState>, session: UserSession) -> ApiResult<Json<SessionResponse>> {
    let user = queries::users::find_by_sub(&state.db, &session.0.actor_ref).await?;
    let (email, name, password_reset_required) = match &user {
        Some(u) => (u.email.clone(), u.name.clone(), u.password_reset_required),
        None => (session.0.email.clone().unwrap_or_default(), session.0.name.clone().unwrap_or_default(), false),
    };
    Ok(Json(SessionResponse {
        sub: session.0.actor_ref,
        email,
        name,
        authenticated: true,
        otp_required: session.0.otp_required,
        otp_verified: session.0.otp_verified,
        password_reset_required,
    }))
}

/// `POST /logout` (§6). Clears cookies and deletes the session + refresh
/// chain server-side so the session cannot be revived from the cookie
/// alone.
pub async fn logout(
    State(state): State<AppState>,
    session: UserSession,
    parts: Parts,
    jar: CookieJar,
) -> ApiResult<CookieJar> {
    verify_csrf(&parts, &session.0)?;
    let jar_for_id = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar_for_id.get(Realm::User.cookie_prefix()) {
        crate::session_store::destroy(&state.db, cookie.value()).await?;
    }
    Ok(clear_session_cookies(jar, Realm::User))
}
