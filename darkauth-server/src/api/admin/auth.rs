use axum::Json;
use axum::extract::State;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use darkauth_types::{ActorKind, LoginFinishRequest, LoginFinishResponse, LoginStartRequest, LoginStartResponse};

use crate::auth_session::verify_csrf;
use crate::cookies::{attach_session_cookies, clear_session_cookies};
use crate::crypto::b64;
use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::session_store::{self, Realm};
use crate::state::AppState;

use super::AdminCtx;

/// `POST /admin/opaque/login/start`. Same anti-enumeration behavior as the
/// user realm, against the `admins`/`pake_admin_records` tables instead.
pub async fn login_start(
    State(state): State<AppState>,
    Json(req): Json<LoginStartRequest>,
) -> ApiResult<Json<LoginStartResponse>> {
    let message = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed message".into()))?;
    let admin = queries::admins::find_by_email(&state.db, &req.email).await?;
    let record = match &admin {
        Some(a) => queries::pake::find_admin_record(&state.db, a.id).await?,
        None => None,
    };
    let result = state
        .pake
        .login_start(&req.email, &message, record.as_ref().map(|r| r.envelope.as_slice()))?;
    Ok(Json(LoginStartResponse { session_id: result.session_id, message: b64::encode(&result.message) }))
}

pub async fn login_finish(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginFinishRequest>,
) -> ApiResult<(CookieJar, Json<LoginFinishResponse>)> {
    let finish = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed message".into()))?;
    let result = state.pake.login_finish(&req.session_id, &finish)?;

    let admin = queries::admins::find_by_email(&state.db, &result.email).await?.ok_or(ApiError::Unauthorized)?;

    let new_session = session_store::create_session(
        &state.db,
        ActorKind::Admin,
        &admin.id.to_string(),
        Some(&admin.email),
        Some(&admin.name),
        None,
        false,
        session_store::REFRESH_TTL_SECONDS,
    )
    .await?;

    let jar = attach_session_cookies(jar, Realm::Admin, &new_session, session_store::SESSION_TTL_SECONDS);

    Ok((
        jar,
        Json(LoginFinishResponse {
            authenticated: true,
            otp_required: false,
            password_reset_required: admin.password_reset_required,
        }),
    ))
}

pub async fn logout(State(state): State<AppState>, ctx: AdminCtx, parts: Parts, jar: CookieJar) -> ApiResult<CookieJar> {
    verify_csrf(&parts, &ctx.session)?;
    queries::refresh_tokens::delete_for_session(&state.db, &ctx.session.session_id_hash).await?;
    queries::sessions::delete(&state.db, &ctx.session.session_id_hash).await?;
    Ok(clear_session_cookies(jar, Realm::Admin))
}
