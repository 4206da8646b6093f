use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use darkauth_types::{
    ActorKind, LoginFinishRequest, LoginFinishResponse, LoginStartRequest, LoginStartResponse,
    RegisterFinishRequest, RegisterFinishResponse, RegisterStartRequest, RegisterStartResponse,
};
use uuid::Uuid;

use crate::cookies::attach_session_cookies;
use crate::crypto::b64;
use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::rbac;
use crate::session_store::{self, Realm};
use crate::state::AppState;

/// `POST /opaque/register/start` (§4.1, §6). Gated by the
/// `self_registration` setting; the install flow has its own endpoints
/// (`api::install`) that bypass this gate for the first admin.
pub async fn register_start(
    State(state): State<AppState>,
    Json(req): Json<RegisterStartRequest>,
) -> ApiResult<Json<RegisterStartResponse>> {
    if !state.config.self_registration {
        return Err(ApiError::Forbidden);
    }
    if queries::users::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict);
    }
    let message = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed message".into()))?;
    let result = state.pake.register_start(&req.email, &message)?;
    Ok(Json(RegisterStartResponse {
        session_id: result.session_id,
        message: b64::encode(&result.message),
        server_public_key: b64::encode(&result.server_public_key),
    }))
}

pub async fn register_finish(
    State(state): State<AppState>,
    Json(req): Json<RegisterFinishRequest>,
) -> ApiResult<Json<RegisterFinishResponse>> {
    if !state.config.self_registration {
        return Err(ApiError::Forbidden);
    }
    let upload = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed upload".into()))?;
    let result = state.pake.register_finish(&req.session_id, &upload)?;

    let sub = format!("usr_{}", Uuid::new_v4().simple());
    let user = queries::users::insert(&state.db, &sub, &result.email, None).await?;
    queries::pake::upsert_user_record(&state.db, &user.sub, &result.envelope, &result.server_public_key).await?;

    Ok(Json(RegisterFinishResponse { registered: true }))
}

/// `POST /opaque/login/start` (§4.1, §6). Never reveals whether `email` is
/// registered: the engine produces a plausible message either way.
pub async fn login_start(
    State(state): State<AppState>,
    Json(req): Json<LoginStartRequest>,
) -> ApiResult<Json<LoginStartResponse>> {
    let message = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed message".into()))?;
    let stored = queries::users::find_by_email(&state.db, &req.email)
        .await?
        .map(|u| u.sub);
    let record = match &stored {
        Some(sub) => queries::pake::find_user_record(&state.db, sub).await?,
        None => None,
    };
    let result = state
        .pake
        .login_start(&req.email, &message, record.as_ref().map(|r| r.envelope.as_slice()))?;
    Ok(Json(LoginStartResponse { session_id: result.session_id, message: b64::encode(&result.message) }))
}

/// `POST /opaque/login/finish`. On success this is the only place the
/// `__Host-DarkAuth-User*` cookies are minted for a fresh password login.
pub async fn login_finish(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginFinishRequest>,
) -> ApiResult<(CookieJar, Json<LoginFinishResponse>)> {
    let finish = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed message".into()))?;
    let result = state.pake.login_finish(&req.session_id, &finish)?;

    let user = queries::users::find_by_email(&state.db, &result.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let otp_required = rbac::otp_required(&state.db, &user.sub, state.config.otp_require_for_users).await?;
    let new_session = session_store::create_session(
        &state.db,
        ActorKind::User,
        &user.sub,
        Some(&user.email),
        Some(&user.name),
        None,
        otp_required,
        state.config.refresh_token_lifetime_seconds,
    )
    .await?;

    let jar = attach_session_cookies(jar, Realm::User, &new_session, session_store::SESSION_TTL_SECONDS);

    Ok((
        jar,
        Json(LoginFinishResponse {
            authenticated: true,
            otp_required,
            password_reset_required: user.password_reset_required,
        }),
    ))
}
