use axum::Json;
use axum::extract::State;
use axum::http::request::Parts;
use darkauth_types::{OtpCodeRequest, OtpSetupInitResponse, OtpVerifyResponse};

use crate::auth_session::{UserSession, verify_csrf};
use crate::error::{ApiError, ApiResult};
use crate::otp;
use crate::session_store;
use crate::state::AppState;

/// `POST /otp/setup/init` (§4.8, §6).
pub async fn setup_init(
    State(state): State<AppState>,
    session: UserSession,
    parts: Parts,
) -> ApiResult<Json<OtpSetupInitResponse>> {
    verify_csrf(&parts, &session.0)?;
    let init = otp::setup_init(&state.db, &state.kek, &session.0.actor_ref, &state.config.issuer).await?;
    Ok(Json(OtpSetupInitResponse { secret_base32: init.secret_base32, otpauth_uri: init.otpauth_uri }))
}

/// `POST /otp/setup/verify`.
pub async fn setup_verify(
    State(state): State<AppState>,
    session: UserSession,
    parts: Parts,
    Json(req): Json<OtpCodeRequest>,
) -> ApiResult<Json<OtpVerifyResponse>> {
    verify_csrf(&parts, &session.0)?;
    let verified = otp::setup_verify(&state.db, &state.kek, &session.0.actor_ref, &req.code).await?;
    Ok(Json(OtpVerifyResponse { verified }))
}

/// `POST /otp/verify`. On success, flips `otpVerified` on the caller's own
/// session row so later step-up checks (e.g. `/authorize/finalize`) see it.
pub async fn verify(
    State(state): State<AppState>,
    session: UserSession,
    parts: Parts,
    Json(req): Json<OtpCodeRequest>,
) -> ApiResult<Json<OtpVerifyResponse>> {
    verify_csrf(&parts, &session.0)?;
    match otp::verify(&state.db, &state.kek, &session.0.actor_ref, &req.code).await? {
        otp::VerifyOutcome::Verified => {
            session_store::mark_otp_verified(&state.db, &session.0.session_id_hash).await?;
            Ok(Json(OtpVerifyResponse { verified: true }))
        }
        otp::VerifyOutcome::Invalid => Ok(Json(OtpVerifyResponse { verified: false })),
        otp::VerifyOutcome::Locked(until) => Err(ApiError::Locked(until)),
    }
}
