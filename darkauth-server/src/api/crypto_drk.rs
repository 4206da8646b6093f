use axum::Json;
use axum::extract::State;
use axum::http::request::Parts;
use darkauth_types::WrappedDrk;

use crate::auth_session::{UserSession, verify_csrf};
use crate::crypto::b64;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::zk;

/// `GET /crypto/wrapped-drk` (§4.6, §6).
pub async fn get_wrapped_drk(State(state): State<AppState>, session: UserSession) -> ApiResult<Json<WrappedDrk>> {
    let blob = zk::get(&state.db, &session.0.actor_ref).await?;
    Ok(Json(WrappedDrk { wrapped_drk: b64::encode(&blob) }))
}

/// `PUT /crypto/wrapped-drk`.
pub async fn put_wrapped_drk(
    State(state): State<AppState>,
    session: UserSession,
    parts: Parts,
    Json(req): Json<WrappedDrk>,
) -> ApiResult<()> {
    verify_csrf(&parts, &session.0)?;
    let blob = b64::decode(&req.wrapped_drk).map_err(|_| ApiError::InvalidRequest("wrapped_drk is not valid base64url".into()))?;
    zk::put(&state.db, &session.0.actor_ref, &blob).await?;
    Ok(())
}
