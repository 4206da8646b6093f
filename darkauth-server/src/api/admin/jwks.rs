use axum::Json;
use axum::extract::State;
use darkauth_types::JwksResponse;
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

use super::AdminCtx;

pub async fn list(State(state): State<AppState>, _ctx: AdminCtx) -> ApiResult<Json<JwksResponse>> {
    Ok(Json(JwksResponse { keys: state.jwks.public_jwks().await }))
}

#[derive(Serialize)]
pub struct RotateResponse {
    kid: String,
}

pub async fn rotate(State(state): State<AppState>, ctx: AdminCtx) -> ApiResult<Json<RotateResponse>> {
    ctx.require_write()?;
    let kid = state.jwks.rotate().await?;
    Ok(Json(RotateResponse { kid }))
}
