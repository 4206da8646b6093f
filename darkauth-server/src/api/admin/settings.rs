use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::queries;
use crate::state::AppState;

use super::AdminCtx;

#[derive(Serialize)]
pub struct SettingEntry {
    key: String,
    value: serde_json::Value,
}

pub async fn list(State(state): State<AppState>, _ctx: AdminCtx) -> ApiResult<Json<Vec<SettingEntry>>> {
    let entries = queries::settings::list(&state.db)
        .await?
        .into_iter()
        .map(|(key, value)| SettingEntry { key, value })
        .collect();
    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct SetSettingRequest {
    key: String,
    value: serde_json::Value,
}

pub async fn set(State(state): State<AppState>, ctx: AdminCtx, Json(req): Json<SetSettingRequest>) -> ApiResult<()> {
    ctx.require_write()?;
    queries::settings::set(&state.db, &req.key, &req.value).await?;
    Ok(())
}
