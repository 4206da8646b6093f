use axum::Json;
use axum::extract::{Path, Query, State};
use darkauth_types::{PaginatedResponse, PaginationQuery, User};

use crate::error::ApiResult;
use crate::queries;
use crate::state::AppState;

use super::AdminCtx;

pub async fn list(
    State(state): State<AppState>,
    _ctx: AdminCtx,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<Json<PaginatedResponse<User>>> {
    let items = queries::users::list(&state.db, query.limit, query.offset()).await?;
    let total = queries::users::count(&state.db).await?;
    Ok(Json(PaginatedResponse::new(items, query, total)))
}

pub async fn get(State(state): State<AppState>, _ctx: AdminCtx, Path(sub): Path<String>) -> ApiResult<Json<User>> {
    let user = queries::users::find_by_sub(&state.db, &sub).await?.ok_or(crate::error::ApiError::NotFound)?;
    Ok(Json(user))
}

pub async fn delete(State(state): State<AppState>, ctx: AdminCtx, Path(sub): Path<String>) -> ApiResult<()> {
    ctx.require_write()?;
    queries::users::delete(&state.db, &sub).await?;
    Ok(())
}
