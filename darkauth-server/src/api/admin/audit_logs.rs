use axum::Json;
use axum::extract::{Query, State};
use darkauth_types::{AuditEvent, PaginatedResponse, PaginationQuery};

use crate::error::ApiResult;
use crate::queries;
use crate::state::AppState;

use super::AdminCtx;

pub async fn list(
    State(state): State<AppState>,
    _ctx: AdminCtx,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<Json<PaginatedResponse<AuditEvent>>> {
    let items = queries::audit::list(&state.db, query.limit, query.offset()).await?;
    let total = queries::audit::count(&state.db).await?;
    Ok(Json(PaginatedResponse::new(items, query, total)))
}
