use axum::Json;
use axum::extract::{Path, State};
use darkauth_types::{Group, MemberStatus, Organization, Permission, Role};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::queries;
use crate::state::AppState;

use super::AdminCtx;

pub async fn list_permissions(State(state): State<AppState>, _ctx: AdminCtx) -> ApiResult<Json<Vec<Permission>>> {
    Ok(Json(queries::permissions::list_permissions(&state.db).await?))
}

#[derive(Deserialize)]
pub struct NewPermission {
    key: String,
    description: String,
}

pub async fn create_permission(State(state): State<AppState>, ctx: AdminCtx, Json(req): Json<NewPermission>) -> ApiResult<()> {
    ctx.require_write()?;
    queries::permissions::create_permission(&state.db, &req.key, &req.description).await?;
    Ok(())
}

pub async fn delete_permission(State(state): State<AppState>, ctx: AdminCtx, Path(key): Path<String>) -> ApiResult<()> {
    ctx.require_write()?;
    queries::permissions::delete_permission(&state.db, &key).await?;
    Ok(())
}

pub async fn list_groups(State(state): State<AppState>, _ctx: AdminCtx) -> ApiResult<Json<Vec<Group>>> {
    Ok(Json(queries::permissions::list_groups(&state.db).await?))
}

pub async fn create_group(State(state): State<AppState>, ctx: AdminCtx, Json(group): Json<Group>) -> ApiResult<()> {
    ctx.require_write()?;
    queries::permissions::create_group(&state.db, &group).await?;
    Ok(())
}

/// `"default"` is the undeletable legacy group (§3 invariant); the caller
/// must not be able to remove it through this endpoint.
pub async fn delete_group(State(state): State<AppState>, ctx: AdminCtx, Path(key): Path<String>) -> ApiResult<()> {
    ctx.require_write()?;
    if key == darkauth_types::DEFAULT_GROUP_KEY {
        return Err(crate::error::ApiError::Forbidden);
    }
    queries::permissions::delete_group(&state.db, &key).await?;
    Ok(())
}

pub async fn list_roles(State(state): State<AppState>, _ctx: AdminCtx) -> ApiResult<Json<Vec<Role>>> {
    Ok(Json(queries::permissions::list_roles(&state.db).await?))
}

#[derive(Deserialize)]
pub struct NewRole {
    key: String,
    name: String,
}

pub async fn create_role(State(state): State<AppState>, ctx: AdminCtx, Json(req): Json<NewRole>) -> ApiResult<()> {
    ctx.require_write()?;
    queries::permissions::create_role(&state.db, &req.key, &req.name).await?;
    Ok(())
}

pub async fn list_organizations(State(state): State<AppState>, _ctx: AdminCtx) -> ApiResult<Json<Vec<Organization>>> {
    Ok(Json(queries::permissions::list_organizations(&state.db).await?))
}

#[derive(Deserialize)]
pub struct NewOrganization {
    slug: String,
    name: String,
}

pub async fn create_organization(
    State(state): State<AppState>,
    ctx: AdminCtx,
    Json(req): Json<NewOrganization>,
) -> ApiResult<Json<Uuid>> {
    ctx.require_write()?;
    let id = queries::permissions::create_organization(&state.db, &req.slug, &req.name, None).await?;
    Ok(Json(id))
}

#[derive(Deserialize)]
pub struct ForceOtpRequest {
    force_otp: bool,
}

pub async fn set_force_otp(
    State(state): State<AppState>,
    ctx: AdminCtx,
    Path(id): Path<Uuid>,
    Json(req): Json<ForceOtpRequest>,
) -> ApiResult<()> {
    ctx.require_write()?;
    queries::permissions::set_force_otp(&state.db, id, req.force_otp).await?;
    Ok(())
}

#[derive(Deserialize)]
pub struct AddMemberRequest {
    user_sub: String,
    #[serde(default = "default_status")]
    status: MemberStatus,
}

fn default_status() -> MemberStatus {
    MemberStatus::Active
}

pub async fn add_member(
    State(state): State<AppState>,
    ctx: AdminCtx,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<Uuid>> {
    ctx.require_write()?;
    let member_id = queries::permissions::add_member(&state.db, id, &req.user_sub, req.status).await?;
    Ok(Json(member_id))
}
