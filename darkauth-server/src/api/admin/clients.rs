use axum::Json;
use axum::extract::{Path, Query, State};
use darkauth_types::{Client, NewClient, PaginatedResponse, PaginationQuery, ZkDelivery};

use crate::crypto::b64;
use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::state::AppState;

use super::AdminCtx;

pub async fn list(
    State(state): State<AppState>,
    _ctx: AdminCtx,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<Json<PaginatedResponse<Client>>> {
    let items = queries::clients::list(&state.db, query.limit, query.offset()).await?;
    let total = queries::clients::count(&state.db).await?;
    Ok(Json(PaginatedResponse::new(items, query, total)))
}

pub async fn get(
    State(state): State<AppState>,
    _ctx: AdminCtx,
    Path(client_id): Path<String>,
) -> ApiResult<Json<Client>> {
    let client = queries::clients::find(&state.db, &client_id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(client))
}

pub async fn create(State(state): State<AppState>, ctx: AdminCtx, Json(req): Json<NewClient>) -> ApiResult<Json<Client>> {
    ctx.require_write()?;
    let client = Client {
        client_id: req.client_id,
        client_type: req.client_type,
        token_endpoint_auth_method: match req.client_type {
            darkauth_types::ClientType::Public => darkauth_types::TokenEndpointAuthMethod::None,
            darkauth_types::ClientType::Confidential => darkauth_types::TokenEndpointAuthMethod::ClientSecretBasic,
        },
        require_pkce: req.require_pkce,
        redirect_uris: req.redirect_uris,
        post_logout_redirect_uris: req.post_logout_redirect_uris,
        grant_types: if req.grant_types.is_empty() { vec!["authorization_code".into()] } else { req.grant_types },
        response_types: vec!["code".into()],
        scopes: if req.scopes.is_empty() { vec!["openid".into()] } else { req.scopes },
        allowed_zk_origins: req.allowed_zk_origins,
        zk_delivery: req.zk_delivery.unwrap_or(ZkDelivery::None),
        zk_required: req.zk_required,
        id_token_lifetime_seconds: req.id_token_lifetime_seconds,
        refresh_token_lifetime_seconds: req.refresh_token_lifetime_seconds,
        client_secret_enc: None,
    };
    queries::clients::insert(&state.db, &client).await?;
    Ok(Json(client))
}

pub async fn delete(State(state): State<AppState>, ctx: AdminCtx, Path(client_id): Path<String>) -> ApiResult<()> {
    ctx.require_write()?;
    queries::clients::delete(&state.db, &client_id).await?;
    Ok(())
}

#[derive(serde::Serialize)]
pub struct RotatedSecret {
    client_secret: String,
}

/// Generates a fresh client secret, KEK-wraps it for storage, and returns
/// the plaintext once — the server never stores or logs it unwrapped.
pub async fn rotate_secret(
    State(state): State<AppState>,
    ctx: AdminCtx,
    Path(client_id): Path<String>,
) -> ApiResult<Json<RotatedSecret>> {
    ctx.require_write()?;
    queries::clients::find(&state.db, &client_id).await?.ok_or(ApiError::NotFound)?;
    let secret = b64::random_token(32);
    let wrapped = state.kek.wrap(secret.as_bytes())?;
    queries::clients::set_secret(&state.db, &client_id, &wrapped).await?;
    Ok(Json(RotatedSecret { client_secret: secret }))
}
