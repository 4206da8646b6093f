use axum::Json;
use axum::extract::State;
use darkauth_types::{
    ActorKind, AdminRole, InstallOpaqueFinishRequest, InstallOpaqueFinishResponse,
    InstallOpaqueStartRequest, InstallOpaqueStartResponse,
};
use time::{Duration, OffsetDateTime};

use crate::audit;
use crate::crypto::{b64, hash::constant_time_eq};
use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::state::AppState;

const INSTALL_TOKEN_MAX_AGE: Duration = Duration::minutes(10);

/// `POST /install/opaque/start` (§4.10). Records the claimed identity so
/// `finish` can reject a mismatched email/name, and runs the same PAKE
/// registration start as `/opaque/register/start`.
pub async fn opaque_start(
    State(state): State<AppState>,
    Json(req): Json<InstallOpaqueStartRequest>,
) -> ApiResult<Json<InstallOpaqueStartResponse>> {
    let install = queries::install::get(&state.db).await?.ok_or(ApiError::InstallTokenForbidden)?;
    if install.consumed_at.is_some() {
        return Err(ApiError::AlreadyInitialized);
    }
    if !constant_time_eq(&req.token, &install.token) {
        return Err(ApiError::InstallTokenForbidden);
    }

    queries::install::set_identity(&state.db, &req.email, req.name.as_deref()).await?;

    let message = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed message".into()))?;
    let result = state.pake.register_start(&req.email, &message)?;

    Ok(Json(InstallOpaqueStartResponse {
        session_id: result.session_id,
        message: b64::encode(&result.message),
        server_public_key: b64::encode(&result.server_public_key),
    }))
}

/// `POST /install/opaque/finish` (§4.10). Creates the first admin, a
/// default organization, and seed settings, then atomically consumes the
/// install token so a retried finish fails.
pub async fn opaque_finish(
    State(state): State<AppState>,
    Json(req): Json<InstallOpaqueFinishRequest>,
) -> ApiResult<Json<InstallOpaqueFinishResponse>> {
    let install = queries::install::get(&state.db).await?.ok_or(ApiError::InstallTokenForbidden)?;
    if install.consumed_at.is_some() {
        return Err(ApiError::AlreadyInitialized);
    }
    if !constant_time_eq(&req.token, &install.token) {
        return Err(ApiError::InstallTokenForbidden);
    }
    if OffsetDateTime::now_utc() - install.created_at > INSTALL_TOKEN_MAX_AGE {
        return Err(ApiError::InstallTokenExpired);
    }
    if install.email.as_deref() != Some(req.email.as_str()) || install.name != req.name {
        return Err(ApiError::InvalidRequest("email/name do not match the start request".into()));
    }

    let upload = b64::decode(&req.message).map_err(|_| ApiError::InvalidRequest("malformed upload".into()))?;
    let result = state.pake.register_finish(&req.session_id, &upload)?;

    let admin = queries::admins::insert(&state.db, &req.email, req.name.as_deref(), AdminRole::Write).await?;
    queries::pake::upsert_admin_record(&state.db, admin.id, &result.envelope, &result.server_public_key).await?;

    queries::permissions::create_organization(&state.db, "default", "Default Organization", None).await?;

    queries::settings::set(&state.db, "otp.require_for_users", &serde_json::json!(state.config.otp_require_for_users)).await?;
    queries::settings::set(&state.db, "self_registration", &serde_json::json!(state.config.self_registration)).await?;

    if !queries::install::consume(&state.db).await? {
        return Err(ApiError::AlreadyInitialized);
    }

    audit::emit(
        &state.db,
        audit::event(
            "install.completed",
            ActorKind::Admin,
            Some(admin.id.to_string()),
            "admin",
            Some(admin.id.to_string()),
            "POST",
            "/install/opaque/finish",
            200,
            true,
        ),
    )
    .await;

    Ok(Json(InstallOpaqueFinishResponse { installed: true, admin_id: admin.id }))
}
