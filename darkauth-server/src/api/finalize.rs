use axum::Json;
use axum::extract::State;
use axum::http::request::Parts;
use darkauth_types::{FinalizeApproved, FinalizeDenied, FinalizeRequest};
use uuid::Uuid;

use crate::auth_code;
use crate::auth_session::{UserSession, verify_csrf};
use crate::error::{ApiError, ApiResult};
use crate::pending_auth;
use crate::queries;
use crate::rbac;
use crate::state::AppState;

/// `POST /authorize/finalize` (§4.4). Requires an authenticated user
/// session with CSRF enforced.
pub async fn finalize(
    State(state): State<AppState>,
    session: UserSession,
    parts: Parts,
    Json(req): Json<FinalizeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    verify_csrf(&parts, &session.0)?;

    let request_id = Uuid::parse_str(&req.request_id)
        .map_err(|_| ApiError::InvalidRequest("request_id is not a valid uuid".into()))?;

    let pending = pending_auth::load_not_expired(&state.db, request_id).await?;
    pending_auth::bind_or_verify_user(&state.db, request_id, &session.0.actor_ref).await?;

    if req.approve.as_deref() == Some("false") {
        pending_auth::delete(&state.db, request_id).await?;
        return Ok(Json(serde_json::to_value(FinalizeDenied {
            error: "access_denied".into(),
            state: pending.state,
            redirect_uri: pending.redirect_uri,
        })?));
    }

    if session.0.otp_required && !session.0.otp_verified {
        return Err(ApiError::Forbidden);
    }

    let global_otp_required =
        queries::settings::get(&state.db, "otp.require_for_users")
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
    if rbac::otp_required(&state.db, &session.0.actor_ref, global_otp_required).await?
        && !session.0.otp_verified
    {
        return Err(ApiError::Forbidden);
    }

    let client = queries::clients::find(&state.db, &pending.client_id)
        .await?
        .ok_or(ApiError::InvalidRequest("client no longer exists".into()))?;

    let has_zk = client.zk_delivery != darkauth_types::ZkDelivery::None && pending.zk_pub_kid.is_some();

    let code = auth_code::mint(
        &state.db,
        &pending.client_id,
        &session.0.actor_ref,
        &pending.redirect_uri,
        pending.nonce.as_deref(),
        pending.code_challenge.as_deref(),
        pending.code_challenge_method.as_deref(),
        has_zk,
        pending.zk_pub_kid.as_deref(),
        req.drk_hash.as_deref(),
    )
    .await?;

    pending_auth::delete(&state.db, request_id).await?;

    Ok(Json(serde_json::to_value(FinalizeApproved {
        code,
        state: pending.state,
        redirect_uri: pending.redirect_uri,
    })?))
}
