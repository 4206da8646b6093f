mod audit_logs;
mod auth;
mod clients;
mod jwks;
mod rbac;
mod settings;
mod users;

use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{get, post, put};
use darkauth_types::AdminRole;

use crate::auth_session::AdminSession;
use crate::error::ApiError;
use crate::queries;
use crate::session_store::LoadedSession;
use crate::state::AppState;

/// An authenticated admin session plus its resolved role, used to gate
/// write endpoints (§6 "admin session (role ≥ read; write for mutations)").
pub struct AdminCtx {
    pub session: LoadedSession,
    pub role: AdminRole,
}

impl FromRequestParts<AppState> for AdminCtx {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AdminSession(session) = AdminSession::from_request_parts(parts, state).await?;
        let admin_id: uuid::Uuid = session.actor_ref.parse().map_err(|_| ApiError::Unauthorized)?;
        let admin = queries::admins::find_by_id(&state.db, admin_id).await?.ok_or(ApiError::Unauthorized)?;
        Ok(AdminCtx { session, role: admin.role })
    }
}

impl AdminCtx {
    pub fn require_write(&self) -> Result<(), ApiError> {
        match self.role {
            AdminRole::Write => Ok(()),
            AdminRole::Read => Err(ApiError::Forbidden),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/opaque/login/start", post(auth::login_start))
        .route("/opaque/login/finish", post(auth::login_finish))
        .route("/logout", post(auth::logout))
        .route("/users", get(users::list))
        .route("/users/{sub}", get(users::get).delete(users::delete))
        .route("/clients", get(clients::list).post(clients::create))
        .route("/clients/{client_id}", get(clients::get).delete(clients::delete))
        .route("/clients/{client_id}/secret", post(clients::rotate_secret))
        .route("/roles", get(rbac::list_roles).post(rbac::create_role))
        .route("/permissions", get(rbac::list_permissions).post(rbac::create_permission))
        .route("/permissions/{key}", axum::routing::delete(rbac::delete_permission))
        .route("/groups", get(rbac::list_groups).post(rbac::create_group))
        .route("/groups/{key}", axum::routing::delete(rbac::delete_group))
        .route("/organizations", get(rbac::list_organizations).post(rbac::create_organization))
        .route("/organizations/{id}/force-otp", put(rbac::set_force_otp))
        .route("/organizations/{id}/members", post(rbac::add_member))
        .route("/settings", get(settings::list).put(settings::set))
        .route("/audit-logs", get(audit_logs::list))
        .route("/jwks", get(jwks::list).post(jwks::rotate))
}
