pub mod admin;
pub mod authorize;
pub mod crypto_drk;
pub mod finalize;
pub mod install;
pub mod opaque;
pub mod otp;
pub mod session;
pub mod token;
pub mod well_known;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// The user realm: `/api/*` plus the unprefixed OIDC routes (§6).
pub fn user_router(state: AppState) -> Router {
    Router::new()
        .route("/.well-known/openid-configuration", get(well_known::discovery))
        .route("/.well-known/jwks.json", get(well_known::jwks))
        .route("/authorize", get(authorize::authorize))
        .route("/authorize/finalize", post(finalize::finalize))
        .route("/token", post(token::token))
        .route("/opaque/register/start", post(opaque::register_start))
        .route("/opaque/register/finish", post(opaque::register_finish))
        .route("/opaque/login/start", post(opaque::login_start))
        .route("/opaque/login/finish", post(opaque::login_finish))
        .route("/session", get(session::get_session))
        .route("/logout", post(session::logout))
        .route("/otp/setup/init", post(otp::setup_init))
        .route("/otp/setup/verify", post(otp::setup_verify))
        .route("/otp/verify", post(otp::verify))
        .route(
            "/crypto/wrapped-drk",
            get(crypto_drk::get_wrapped_drk).put(crypto_drk::put_wrapped_drk),
        )
        .route("/install/opaque/start", post(install::opaque_start))
        .route("/install/opaque/finish", post(install::opaque_finish))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The admin realm: `/admin/*`, on a distinct port (§6).
pub fn admin_router(state: AppState) -> Router {
    Router::new().nest("/admin", admin::router()).layer(CorsLayer::permissive()).with_state(state)
}
