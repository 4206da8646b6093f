use axum::Json;
use axum::extract::State;
use darkauth_types::{JwksResponse, OidcDiscoveryDocument};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn discovery(State(state): State<AppState>) -> Json<OidcDiscoveryDocument> {
    let issuer = state.config.issuer.clone();
    Json(OidcDiscoveryDocument {
        authorization_endpoint: format!("{issuer}/authorize"),
        token_endpoint: format!("{issuer}/token"),
        jwks_uri: format!("{issuer}/.well-known/jwks.json"),
        issuer,
        grant_types_supported: vec![
            "authorization_code".into(),
            "refresh_token".into(),
            "client_credentials".into(),
        ],
        response_types_supported: vec!["code".into()],
        scopes_supported: vec!["openid".into(), "profile".into(), "email".into()],
        token_endpoint_auth_methods_supported: vec!["none".into(), "client_secret_basic".into()],
        code_challenge_methods_supported: vec!["S256".into()],
        subject_types_supported: vec!["public".into()],
        id_token_signing_alg_values_supported: vec!["EdDSA".into()],
    })
}

pub async fn jwks(State(state): State<AppState>) -> ApiResult<Json<JwksResponse>> {
    Ok(Json(JwksResponse { keys: state.jwks.public_jwks().await }))
}
