use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use base64::Engine;
use darkauth_types::AuthorizeQuery;
use serde_json::Value;

use crate::error::ApiError;
use crate::pending_auth;
use crate::queries;
use crate::state::AppState;

/// `GET /authorize` (§4.3). Validation failures before a `redirect_uri` is
/// confirmed render an error page rather than redirecting (steps 1-2);
/// failures after that redirect back to the client with an OAuth error.
pub async fn authorize(State(state): State<AppState>, Query(q): Query<AuthorizeQuery>) -> Response {
    match run(&state, q).await {
        Ok(redirect) => redirect.into_response(),
        Err(AuthorizeFailure::ErrorPage(msg)) => {
            (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
        }
        Err(AuthorizeFailure::Redirect { redirect_uri, error, state: st }) => {
            let mut url = format!("{redirect_uri}?error={error}");
            if let Some(s) = st {
                url.push_str(&format!("&state={s}"));
            }
            Redirect::to(&url).into_response()
        }
        Err(AuthorizeFailure::Api(e)) => e.into_response(),
    }
}

enum AuthorizeFailure {
    ErrorPage(String),
    Redirect { redirect_uri: String, error: &'static str, state: Option<String> },
    Api(ApiError),
}

impl From<ApiError> for AuthorizeFailure {
    fn from(e: ApiError) -> Self {
        AuthorizeFailure::Api(e)
    }
}

async fn run(state: &AppState, q: AuthorizeQuery) -> Result<Redirect, AuthorizeFailure> {
    // Step 1: client must exist.
    let client = queries::clients::find(&state.db, &q.client_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| AuthorizeFailure::ErrorPage("unknown client".into()))?;

    // Step 2: redirect_uri must exactly match a registered URI.
    if !client.redirect_uris.iter().any(|u| u == &q.redirect_uri) {
        return Err(AuthorizeFailure::ErrorPage("redirect_uri is not registered for this client".into()));
    }

    // Step 3: response_type.
    if q.response_type != "code" {
        return Err(AuthorizeFailure::Redirect {
            redirect_uri: q.redirect_uri,
            error: "unsupported_response_type",
            state: q.state,
        });
    }

    if !q.scope.split_whitespace().any(|s| s == "openid") {
        return Err(AuthorizeFailure::Redirect {
            redirect_uri: q.redirect_uri,
            error: "invalid_scope",
            state: q.state,
        });
    }

    // Step 4: PKCE required for public clients or requirePkce=true clients.
    let pkce_required = !client.is_confidential() || client.requires_pkce();
    if pkce_required {
        match (&q.code_challenge, q.code_challenge_method.as_deref()) {
            (Some(_), Some("S256")) => {}
            (None, _) => {
                return Err(ApiError::InvalidRequest("PKCE code_challenge is required".into()).into());
            }
            _ => {
                return Err(ApiError::InvalidRequest("unsupported code_challenge_method".into()).into());
            }
        }
    }

    // Step 5: zk_pub, if present, must decode to a JSON JWK of type EC P-256.
    let (zk_pub_kid, zk_pub_jwk) = match &q.zk_pub {
        None => (None, None),
        Some(raw) => {
            let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
                .decode(raw)
                .map_err(|_| ApiError::Validation("zk_pub is not valid base64url".into()))?;
            let jwk: Value = serde_json::from_slice(&bytes)
                .map_err(|_| ApiError::Validation("zk_pub is not a JSON object".into()))?;
            if jwk.get("kty").and_then(Value::as_str) != Some("EC")
                || jwk.get("crv").and_then(Value::as_str) != Some("P-256")
            {
                return Err(ApiError::Validation("zk_pub must be an EC P-256 JWK".into()).into());
            }
            let kid = match jwk.get("kid").and_then(Value::as_str) {
                Some(kid) => kid.to_string(),
                None => crate::crypto::hash::sha256_b64(&bytes),
            };
            (Some(kid), Some(String::from_utf8_lossy(&bytes).to_string()))
        }
    };

    let request_id = pending_auth::create(
        &state.db,
        &client.client_id,
        &q.redirect_uri,
        q.state.as_deref(),
        q.nonce.as_deref(),
        q.code_challenge.as_deref(),
        q.code_challenge_method.as_deref(),
        zk_pub_kid.as_deref(),
        zk_pub_jwk.as_deref(),
        &state.config.consent_ui_origin,
    )
    .await?;

    Ok(Redirect::to(&format!("{}?request_id={request_id}", state.config.consent_ui_origin)))
}
