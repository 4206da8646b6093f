use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use base64::Engine;
use darkauth_types::{
    Client, ClientAccessClaims, ClientCredentialsResponse, IdTokenClaims, TokenEndpointAuthMethod,
    TokenRequest, TokenResponse,
};
use time::OffsetDateTime;

use crate::auth_code;
use crate::crypto::{hash::constant_time_eq, jws};
use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::rbac;
use crate::session_store;
use crate::state::AppState;

/// `POST /token` (§4.5). Dispatches on `grant_type`; each grant returns the
/// same `TokenResponse` shape except `client_credentials`, which has its own
/// response per §4.5.3.
pub async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(req): Form<TokenRequest>,
) -> ApiResult<axum::Json<serde_json::Value>> {
    match req.grant_type.as_str() {
        "authorization_code" => authorization_code(&state, &headers, req).await.map(|r| axum::Json(serde_json::to_value(r).unwrap())),
        "refresh_token" => refresh_token(&state, &headers, req).await.map(|r| axum::Json(serde_json::to_value(r).unwrap())),
        "client_credentials" => client_credentials(&state, &headers, req).await.map(|r| axum::Json(serde_json::to_value(r).unwrap())),
        other => Err(ApiError::InvalidRequest(format!("unsupported grant_type: {other}"))),
    }
}

/// §4.5.1.
async fn authorization_code(state: &AppState, headers: &HeaderMap, req: TokenRequest) -> ApiResult<TokenResponse> {
    let code = req.code.as_deref().ok_or_else(|| ApiError::InvalidRequest("code is required".into()))?;
    let redeemed = auth_code::redeem(&state.db, code).await?;

    let redirect_uri = req
        .redirect_uri
        .as_deref()
        .ok_or_else(|| ApiError::InvalidRequest("redirect_uri is required".into()))?;
    if redirect_uri != redeemed.redirect_uri {
        return Err(ApiError::InvalidGrant(
            "redirect_uri does not match authorization request".into(),
        ));
    }

    let client = queries::clients::find(&state.db, &redeemed.client_id)
        .await?
        .ok_or_else(|| ApiError::UnauthorizedClient("unknown client".into()))?;
    authenticate_client(state, headers, &client, req.client_id.as_deref()).await?;

    verify_pkce(&client, redeemed.code_challenge.as_deref(), req.code_verifier.as_deref())?;

    let user = queries::users::find_by_sub(&state.db, &redeemed.user_sub)
        .await?
        .ok_or_else(|| ApiError::Internal("auth code bound to a deleted user".into()))?;
    let access = rbac::effective_access(&state.db, &user.sub).await?;

    let id_token_ttl = client.id_token_lifetime_seconds.unwrap_or(state.config.id_token_lifetime_seconds);
    let refresh_ttl = client.refresh_token_lifetime_seconds.unwrap_or(state.config.refresh_token_lifetime_seconds);
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let claims = IdTokenClaims {
        iss: state.config.issuer.clone(),
        sub: user.sub.clone(),
        aud: client.client_id.clone(),
        iat: now,
        exp: now + id_token_ttl,
        email: Some(user.email.clone()),
        email_verified: true,
        name: Some(user.name.clone()),
        nonce: redeemed.nonce.clone(),
        permissions: access.permissions,
        groups: access.groups,
    };
    let (kid, signing_key) = state.jwks.signing_key().await;
    let id_token = jws::sign(&claims, &kid, &signing_key)?;

    let otp_required = rbac::otp_required(&state.db, &user.sub, state.config.otp_require_for_users).await?;
    let new_session = session_store::create_session(
        &state.db,
        darkauth_types::ActorKind::User,
        &user.sub,
        Some(&user.email),
        Some(&user.name),
        Some(&client.client_id),
        otp_required,
        refresh_ttl,
    )
    .await?;

    Ok(TokenResponse {
        id_token,
        token_type: "Bearer".into(),
        expires_in: id_token_ttl,
        refresh_token: new_session.refresh_token,
        zk_drk_hash: if redeemed.has_zk { redeemed.drk_hash } else { None },
    })
}

/// §4.5.2. The new ID token's `aud` is pinned to the session's original
/// `client_id`, not the request's — a request `client_id` disagreeing with
/// it is rejected rather than silently honored.
async fn refresh_token(state: &AppState, headers: &HeaderMap, req: TokenRequest) -> ApiResult<TokenResponse> {
    let refresh_token = req
        .refresh_token
        .as_deref()
        .ok_or_else(|| ApiError::InvalidRequest("refresh_token is required".into()))?;

    let refresh_ttl = state.config.refresh_token_lifetime_seconds;
    let rotated = session_store::rotate_refresh(&state.db, refresh_token, refresh_ttl).await?;

    let session_client_id = rotated
        .session
        .client_id
        .clone()
        .ok_or_else(|| ApiError::InvalidGrant("session has no bound client".into()))?;

    let client = queries::clients::find(&state.db, &session_client_id)
        .await?
        .ok_or_else(|| ApiError::UnauthorizedClient("unknown client".into()))?;
    authenticate_client(state, headers, &client, req.client_id.as_deref()).await?;

    if let Some(requested) = &req.client_id {
        if requested != &session_client_id {
            return Err(ApiError::UnauthorizedClient(
                "client_id does not match the original session".into(),
            ));
        }
    }

    let access = rbac::effective_access(&state.db, &rotated.session.actor_ref).await?;
    let id_token_ttl = client.id_token_lifetime_seconds.unwrap_or(state.config.id_token_lifetime_seconds);
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let claims = IdTokenClaims {
        iss: state.config.issuer.clone(),
        sub: rotated.session.actor_ref.clone(),
        aud: session_client_id,
        iat: now,
        exp: now + id_token_ttl,
        email: rotated.session.email.clone(),
        email_verified: rotated.session.email.is_some(),
        name: rotated.session.name.clone(),
        nonce: None,
        permissions: access.permissions,
        groups: access.groups,
    };
    let (kid, signing_key) = state.jwks.signing_key().await;
    let id_token = jws::sign(&claims, &kid, &signing_key)?;

    Ok(TokenResponse {
        id_token,
        token_type: "Bearer".into(),
        expires_in: id_token_ttl,
        refresh_token: rotated.refresh_token,
        zk_drk_hash: None,
    })
}

/// §4.5.3. Confidential clients only, scope must be a subset of the
/// client's registered scopes.
async fn client_credentials(
    state: &AppState,
    headers: &HeaderMap,
    req: TokenRequest,
) -> ApiResult<ClientCredentialsResponse> {
    let client_id = basic_auth_client_id(headers)
        .ok_or_else(|| ApiError::UnauthorizedClient("client_credentials requires Basic auth".into()))?;
    let client = queries::clients::find(&state.db, &client_id)
        .await?
        .ok_or_else(|| ApiError::UnauthorizedClient("unknown client".into()))?;
    authenticate_client(state, headers, &client, None).await?;

    if !client.is_confidential() || !client.grant_types.iter().any(|g| g == "client_credentials") {
        return Err(ApiError::UnauthorizedClient(
            "client is not authorized for the client_credentials grant".into(),
        ));
    }

    let requested: Vec<&str> = req.scope.as_deref().map(|s| s.split_whitespace().collect()).unwrap_or_default();
    if !requested.iter().all(|s| client.scopes.iter().any(|allowed| allowed == s)) {
        return Err(ApiError::InvalidScope("requested scope exceeds client's registered scopes".into()));
    }

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = ClientAccessClaims {
        iss: state.config.issuer.clone(),
        sub: client.client_id.clone(),
        aud: state.config.issuer.clone(),
        iat: now,
        exp: now + state.config.id_token_lifetime_seconds,
        scope: req.scope.clone(),
    };
    let (kid, signing_key) = state.jwks.signing_key().await;
    let access_token = jws::sign(&claims, &kid, &signing_key)?;

    Ok(ClientCredentialsResponse { access_token, token_type: "Bearer".into() })
}

fn verify_pkce(client: &Client, stored_challenge: Option<&str>, verifier: Option<&str>) -> ApiResult<()> {
    match stored_challenge {
        Some(challenge) => {
            let verifier = verifier.ok_or_else(|| {
                ApiError::InvalidRequest("code_verifier is required when PKCE is used".into())
            })?;
            if !crate::crypto::pkce::verify_s256(verifier, challenge) {
                return Err(ApiError::InvalidGrant("code_verifier does not match code_challenge".into()));
            }
            Ok(())
        }
        None => {
            if client.requires_pkce() {
                return Err(ApiError::InvalidGrant("PKCE is required for this client".into()));
            }
            Ok(())
        }
    }
}

/// §4.5.1 step 5 / §4.5.2: `none` requires the body `client_id` to name the
/// expected client; `client_secret_basic` requires `Authorization: Basic`
/// whose decoded secret matches the KEK-unwrapped stored secret.
async fn authenticate_client(
    state: &AppState,
    headers: &HeaderMap,
    client: &Client,
    body_client_id: Option<&str>,
) -> ApiResult<()> {
    match client.token_endpoint_auth_method {
        TokenEndpointAuthMethod::None => {
            if body_client_id == Some(client.client_id.as_str()) {
                Ok(())
            } else {
                Err(ApiError::UnauthorizedClient("client_id does not match".into()))
            }
        }
        TokenEndpointAuthMethod::ClientSecretBasic => {
            let (basic_id, basic_secret) =
                parse_basic_auth(headers).ok_or_else(|| ApiError::UnauthorizedClient("missing Basic auth".into()))?;
            if basic_id != client.client_id {
                return Err(ApiError::UnauthorizedClient("client_id does not match".into()));
            }
            let stored_enc = client
                .client_secret_enc
                .as_deref()
                .ok_or_else(|| ApiError::UnauthorizedClient("client has no secret configured".into()))?;
            let stored_secret = state.kek.unwrap(stored_enc)?;
            let stored_secret = String::from_utf8(stored_secret)
                .map_err(|_| ApiError::Internal("stored client secret is not valid utf-8".into()))?;
            if constant_time_eq(&basic_secret, &stored_secret) {
                Ok(())
            } else {
                Err(ApiError::UnauthorizedClient("client secret mismatch".into()))
            }
        }
    }
}

fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

fn basic_auth_client_id(headers: &HeaderMap) -> Option<String> {
    parse_basic_auth(headers).map(|(id, _)| id)
}
