use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The error taxonomy of spec §7, one variant per behavior (not per failure
/// site). `IntoResponse` below is the single place that maps a kind to an
/// HTTP status and body shape.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    InvalidGrant(String),

    #[error("{0}")]
    InvalidScope(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    UnauthorizedClient(String),

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("locked")]
    Locked(OffsetDateTime),

    #[error("rate limited")]
    RateLimited(u64),

    #[error("install token expired")]
    InstallTokenExpired,

    #[error("install token forbidden")]
    InstallTokenForbidden,

    #[error("already initialized")]
    AlreadyInitialized,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("serialization error: {e}"))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ApiError::Internal(format!("database connection error: {e}"))
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict,
                _ => ApiError::Internal(format!("database error: {}", db_err.message())),
            },
            sqlx::Error::RowNotFound => ApiError::NotFound,
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_description: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "VALIDATION_ERROR", "issues": [msg] })),
            )
                .into_response(),
            ApiError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody { error: "invalid_request".into(), error_description: Some(msg) }),
            )
                .into_response(),
            ApiError::InvalidGrant(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody { error: "invalid_grant".into(), error_description: Some(msg) }),
            )
                .into_response(),
            ApiError::InvalidScope(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody { error: "invalid_scope".into(), error_description: Some(msg) }),
            )
                .into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody { error: "unauthorized".into(), error_description: None }),
            )
                .into_response(),
            ApiError::UnauthorizedClient(msg) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    error: "unauthorized_client".into(),
                    error_description: Some(msg),
                }),
            )
                .into_response(),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(ErrorBody { error: "forbidden".into(), error_description: None }),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody { error: "not_found".into(), error_description: None }),
            )
                .into_response(),
            ApiError::Conflict => (
                StatusCode::CONFLICT,
                Json(ErrorBody { error: "conflict".into(), error_description: None }),
            )
                .into_response(),
            ApiError::Locked(locked_until) => (
                StatusCode::from_u16(423).unwrap(),
                Json(json!({ "error": "locked", "lockedUntil": locked_until })),
            )
                .into_response(),
            ApiError::RateLimited(retry_after_seconds) => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "error": "rate_limited", "retryAfterSeconds": retry_after_seconds })),
                )
                    .into_response();
                if let Ok(value) = retry_after_seconds.to_string().parse() {
                    response.headers_mut().insert("Retry-After", value);
                }
                response
            }
            ApiError::InstallTokenExpired => (
                StatusCode::FORBIDDEN,
                Json(ErrorBody { error: "install_token_expired".into(), error_description: None }),
            )
                .into_response(),
            ApiError::InstallTokenForbidden => (
                StatusCode::FORBIDDEN,
                Json(ErrorBody { error: "install_token_forbidden".into(), error_description: None }),
            )
                .into_response(),
            ApiError::AlreadyInitialized => (
                StatusCode::CONFLICT,
                Json(ErrorBody { error: "already_initialized".into(), error_description: None }),
            )
                .into_response(),
            ApiError::Internal(msg) => {
                log::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody { error: "internal".into(), error_description: None }),
                )
                    .into_response()
            }
        }
    }
}
