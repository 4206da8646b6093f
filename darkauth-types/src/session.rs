use serde::{Deserialize, Serialize};

/// Response body for `GET /session` (§6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResponse {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub authenticated: bool,
    pub otp_required: bool,
    pub otp_verified: bool,
    pub password_reset_required: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}
