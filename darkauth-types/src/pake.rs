use serde::{Deserialize, Serialize};

/// Every PAKE message on the wire is an opaque base64url blob produced by
/// the `opaque-ke` protocol state machine (§4.1, §9 "PAKE library"). The
/// core never parses these beyond passing them to the wrapper.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterStartRequest {
    pub email: String,
    pub message: String,
}

impl std::fmt::Debug for RegisterStartRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterStartRequest")
            .field("email", &self.email)
            .field("message", &"[OPAQUE]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterStartResponse {
    pub session_id: String,
    pub message: String,
    pub server_public_key: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterFinishRequest {
    pub session_id: String,
    pub message: String,
}

impl std::fmt::Debug for RegisterFinishRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterFinishRequest")
            .field("session_id", &self.session_id)
            .field("message", &"[OPAQUE]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterFinishResponse {
    pub registered: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginStartRequest {
    pub email: String,
    pub message: String,
}

impl std::fmt::Debug for LoginStartRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginStartRequest")
            .field("email", &self.email)
            .field("message", &"[OPAQUE]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginStartResponse {
    pub session_id: String,
    pub message: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginFinishRequest {
    pub session_id: String,
    pub message: String,
}

impl std::fmt::Debug for LoginFinishRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginFinishRequest")
            .field("session_id", &self.session_id)
            .field("message", &"[OPAQUE]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginFinishResponse {
    pub authenticated: bool,
    pub otp_required: bool,
    pub password_reset_required: bool,
}
