use serde::{Deserialize, Serialize};

/// `POST /install/opaque/start` (§4.10). The bootstrap token is
/// operator-injected; this is the only registration path that runs before
/// any admin exists.
#[derive(Clone, Serialize, Deserialize)]
pub struct InstallOpaqueStartRequest {
    pub token: String,
    pub email: String,
    pub name: Option<String>,
    pub message: String,
}

impl std::fmt::Debug for InstallOpaqueStartRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallOpaqueStartRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("token", &"[REDACTED]")
            .field("message", &"[OPAQUE]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstallOpaqueStartResponse {
    pub session_id: String,
    pub message: String,
    pub server_public_key: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct InstallOpaqueFinishRequest {
    pub token: String,
    pub email: String,
    pub name: Option<String>,
    pub session_id: String,
    pub message: String,
}

impl std::fmt::Debug for InstallOpaqueFinishRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallOpaqueFinishRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("session_id", &self.session_id)
            .field("token", &"[REDACTED]")
            .field("message", &"[OPAQUE]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstallOpaqueFinishResponse {
    pub installed: bool,
    pub admin_id: uuid::Uuid,
}
