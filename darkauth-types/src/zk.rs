use serde::{Deserialize, Serialize};

/// Wire shape for `/crypto/wrapped-drk` (§4.6, §6). The blob is opaque to
/// the server — base64url of whatever ciphertext the browser produced.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrappedDrk {
    pub wrapped_drk: String,
}

impl std::fmt::Debug for WrappedDrk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedDrk").field("wrapped_drk", &"[REDACTED]").finish()
    }
}
