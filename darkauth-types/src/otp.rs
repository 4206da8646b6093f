use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpSetupInitResponse {
    pub secret_base32: String,
    pub otpauth_uri: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpCodeRequest {
    pub code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpVerifyResponse {
    pub verified: bool,
}

impl std::fmt::Debug for OtpCodeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpCodeRequest").field("code", &"[REDACTED]").finish()
    }
}
