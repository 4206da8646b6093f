mod cipher_suite;

pub use cipher_suite::DarkAuthSuite;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use opaque_ke::{
    CredentialFinalization, CredentialRequest, CredentialResponse, RegistrationRequest,
    RegistrationResponse, RegistrationUpload, ServerLogin, ServerLoginStartParameters,
    ServerRegistration, ServerSetup,
};
use rand::rngs::OsRng;

use crate::crypto::{self, hash::sha256};
use crate::error::{ApiError, ApiResult};

const REGISTRATION_SESSION_TTL: Duration = Duration::from_secs(120);
const LOGIN_SESSION_TTL: Duration = Duration::from_secs(120);

struct RegistrationSession {
    email: String,
    created_at: Instant,
}

struct LoginSession {
    email: String,
    state: ServerLogin<DarkAuthSuite>,
    created_at: Instant,
}

/// The wrapper layer named in §9: the only place in the core allowed to
/// hold `sessionId → transcript` state for the OPAQUE handshake. `opaque-ke`
/// itself is treated as an opaque dependency — no primitive crypto lives
/// here beyond message (de)serialization.
pub struct PakeEngine {
    server_setup: ServerSetup<DarkAuthSuite>,
    registrations: DashMap<String, RegistrationSession>,
    logins: DashMap<String, LoginSession>,
}

impl std::fmt::Debug for PakeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PakeEngine")
            .field("registrations", &self.registrations.len())
            .field("logins", &self.logins.len())
            .finish()
    }
}

pub struct RegisterStartResult {
    pub session_id: String,
    pub message: Vec<u8>,
    pub server_public_key: Vec<u8>,
}

pub struct RegisterFinishResult {
    pub email: String,
    pub envelope: Vec<u8>,
    pub server_public_key: Vec<u8>,
}

pub struct LoginStartResult {
    pub session_id: String,
    pub message: Vec<u8>,
}

pub struct LoginFinishResult {
    pub email: String,
    pub export_key_hash: [u8; 32],
}

impl PakeEngine {
    /// Loads the server's long-term OPAQUE setup (the keys that bind every
    /// user's envelope to this deployment) from `path`, generating one on
    /// first run. Unlike per-session state this must survive restarts or
    /// every stored envelope becomes unverifiable.
    pub fn load_or_generate(path: PathBuf) -> ApiResult<Self> {
        fs::create_dir_all(&path)
            .map_err(|e| ApiError::Internal(format!("failed to create pake dir: {e}")))?;
        let setup_path = path.join("opaque_server_setup.bin");

        let server_setup = if setup_path.exists() {
            let bytes = fs::read(&setup_path)
                .map_err(|e| ApiError::Internal(format!("failed to read server setup: {e}")))?;
            ServerSetup::<DarkAuthSuite>::deserialize(&bytes)
                .map_err(|e| ApiError::Internal(format!("invalid server setup on disk: {e}")))?
        } else {
            let setup = ServerSetup::<DarkAuthSuite>::new(&mut OsRng);
            fs::write(&setup_path, setup.serialize())
                .map_err(|e| ApiError::Internal(format!("failed to write server setup: {e}")))?;
            log::info!("generated new OPAQUE server setup");
            setup
        };

        Ok(Self {
            server_setup,
            registrations: DashMap::new(),
            logins: DashMap::new(),
        })
    }

    pub fn register_start(&self, email: &str, message: &[u8]) -> ApiResult<RegisterStartResult> {
        let request = RegistrationRequest::<DarkAuthSuite>::deserialize(message)
            .map_err(|_| ApiError::InvalidRequest("malformed registration message".into()))?;
        let response = ServerRegistration::<DarkAuthSuite>::start(
            &self.server_setup,
            request,
            email.as_bytes(),
        )
        .map_err(|_| ApiError::InvalidRequest("registration start failed".into()))?;

        let session_id = crypto::b64::random_token(16);
        self.registrations.insert(
            session_id.clone(),
            RegistrationSession { email: email.to_string(), created_at: Instant::now() },
        );

        Ok(RegisterStartResult {
            session_id,
            message: response.message.serialize().to_vec(),
            server_public_key: self.server_setup.keypair().public().serialize().to_vec(),
        })
    }

    /// Single-use: the session is removed on the first `finish` regardless
    /// of outcome, so a retried request with the same `session_id` fails
    /// with `invalid_session` per §4.1.
    pub fn register_finish(
        &self,
        session_id: &str,
        upload: &[u8],
    ) -> ApiResult<RegisterFinishResult> {
        let (_, session) = self
            .registrations
            .remove(session_id)
            .ok_or_else(|| ApiError::InvalidRequest("invalid_session".into()))?;

        if session.created_at.elapsed() > REGISTRATION_SESSION_TTL {
            return Err(ApiError::InvalidRequest("invalid_session".into()));
        }

        let upload = RegistrationUpload::<DarkAuthSuite>::deserialize(upload)
            .map_err(|_| ApiError::InvalidRequest("malformed registration upload".into()))?;
        let record = ServerRegistration::<DarkAuthSuite>::finish(upload);

        Ok(RegisterFinishResult {
            email: session.email,
            envelope: record.serialize().to_vec(),
            server_public_key: self.server_setup.keypair().public().serialize().to_vec(),
        })
    }

    /// `stored_envelope` is `None` when the email is unknown; in that case
    /// the engine still produces a plausible response so login start does
    /// not leak account existence (§4.1 "constant-time ... deterministic
    /// fake envelope").
    pub fn login_start(
        &self,
        email: &str,
        message: &[u8],
        stored_envelope: Option<&[u8]>,
    ) -> ApiResult<LoginStartResult> {
        let request = CredentialRequest::<DarkAuthSuite>::deserialize(message)
            .map_err(|_| ApiError::InvalidRequest("malformed login message".into()))?;

        let password_file = match stored_envelope {
            Some(bytes) => Some(
                ServerRegistration::<DarkAuthSuite>::deserialize(bytes)
                    .map_err(|_| ApiError::Internal("corrupt stored envelope".into()))?,
            ),
            None => None,
        };

        let result = ServerLogin::<DarkAuthSuite>::start(
            &mut OsRng,
            &self.server_setup,
            password_file,
            request,
            email.as_bytes(),
            ServerLoginStartParameters::default(),
        )
        .map_err(|_| ApiError::InvalidRequest("login start failed".into()))?;

        let session_id = crypto::b64::random_token(16);
        self.logins.insert(
            session_id.clone(),
            LoginSession {
                email: email.to_string(),
                state: result.state,
                created_at: Instant::now(),
            },
        );

        Ok(LoginStartResult { session_id, message: result.message.serialize().to_vec() })
    }

    /// The returned `email` is read from server-side session state, never
    /// from the client — this is the identity-binding invariant in §4.1.
    pub fn login_finish(&self, session_id: &str, finish: &[u8]) -> ApiResult<LoginFinishResult> {
        let (_, session) =
            self.logins.remove(session_id).ok_or(ApiError::Unauthorized)?;

        if session.created_at.elapsed() > LOGIN_SESSION_TTL {
            return Err(ApiError::Unauthorized);
        }

        let finalization = CredentialFinalization::<DarkAuthSuite>::deserialize(finish)
            .map_err(|_| ApiError::Unauthorized)?;

        let result = session
            .state
            .finish(finalization)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(LoginFinishResult {
            email: session.email,
            export_key_hash: sha256(&result.session_key),
        })
    }

    /// Evicts registration/login transcripts past their TTL. Called by the
    /// background sweeper (§4.9); correctness never depends on this running
    /// promptly since `finish` also checks the TTL inline.
    pub fn sweep_expired(&self) {
        self.registrations
            .retain(|_, s| s.created_at.elapsed() <= REGISTRATION_SESSION_TTL);
        self.logins.retain(|_, s| s.created_at.elapsed() <= LOGIN_SESSION_TTL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_setup_persists_across_reload() {
        let dir = tempdir();
        let first = PakeEngine::load_or_generate(dir.clone()).unwrap();
        let second = PakeEngine::load_or_generate(dir.clone()).unwrap();
        assert_eq!(
            first.server_setup.keypair().public().serialize(),
            second.server_setup.keypair().public().serialize()
        );
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn register_finish_rejects_unknown_session() {
        let engine = PakeEngine::load_or_generate(tempdir()).unwrap();
        let err = engine.register_finish("nonexistent-session", &[0u8; 32]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn login_finish_rejects_unknown_session() {
        let engine = PakeEngine::load_or_generate(tempdir()).unwrap();
        let err = engine.login_finish("nonexistent-session", &[0u8; 32]).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn sweep_expired_evicts_stale_registration_sessions() {
        let engine = PakeEngine::load_or_generate(tempdir()).unwrap();
        engine.registrations.insert(
            "stale".to_string(),
            RegistrationSession {
                email: "a@example.com".to_string(),
                created_at: Instant::now() - REGISTRATION_SESSION_TTL - Duration::from_secs(1),
            },
        );
        engine.registrations.insert(
            "fresh".to_string(),
            RegistrationSession { email: "b@example.com".to_string(), created_at: Instant::now() },
        );
        engine.sweep_expired();
        assert!(!engine.registrations.contains_key("stale"));
        assert!(engine.registrations.contains_key("fresh"));
    }

    fn tempdir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("darkauth-pake-test-{}", crypto::b64::random_token(8)));
        dir
    }
}
