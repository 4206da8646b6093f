use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use darkauth_types::PublicJwk;
use ed25519_dalek::{
    SigningKey, VerifyingKey,
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey},
};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::rngs::OsRng;
use tokio::sync::RwLock;

use crate::error::{ApiError, ApiResult};

/// One signing key: its EdDSA encoding/decoding halves plus the public JWK
/// view clients will fetch from `/.well-known/jwks.json`.
#[derive(Clone)]
pub struct SigningKeyEntry {
    pub kid: String,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
    pub public_jwk: PublicJwk,
}

impl std::fmt::Debug for SigningKeyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyEntry")
            .field("kid", &self.kid)
            .field("encoding_key", &"[REDACTED]")
            .field("public_jwk", &self.public_jwk)
            .finish()
    }
}

struct KeySet {
    /// Most recently created key; used to sign new tokens.
    current_kid: String,
    keys: HashMap<String, SigningKeyEntry>,
}

/// The JWKS manager (§2.3). Read-mostly: verification reads take a shared
/// lock against the whole key set; rotation takes an exclusive lock and
/// publishes the new set atomically, so a reader never observes a partial
/// rotation (§5 "shared resources").
#[derive(Clone)]
pub struct JwksManager {
    path: PathBuf,
    inner: Arc<RwLock<KeySet>>,
}

impl std::fmt::Debug for JwksManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksManager").field("path", &self.path).finish()
    }
}

impl JwksManager {
    /// Loads the key on disk under `path`, or generates a fresh Ed25519
    /// keypair and persists it if none exists yet.
    pub fn load_or_generate(path: PathBuf) -> ApiResult<Self> {
        fs::create_dir_all(&path)
            .map_err(|e| ApiError::Internal(format!("failed to create key dir: {e}")))?;

        let entry = load_or_generate_entry(&path, "primary")?;
        let mut keys = HashMap::new();
        let kid = entry.kid.clone();
        keys.insert(kid.clone(), entry);

        Ok(Self {
            path,
            inner: Arc::new(RwLock::new(KeySet { current_kid: kid, keys })),
        })
    }

    pub async fn signing_key(&self) -> (String, EncodingKey) {
        let set = self.inner.read().await;
        let current = set.keys.get(&set.current_kid).expect("current key always present");
        (current.kid.clone(), current.encoding_key.clone())
    }

    pub async fn decoding_key(&self, kid: &str) -> Option<DecodingKey> {
        let set = self.inner.read().await;
        set.keys.get(kid).map(|e| e.decoding_key.clone())
    }

    pub async fn public_jwks(&self) -> Vec<PublicJwk> {
        let set = self.inner.read().await;
        set.keys.values().map(|e| e.public_jwk.clone()).collect()
    }

    /// Generates a new Ed25519 key, persists it under a fresh `kid`, and
    /// promotes it to `current`. Old keys remain published for verification
    /// until an operator removes them from disk.
    pub async fn rotate(&self) -> ApiResult<String> {
        let kid = format!("k{}", uuid::Uuid::new_v4().simple());
        let entry = load_or_generate_entry(&self.path, &kid)?;
        let mut set = self.inner.write().await;
        set.keys.insert(kid.clone(), entry);
        set.current_kid = kid.clone();
        Ok(kid)
    }
}

fn load_or_generate_entry(dir: &std::path::Path, kid: &str) -> ApiResult<SigningKeyEntry> {
    let priv_path = dir.join(format!("{kid}_private_ed25519.der"));
    let pub_path = dir.join(format!("{kid}_public_ed25519.der"));

    if priv_path.exists() && pub_path.exists() {
        let priv_bytes = fs::read(&priv_path)
            .map_err(|e| ApiError::Internal(format!("failed to read private key: {e}")))?;
        let pub_bytes = fs::read(&pub_path)
            .map_err(|e| ApiError::Internal(format!("failed to read public key: {e}")))?;

        let signing_key = SigningKey::from_pkcs8_der(&priv_bytes)
            .map_err(|e| ApiError::Internal(format!("invalid private key: {e}")))?;
        let loaded_pub: [u8; 32] = VerifyingKey::from_public_key_der(&pub_bytes)
            .map_err(|e| ApiError::Internal(format!("invalid public key: {e}")))?
            .to_bytes();

        if signing_key.verifying_key().to_bytes() != loaded_pub {
            return Err(ApiError::Internal("public key does not match private key".into()));
        }

        Ok(SigningKeyEntry {
            kid: kid.to_string(),
            encoding_key: EncodingKey::from_ed_der(&priv_bytes),
            decoding_key: DecodingKey::from_ed_der(&loaded_pub),
            public_jwk: PublicJwk::from_ed25519_bytes(&loaded_pub, kid.to_string()),
        })
    } else {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verify_key = signing_key.verifying_key();
        let priv_pkcs8 = signing_key
            .to_pkcs8_der()
            .map_err(|e| ApiError::Internal(format!("failed to encode private key: {e}")))?;
        let pub_spki = verify_key
            .to_public_key_der()
            .map_err(|e| ApiError::Internal(format!("failed to encode public key: {e}")))?;
        let pub_raw = verify_key.to_bytes();

        fs::write(&priv_path, priv_pkcs8.as_bytes())
            .map_err(|e| ApiError::Internal(format!("failed to write private key: {e}")))?;
        fs::write(&pub_path, pub_spki.as_bytes())
            .map_err(|e| ApiError::Internal(format!("failed to write public key: {e}")))?;
        log::info!("generated new ed25519 signing key kid={kid}");

        Ok(SigningKeyEntry {
            kid: kid.to_string(),
            encoding_key: EncodingKey::from_ed_der(priv_pkcs8.as_bytes()),
            decoding_key: DecodingKey::from_ed_der(&pub_raw),
            public_jwk: PublicJwk::from_ed25519_bytes(&pub_raw, kid.to_string()),
        })
    }
}
