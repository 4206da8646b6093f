use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use argon2::Argon2;
use rand::RngCore;

use crate::error::{ApiError, ApiResult};

const SALT: &[u8] = b"darkauth-kek-v1";
const NONCE_LEN: usize = 12;

/// Holds one symmetric key derived from the operator-supplied passphrase
/// for the process lifetime (§5 "KEK holds one symmetric key in memory").
/// Access is synchronous and lock-free: `Aes256Gcm` is `Sync` and takes no
/// interior mutability.
#[derive(Clone)]
pub struct Kek {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for Kek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kek").field("cipher", &"[REDACTED]").finish()
    }
}

impl Kek {
    pub fn derive(passphrase: &str) -> ApiResult<Self> {
        let mut key_bytes = [0u8; 32];
        Argon2::default()
            .hash_password_into(passphrase.as_bytes(), SALT, &mut key_bytes)
            .map_err(|e| ApiError::Internal(format!("KEK derivation failed: {e}")))?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Ok(Self { cipher })
    }

    /// Wraps `plaintext` into `nonce || ciphertext`, stored as-is in at-rest
    /// columns (client secrets, OTP secrets, JWK private keys per §9).
    pub fn wrap(&self, plaintext: &[u8]) -> ApiResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| ApiError::Internal("KEK wrap failed".into()))?;
        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    pub fn unwrap(&self, wrapped: &[u8]) -> ApiResult<Vec<u8>> {
        if wrapped.len() < NONCE_LEN {
            return Err(ApiError::Internal("wrapped secret too short".into()));
        }
        let (nonce_bytes, ciphertext) = wrapped.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| ApiError::Internal("KEK unwrap failed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unwrap_roundtrip() {
        let kek = Kek::derive("a passphrase at least 16 chars").unwrap();
        let wrapped = kek.wrap(b"top secret").unwrap();
        assert_ne!(wrapped, b"top secret");
        assert_eq!(kek.unwrap(&wrapped).unwrap(), b"top secret");
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let kek = Kek::derive("a passphrase at least 16 chars").unwrap();
        let mut wrapped = kek.wrap(b"top secret").unwrap();
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xff;
        assert!(kek.unwrap(&wrapped).is_err());
    }
}
