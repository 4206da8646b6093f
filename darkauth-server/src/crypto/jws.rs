use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ApiError, ApiResult};

pub fn sign<T: Serialize>(claims: &T, kid: &str, key: &EncodingKey) -> ApiResult<String> {
    let mut header = Header::new(Algorithm::EdDSA);
    header.kid = Some(kid.to_string());
    encode(&header, claims, key).map_err(|e| ApiError::Internal(format!("jws signing failed: {e}")))
}

/// Decodes and verifies a token signed by [`sign`], without enforcing `aud`
/// or `exp` beyond what `jsonwebtoken` checks by default (expiry). Callers
/// compare `aud`/`nonce` themselves against the expected values.
pub fn verify<T: DeserializeOwned>(token: &str, key: &DecodingKey) -> ApiResult<T> {
    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.validate_aud = false;
    decode::<T>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::Unauthorized)
}

pub fn peek_kid(token: &str) -> Option<String> {
    jsonwebtoken::decode_header(token).ok().and_then(|h| h.kid)
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::SigningKey;
    use ed25519_dalek::pkcs8::EncodePrivateKey;
    use rand::rngs::OsRng;
    use serde::Deserialize;

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    fn test_keypair() -> (EncodingKey, DecodingKey) {
        let signing_key = SigningKey::generate(&mut OsRng);
        let priv_der = signing_key.to_pkcs8_der().unwrap();
        let pub_bytes = signing_key.verifying_key().to_bytes();
        (EncodingKey::from_ed_der(priv_der.as_bytes()), DecodingKey::from_ed_der(&pub_bytes))
    }

    #[test]
    fn sign_then_verify_roundtrip() {
        let (encoding_key, decoding_key) = test_keypair();
        let claims = Claims { sub: "usr_abc".into(), exp: i64::MAX };
        let token = sign(&claims, "kid1", &encoding_key).unwrap();

        assert_eq!(peek_kid(&token).as_deref(), Some("kid1"));
        let decoded: Claims = verify(&token, &decoding_key).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let (encoding_key, _) = test_keypair();
        let (_, other_decoding_key) = test_keypair();
        let claims = Claims { sub: "usr_abc".into(), exp: i64::MAX };
        let token = sign(&claims, "kid1", &encoding_key).unwrap();

        assert!(verify::<Claims>(&token, &other_decoding_key).is_err());
    }
}
