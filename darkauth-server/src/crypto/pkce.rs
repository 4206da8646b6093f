use super::hash::sha256;

/// Verifies RFC 7636 `S256`: `code_challenge == BASE64URL(SHA256(code_verifier))`.
pub fn verify_s256(code_verifier: &str, code_challenge: &str) -> bool {
    let digest = sha256(code_verifier.as_bytes());
    super::b64::encode(&digest) == code_challenge
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc7636_appendix_b_vector() {
        // RFC 7636 Appendix B's worked example verifier/challenge pair.
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let challenge = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";
        assert!(verify_s256(verifier, challenge));
    }

    #[test]
    fn mismatched_verifier_fails() {
        assert!(!verify_s256("some-verifier", "not-the-matching-challenge"));
    }
}
