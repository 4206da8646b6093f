use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

pub fn sha256_b64(data: &[u8]) -> String {
    super::b64::encode(&sha256(data))
}

/// Constant-time string comparison for secrets (client secret, refresh
/// token, install token, CSRF token, OTP code) per §9. Never short-circuits
/// on length: unequal lengths still run a full comparison against a padded
/// buffer so timing does not leak the true length either.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let len = a.len().max(b.len());
    let mut pa = vec![0u8; len];
    let mut pb = vec![0u8; len];
    pa[..a.len()].copy_from_slice(a);
    pb[..b.len()].copy_from_slice(b);
    let lens_eq = a.len() == b.len();
    let bytes_eq: bool = pa.ct_eq(&pb).into();
    lens_eq & bytes_eq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_match() {
        assert!(constant_time_eq("same-secret", "same-secret"));
    }

    #[test]
    fn different_strings_of_equal_length_do_not_match() {
        assert!(!constant_time_eq("abcdef", "abcdeg"));
    }

    #[test]
    fn different_lengths_do_not_match() {
        assert!(!constant_time_eq("short", "much-longer-string"));
        assert!(!constant_time_eq("much-longer-string", "short"));
    }

    #[test]
    fn empty_strings_match() {
        assert!(constant_time_eq("", ""));
    }
}
