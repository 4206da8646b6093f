use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

const STEP_SECONDS: i64 = 30;
const DIGITS: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotpAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl TotpAlgorithm {
    fn label(self) -> &'static str {
        match self {
            TotpAlgorithm::Sha1 => "SHA1",
            TotpAlgorithm::Sha256 => "SHA256",
            TotpAlgorithm::Sha512 => "SHA512",
        }
    }
}

/// 160 random bits, the recommended TOTP secret size (§2 "crypto primitives").
pub fn generate_secret() -> Vec<u8> {
    let mut buf = [0u8; 20];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf.to_vec()
}

pub fn encode_base32(secret: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, secret)
}

pub fn decode_base32(encoded: &str) -> Option<Vec<u8>> {
    base32::decode(base32::Alphabet::Rfc4648 { padding: false }, encoded)
}

pub fn otpauth_uri(issuer: &str, account: &str, secret_b32: &str) -> String {
    let label = format!("{issuer}:{account}");
    format!(
        "otpauth://totp/{}?secret={}&issuer={}&algorithm={}&digits={}&period={}",
        urlencode(&label),
        secret_b32,
        urlencode(issuer),
        TotpAlgorithm::Sha1.label(),
        DIGITS,
        STEP_SECONDS
    )
}

fn urlencode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

pub fn current_step(unix_time: i64) -> i64 {
    unix_time / STEP_SECONDS
}

fn hotp(secret: &[u8], counter: i64, algo: TotpAlgorithm) -> u32 {
    let counter_bytes = counter.to_be_bytes();
    let hash = match algo {
        TotpAlgorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(secret).expect("hmac accepts any key length");
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
        TotpAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("hmac accepts any key length");
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
        TotpAlgorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(secret).expect("hmac accepts any key length");
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
    };
    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    let binary = ((hash[offset] as u32 & 0x7f) << 24)
        | ((hash[offset + 1] as u32) << 16)
        | ((hash[offset + 2] as u32) << 8)
        | (hash[offset + 3] as u32);
    binary % 10u32.pow(DIGITS)
}

pub fn totp_at_step(secret: &[u8], step: i64, algo: TotpAlgorithm) -> String {
    format!("{:0width$}", hotp(secret, step, algo), width = DIGITS as usize)
}

/// Verifies `code` against steps `now-1, now, now+1` (±1 drift, §4.8) and a
/// replay guard requiring the matched step to exceed `last_step`. Returns
/// the matched step on success so the caller can persist it monotonically.
pub fn verify_with_drift(
    secret: &[u8],
    code: &str,
    now_unix: i64,
    last_step: i64,
    algo: TotpAlgorithm,
) -> Option<i64> {
    let now_step = current_step(now_unix);
    for candidate in [now_step - 1, now_step, now_step + 1] {
        if candidate <= last_step {
            continue;
        }
        let expected = totp_at_step(secret, candidate, algo);
        if crate::crypto::hash::constant_time_eq(&expected, code) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc6238_sha1_vector() {
        // RFC 6238 test vector at T=59s, 20-byte ASCII secret "12345678901234567890".
        let secret = b"12345678901234567890";
        let code = totp_at_step(secret, current_step(59), TotpAlgorithm::Sha1);
        assert_eq!(code, "287082");
    }

    #[test]
    fn drift_window_accepts_adjacent_step_only_once() {
        let secret = generate_secret();
        let now = 1_000_000_i64;
        let step = current_step(now);
        let code = totp_at_step(&secret, step, TotpAlgorithm::Sha1);

        assert_eq!(verify_with_drift(&secret, &code, now * STEP_SECONDS, step - 1, TotpAlgorithm::Sha1), Some(step));
        // Replay with the same last_step must fail.
        assert_eq!(verify_with_drift(&secret, &code, now * STEP_SECONDS, step, TotpAlgorithm::Sha1), None);
    }
}
