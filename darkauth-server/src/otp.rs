use sqlx::PgPool;
use time::OffsetDateTime;

use crate::crypto::totp::{self, TotpAlgorithm};
use crate::error::{ApiError, ApiResult};
use crate::kek::Kek;
use crate::queries;

pub struct SetupInit {
    pub secret_base32: String,
    pub otpauth_uri: String,
}

pub async fn setup_init(pool: &PgPool, kek: &Kek, actor_ref: &str, issuer: &str) -> ApiResult<SetupInit> {
    let secret = totp::generate_secret();
    let wrapped = kek.wrap(&secret)?;
    queries::otp::upsert_pending(pool, actor_ref, &wrapped).await?;

    let secret_base32 = totp::encode_base32(&secret);
    Ok(SetupInit {
        otpauth_uri: totp::otpauth_uri(issuer, actor_ref, &secret_base32),
        secret_base32,
    })
}

/// `setup/verify` (§4.8): accepts the current code with ±1 drift and, on
/// success, flips the credential from pending to `enabled && verified`.
pub async fn setup_verify(pool: &PgPool, kek: &Kek, actor_ref: &str, code: &str) -> ApiResult<bool> {
    let credential = queries::otp::find(pool, actor_ref)
        .await?
        .ok_or_else(|| ApiError::NotFound)?;
    let secret = kek.unwrap(&credential.secret_enc)?;

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let Some(step) = totp::verify_with_drift(&secret, code, now, credential.last_step, TotpAlgorithm::Sha1)
    else {
        return Ok(false);
    };

    queries::otp::mark_enabled(pool, actor_ref, step).await?;
    Ok(true)
}

pub enum VerifyOutcome {
    Verified,
    Invalid,
    Locked(OffsetDateTime),
}

/// `verify` (§4.8): checks drift + replay guard, then updates the failure
/// counter / lockout on failure, or resets it and advances `last_step` on
/// success.
pub async fn verify(pool: &PgPool, kek: &Kek, actor_ref: &str, code: &str) -> ApiResult<VerifyOutcome> {
    let credential = queries::otp::find(pool, actor_ref)
        .await?
        .ok_or_else(|| ApiError::NotFound)?;

    if let Some(locked_until) = credential.locked_until {
        if locked_until > OffsetDateTime::now_utc() {
            return Ok(VerifyOutcome::Locked(locked_until));
        }
    }

    let secret = kek.unwrap(&credential.secret_enc)?;
    let now = OffsetDateTime::now_utc().unix_timestamp();

    match totp::verify_with_drift(&secret, code, now, credential.last_step, TotpAlgorithm::Sha1) {
        Some(step) => {
            queries::otp::record_success(pool, actor_ref, step).await?;
            Ok(VerifyOutcome::Verified)
        }
        None => {
            let updated = queries::otp::record_failure(pool, actor_ref).await?;
            match updated.and_then(|c| c.locked_until) {
                Some(locked_until) if locked_until > OffsetDateTime::now_utc() => {
                    Ok(VerifyOutcome::Locked(locked_until))
                }
                _ => Ok(VerifyOutcome::Invalid),
            }
        }
    }
}

pub async fn disable(pool: &PgPool, actor_ref: &str) -> ApiResult<()> {
    queries::otp::disable(pool, actor_ref).await?;
    Ok(())
}

pub async fn unlock(pool: &PgPool, actor_ref: &str) -> ApiResult<()> {
    queries::otp::unlock(pool, actor_ref).await?;
    Ok(())
}
