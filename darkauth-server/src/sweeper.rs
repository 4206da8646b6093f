use std::time::Duration;

use sqlx::PgPool;

use crate::pake::PakeEngine;
use crate::queries;

const SWEEP_INTERVAL_SECONDS: u64 = 60;
const AUTH_CODE_GRACE_SECONDS: i64 = 5;

/// Background sweeper (§4.9): runs every 60 s, deletes records past
/// `expiresAt`. Idempotent — a sweep that finds nothing to delete is a
/// no-op, and running it twice in a row (or concurrently with the per-use
/// CAS in `auth_code`/`session_store`) never double-deletes or races a
/// redemption in flight.
pub fn spawn(pool: PgPool, pake: std::sync::Arc<PakeEngine>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECONDS));
        loop {
            ticker.tick().await;
            sweep_once(&pool, &pake).await;
        }
    });
}

async fn sweep_once(pool: &PgPool, pake: &PakeEngine) {
    pake.sweep_expired();

    match queries::pending_auths::sweep_expired(pool).await {
        Ok(n) if n > 0 => log::debug!("swept {n} expired pending authorizations"),
        Ok(_) => {}
        Err(e) => log::error!("sweeper: pending auth sweep failed: {e}"),
    }

    match queries::auth_codes::sweep_expired(pool, AUTH_CODE_GRACE_SECONDS).await {
        Ok(n) if n > 0 => log::debug!("swept {n} expired/consumed authorization codes"),
        Ok(_) => {}
        Err(e) => log::error!("sweeper: auth code sweep failed: {e}"),
    }

    match queries::refresh_tokens::sweep_expired(pool).await {
        Ok(n) if n > 0 => log::debug!("swept {n} expired/consumed refresh tokens"),
        Ok(_) => {}
        Err(e) => log::error!("sweeper: refresh token sweep failed: {e}"),
    }

    match queries::sessions::sweep_expired(pool).await {
        Ok(n) if n > 0 => log::debug!("swept {n} expired sessions"),
        Ok(_) => {}
        Err(e) => log::error!("sweeper: session sweep failed: {e}"),
    }
}
