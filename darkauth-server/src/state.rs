use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::kek::Kek;
use crate::key_manager::JwksManager;
use crate::pake::PakeEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub db: PgPool,
    pub jwks: JwksManager,
    pub kek: Kek,
    pub pake: Arc<PakeEngine>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("jwks", &self.jwks)
            .field("pake", &self.pake)
            .finish()
    }
}
