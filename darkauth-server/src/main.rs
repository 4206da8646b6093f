use std::sync::Arc;

use sqlx::migrate::Migrator;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::kek::Kek;
use crate::key_manager::JwksManager;
use crate::pake::PakeEngine;
use crate::state::AppState;

mod api;
mod audit;
mod auth_code;
mod auth_session;
mod config;
mod cookies;
mod crypto;
mod db;
mod error;
mod kek;
mod key_manager;
mod otp;
mod pake;
mod pending_auth;
mod queries;
mod rbac;
mod session_store;
mod state;
mod sweeper;
mod zk;

// Embed all sql migrations in binary
static MIGRATOR: Migrator = sqlx::migrate!();

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logger - reads RUST_LOG environment variable
    // Examples: RUST_LOG=info, RUST_LOG=debug, RUST_LOG=darkauth_server=debug
    // Defaults to info level if RUST_LOG is not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    let db = db::get_pool(&config).await?;

    MIGRATOR.run(&db).await?;
    log::info!("Migrations are up to date.");

    let kek = Kek::derive(&config.kek_passphrase)?;
    let jwks = JwksManager::load_or_generate(config.key_dir.join("jwks"))?;
    let pake = Arc::new(PakeEngine::load_or_generate(config.key_dir.join("pake"))?);

    if let Some(token) = &config.install_token {
        queries::install::seed(&db, token).await?;
    }

    let user_port = config.user_port;
    let admin_port = config.admin_port;

    let app_state = AppState { config: Arc::new(config), db, jwks, kek, pake: pake.clone() };

    sweeper::spawn(app_state.db.clone(), pake);

    let user_app = api::user_router(app_state.clone());
    let admin_app = api::admin_router(app_state);

    let user_listener = TcpListener::bind(format!("0.0.0.0:{user_port}")).await?;
    let admin_listener = TcpListener::bind(format!("0.0.0.0:{admin_port}")).await?;

    log::info!("Starting user realm on 0.0.0.0:{user_port}");
    log::info!("Starting admin realm on 0.0.0.0:{admin_port}");

    let user_server = axum::serve(user_listener, user_app);
    let admin_server = axum::serve(admin_listener, admin_app);

    tokio::try_join!(user_server, admin_server)?;
    Ok(())
}
