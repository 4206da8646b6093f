use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::ServerConfig;

pub type DbPool = PgPool;

pub async fn get_pool(config: &ServerConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(&config.postgres_uri)
        .await
}
