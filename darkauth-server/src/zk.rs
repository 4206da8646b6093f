use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::queries;

pub async fn get(pool: &PgPool, user_sub: &str) -> ApiResult<Vec<u8>> {
    queries::zk::get_wrapped_drk(pool, user_sub)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn put(pool: &PgPool, user_sub: &str, blob: &[u8]) -> ApiResult<()> {
    Ok(queries::zk::put_wrapped_drk(pool, user_sub, blob).await?)
}
