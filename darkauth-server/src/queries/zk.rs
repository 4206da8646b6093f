use sqlx::PgPool;

pub async fn get_wrapped_drk(pool: &PgPool, user_sub: &str) -> sqlx::Result<Option<Vec<u8>>> {
    sqlx::query_scalar!(r#"SELECT blob FROM wrapped_drks WHERE user_sub = $1"#, user_sub)
        .fetch_optional(pool)
        .await
}

/// Per-user singleton (§4.6, §9 open question): a re-upload replaces the
/// previous blob rather than appending a new record.
pub async fn put_wrapped_drk(pool: &PgPool, user_sub: &str, blob: &[u8]) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO wrapped_drks (user_sub, blob) VALUES ($1, $2)
           ON CONFLICT (user_sub) DO UPDATE SET blob = $2, updated_at = now()"#,
        user_sub,
        blob
    )
    .execute(pool)
    .await?;
    Ok(())
}
