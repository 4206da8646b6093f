use sqlx::PgPool;

pub async fn get(pool: &PgPool, key: &str) -> sqlx::Result<Option<serde_json::Value>> {
    sqlx::query_scalar!(r#"SELECT value FROM settings WHERE key = $1"#, key)
        .fetch_optional(pool)
        .await
}

pub async fn set(pool: &PgPool, key: &str, value: &serde_json::Value) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO settings (key, value) VALUES ($1, $2)
           ON CONFLICT (key) DO UPDATE SET value = $2"#,
        key,
        value
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &PgPool) -> sqlx::Result<Vec<(String, serde_json::Value)>> {
    let rows = sqlx::query!(r#"SELECT key, value FROM settings ORDER BY key"#)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| (r.key, r.value)).collect())
}
