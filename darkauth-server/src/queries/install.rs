use sqlx::PgPool;
use time::OffsetDateTime;

pub struct InstallState {
    pub token: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: OffsetDateTime,
    pub consumed_at: Option<OffsetDateTime>,
}

/// Seeds the singleton install row if absent. Safe to call on every
/// startup: an existing row (consumed or not) is left untouched.
pub async fn seed(pool: &PgPool, token: &str) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO install_state (id, token) VALUES (true, $1) ON CONFLICT (id) DO NOTHING"#,
        token
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &PgPool) -> sqlx::Result<Option<InstallState>> {
    sqlx::query_as!(
        InstallState,
        r#"SELECT token, email, name, created_at, consumed_at FROM install_state WHERE id = true"#
    )
    .fetch_optional(pool)
    .await
}

pub async fn set_identity(pool: &PgPool, email: &str, name: Option<&str>) -> sqlx::Result<()> {
    sqlx::query!(
        r#"UPDATE install_state SET email = $1, name = $2 WHERE id = true"#,
        email,
        name
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Atomically clears the token by marking it consumed — a second finish
/// with the same token sees `consumed_at IS NOT NULL` and fails (§4.10
/// step 4).
pub async fn consume(pool: &PgPool) -> sqlx::Result<bool> {
    let result = sqlx::query!(
        r#"UPDATE install_state SET consumed_at = now() WHERE id = true AND consumed_at IS NULL"#
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}
