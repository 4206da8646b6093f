use darkauth_types::User;
use sqlx::PgPool;

pub async fn find_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as!(
        User,
        r#"SELECT sub, email, name, password_reset_required, created_at FROM users WHERE email = $1"#,
        email
    )
    .fetch_optional(pool)
    .await
}

pub async fn find_by_sub(pool: &PgPool, sub: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as!(
        User,
        r#"SELECT sub, email, name, password_reset_required, created_at FROM users WHERE sub = $1"#,
        sub
    )
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &PgPool, sub: &str, email: &str, name: Option<&str>) -> sqlx::Result<User> {
    sqlx::query_as!(
        User,
        r#"INSERT INTO users (sub, email, name) VALUES ($1, $2, $3)
           RETURNING sub, email, name, password_reset_required, created_at"#,
        sub,
        email,
        name
    )
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<User>> {
    sqlx::query_as!(
        User,
        r#"SELECT sub, email, name, password_reset_required, created_at FROM users
           ORDER BY created_at DESC LIMIT $1 OFFSET $2"#,
        limit,
        offset
    )
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar!(r#"SELECT count(*) as "count!" FROM users"#)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, sub: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM users WHERE sub = $1"#, sub)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
