use darkauth_types::{Admin, AdminRole};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn find_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<Admin>> {
    sqlx::query_as!(
        Admin,
        r#"SELECT id, email, name, role as "role: AdminRole", password_reset_required, created_at
           FROM admins WHERE email = $1"#,
        email
    )
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Admin>> {
    sqlx::query_as!(
        Admin,
        r#"SELECT id, email, name, role as "role: AdminRole", password_reset_required, created_at
           FROM admins WHERE id = $1"#,
        id
    )
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &PgPool, email: &str, name: Option<&str>, role: AdminRole) -> sqlx::Result<Admin> {
    sqlx::query_as!(
        Admin,
        r#"INSERT INTO admins (email, name, role) VALUES ($1, $2, $3)
           RETURNING id, email, name, role as "role: AdminRole", password_reset_required, created_at"#,
        email,
        name,
        role as AdminRole
    )
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<Admin>> {
    sqlx::query_as!(
        Admin,
        r#"SELECT id, email, name, role as "role: AdminRole", password_reset_required, created_at
           FROM admins ORDER BY created_at DESC LIMIT $1 OFFSET $2"#,
        limit,
        offset
    )
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar!(r#"SELECT count(*) as "count!" FROM admins"#)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM admins WHERE id = $1"#, id).execute(pool).await?;
    Ok(result.rows_affected())
}
