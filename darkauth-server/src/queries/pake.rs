use sqlx::PgPool;

pub struct PakeRecord {
    pub envelope: Vec<u8>,
    pub server_pubkey: Vec<u8>,
}

pub async fn find_user_record(pool: &PgPool, sub: &str) -> sqlx::Result<Option<PakeRecord>> {
    sqlx::query_as!(
        PakeRecord,
        r#"SELECT envelope, server_pubkey FROM pake_user_records WHERE sub = $1"#,
        sub
    )
    .fetch_optional(pool)
    .await
}

/// Replaces any existing record for `sub` (password change rotates the
/// envelope atomically; §3 "rotated atomically on password change").
pub async fn upsert_user_record(
    pool: &PgPool,
    sub: &str,
    envelope: &[u8],
    server_pubkey: &[u8],
) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO pake_user_records (sub, envelope, server_pubkey)
           VALUES ($1, $2, $3)
           ON CONFLICT (sub) DO UPDATE SET envelope = $2, server_pubkey = $3, created_at = now()"#,
        sub,
        envelope,
        server_pubkey
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn record_password_history(pool: &PgPool, sub: &str, export_key_hash: &str) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO pake_password_history (sub, export_key_hash) VALUES ($1, $2)"#,
        sub,
        export_key_hash
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn password_reused(pool: &PgPool, sub: &str, export_key_hash: &str) -> sqlx::Result<bool> {
    let row = sqlx::query_scalar!(
        r#"SELECT EXISTS(SELECT 1 FROM pake_password_history WHERE sub = $1 AND export_key_hash = $2) as "exists!""#,
        sub,
        export_key_hash
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn find_admin_record(pool: &PgPool, admin_id: uuid::Uuid) -> sqlx::Result<Option<PakeRecord>> {
    sqlx::query_as!(
        PakeRecord,
        r#"SELECT envelope, server_pubkey FROM pake_admin_records WHERE admin_id = $1"#,
        admin_id
    )
    .fetch_optional(pool)
    .await
}

pub async fn upsert_admin_record(
    pool: &PgPool,
    admin_id: uuid::Uuid,
    envelope: &[u8],
    server_pubkey: &[u8],
) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO pake_admin_records (admin_id, envelope, server_pubkey)
           VALUES ($1, $2, $3)
           ON CONFLICT (admin_id) DO UPDATE SET envelope = $2, server_pubkey = $3, created_at = now()"#,
        admin_id,
        envelope,
        server_pubkey
    )
    .execute(pool)
    .await?;
    Ok(())
}
