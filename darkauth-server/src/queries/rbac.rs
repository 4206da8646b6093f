use sqlx::PgPool;

/// Permissions directly assigned to the user (§4.7 step 1).
pub async fn user_permissions(pool: &PgPool, user_sub: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar!(
        r#"SELECT permission_key FROM user_permissions WHERE user_sub = $1"#,
        user_sub
    )
    .fetch_all(pool)
    .await
}

/// Permissions inherited through active organization memberships and their
/// assigned roles (§4.7 step 2).
pub async fn org_role_permissions(pool: &PgPool, user_sub: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar!(
        r#"SELECT DISTINCT rp.permission_key
           FROM organization_members om
           JOIN organization_member_roles omr ON omr.member_id = om.id
           JOIN role_permissions rp ON rp.role_id = omr.role_id
           WHERE om.user_sub = $1 AND om.status = 'active'"#,
        user_sub
    )
    .fetch_all(pool)
    .await
}

/// Legacy group permissions (§4.7 step 3).
pub async fn group_permissions(pool: &PgPool, user_sub: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar!(
        r#"SELECT DISTINCT gp.permission_key
           FROM user_groups ug
           JOIN group_permissions gp ON gp.group_key = ug.group_key
           WHERE ug.user_sub = $1"#,
        user_sub
    )
    .fetch_all(pool)
    .await
}

pub async fn group_keys(pool: &PgPool, user_sub: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar!(r#"SELECT group_key FROM user_groups WHERE user_sub = $1"#, user_sub)
        .fetch_all(pool)
        .await
}

/// Whether any signal forces OTP step-up for this user (§4.7 last
/// paragraph): an org with `force_otp`, an assigned `otp_required` role, or
/// a group with `require_otp`. The global `otp.require_for_users` setting
/// is applied by the caller, not here.
pub async fn otp_forced_by_org_role_or_group(pool: &PgPool, user_sub: &str) -> sqlx::Result<bool> {
    let forced = sqlx::query_scalar!(
        r#"SELECT EXISTS (
               SELECT 1 FROM organization_members om
               JOIN organizations o ON o.id = om.organization_id
               WHERE om.user_sub = $1 AND om.status = 'active' AND o.force_otp = true
               UNION
               SELECT 1 FROM organization_members om
               JOIN organization_member_roles omr ON omr.member_id = om.id
               JOIN roles r ON r.id = omr.role_id
               WHERE om.user_sub = $1 AND om.status = 'active' AND r.key = 'otp_required'
               UNION
               SELECT 1 FROM user_groups ug
               JOIN groups g ON g.key = ug.group_key
               WHERE ug.user_sub = $1 AND g.require_otp = true
           ) as "exists!""#,
        user_sub
    )
    .fetch_one(pool)
    .await?;
    Ok(forced)
}
