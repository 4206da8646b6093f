use darkauth_types::{Group, MemberStatus, Organization, OrganizationMember, Permission, Role};
use sqlx::PgPool;
use uuid::Uuid;

// Permissions

pub async fn list_permissions(pool: &PgPool) -> sqlx::Result<Vec<Permission>> {
    sqlx::query_as!(Permission, r#"SELECT key, description FROM permissions ORDER BY key"#)
        .fetch_all(pool)
        .await
}

pub async fn create_permission(pool: &PgPool, key: &str, description: &str) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO permissions (key, description) VALUES ($1, $2)"#,
        key,
        description
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_permission(pool: &PgPool, key: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM permissions WHERE key = $1"#, key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Groups

pub async fn list_groups(pool: &PgPool) -> sqlx::Result<Vec<Group>> {
    sqlx::query_as!(
        Group,
        r#"SELECT key, name, enable_login, require_otp FROM groups ORDER BY key"#
    )
    .fetch_all(pool)
    .await
}

pub async fn create_group(pool: &PgPool, group: &Group) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO groups (key, name, enable_login, require_otp) VALUES ($1, $2, $3, $4)"#,
        group.key,
        group.name,
        group.enable_login,
        group.require_otp
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// `"default"` is undeletable per §3; callers must check the key before
/// calling this.
pub async fn delete_group(pool: &PgPool, key: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM groups WHERE key = $1"#, key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Roles

pub async fn list_roles(pool: &PgPool) -> sqlx::Result<Vec<Role>> {
    sqlx::query_as!(Role, r#"SELECT id, key, name, system FROM roles ORDER BY key"#)
        .fetch_all(pool)
        .await
}

pub async fn create_role(pool: &PgPool, key: &str, name: &str) -> sqlx::Result<Uuid> {
    sqlx::query_scalar!(
        r#"INSERT INTO roles (key, name, system) VALUES ($1, $2, false) RETURNING id"#,
        key,
        name
    )
    .fetch_one(pool)
    .await
}

pub async fn assign_role(pool: &PgPool, member_id: Uuid, role_id: Uuid) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO organization_member_roles (member_id, role_id) VALUES ($1, $2)
           ON CONFLICT DO NOTHING"#,
        member_id,
        role_id
    )
    .execute(pool)
    .await?;
    Ok(())
}

// Organizations

pub async fn list_organizations(pool: &PgPool) -> sqlx::Result<Vec<Organization>> {
    sqlx::query_as!(
        Organization,
        r#"SELECT id, slug, name, force_otp, created_by_user_sub FROM organizations ORDER BY slug"#
    )
    .fetch_all(pool)
    .await
}

pub async fn find_organization_by_slug(pool: &PgPool, slug: &str) -> sqlx::Result<Option<Organization>> {
    sqlx::query_as!(
        Organization,
        r#"SELECT id, slug, name, force_otp, created_by_user_sub FROM organizations WHERE slug = $1"#,
        slug
    )
    .fetch_optional(pool)
    .await
}

pub async fn create_organization(
    pool: &PgPool,
    slug: &str,
    name: &str,
    created_by_user_sub: Option<&str>,
) -> sqlx::Result<Uuid> {
    sqlx::query_scalar!(
        r#"INSERT INTO organizations (slug, name, created_by_user_sub) VALUES ($1, $2, $3)
           RETURNING id"#,
        slug,
        name,
        created_by_user_sub
    )
    .fetch_one(pool)
    .await
}

pub async fn set_force_otp(pool: &PgPool, organization_id: Uuid, force_otp: bool) -> sqlx::Result<()> {
    sqlx::query!(
        r#"UPDATE organizations SET force_otp = $2 WHERE id = $1"#,
        organization_id,
        force_otp
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn add_member(
    pool: &PgPool,
    organization_id: Uuid,
    user_sub: &str,
    status: MemberStatus,
) -> sqlx::Result<Uuid> {
    sqlx::query_scalar!(
        r#"INSERT INTO organization_members (organization_id, user_sub, status)
           VALUES ($1, $2, $3) RETURNING id"#,
        organization_id,
        user_sub,
        status as MemberStatus
    )
    .fetch_one(pool)
    .await
}

pub async fn list_members(pool: &PgPool, organization_id: Uuid) -> sqlx::Result<Vec<OrganizationMember>> {
    sqlx::query_as!(
        OrganizationMember,
        r#"SELECT id, organization_id, user_sub, status as "status: MemberStatus"
           FROM organization_members WHERE organization_id = $1"#,
        organization_id
    )
    .fetch_all(pool)
    .await
}
