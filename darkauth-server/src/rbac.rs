use std::collections::BTreeSet;

use darkauth_types::EffectiveAccess;
use sqlx::PgPool;

use crate::error::ApiResult;
use crate::queries;

/// Unions direct user permissions, organization-role permissions, and
/// legacy group permissions (§4.7). The result is deterministically sorted
/// so ID-token claims are stable across repeated resolutions of the same
/// underlying assignments.
pub async fn effective_access(pool: &PgPool, user_sub: &str) -> ApiResult<EffectiveAccess> {
    let direct = queries::rbac::user_permissions(pool, user_sub).await?;
    let org_role = queries::rbac::org_role_permissions(pool, user_sub).await?;
    let group = queries::rbac::group_permissions(pool, user_sub).await?;
    let groups = queries::rbac::group_keys(pool, user_sub).await?;

    Ok(merge_access(direct, org_role, group, groups))
}

/// The pure union/sort step of `effective_access`, split out so it can be
/// exercised without a database connection.
fn merge_access(
    direct: Vec<String>,
    org_role: Vec<String>,
    group: Vec<String>,
    groups: Vec<String>,
) -> EffectiveAccess {
    let mut permissions = BTreeSet::new();
    permissions.extend(direct);
    permissions.extend(org_role);
    permissions.extend(group);

    let groups: BTreeSet<String> = groups.into_iter().collect();

    EffectiveAccess {
        permissions: permissions.into_iter().collect(),
        groups: groups.into_iter().collect(),
        otp_required: false,
    }
}

/// Whether the user must complete OTP step-up before a code can be minted
/// (§4.7 last paragraph): any forcing org/role/group signal, or the global
/// `otp.require_for_users` setting.
pub async fn otp_required(pool: &PgPool, user_sub: &str, global_require: bool) -> ApiResult<bool> {
    if global_require {
        return Ok(true);
    }
    Ok(queries::rbac::otp_forced_by_org_role_or_group(pool, user_sub).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_access_dedupes_and_sorts_permissions() {
        let access = merge_access(
            vec!["users.write".into(), "users.read".into()],
            vec!["users.read".into(), "orgs.read".into()],
            vec!["legacy.read".into()],
            vec!["engineering".into(), "default".into()],
        );
        let expected_permissions: Vec<String> =
            ["legacy.read", "orgs.read", "users.read", "users.write"].iter().map(|s| s.to_string()).collect();
        let expected_groups: Vec<String> = ["default", "engineering"].iter().map(|s| s.to_string()).collect();
        assert_eq!(access.permissions, expected_permissions);
        assert_eq!(access.groups, expected_groups);
    }

    #[test]
    fn merge_access_empty_inputs_yield_empty_access() {
        let access = merge_access(vec![], vec![], vec![], vec![]);
        assert!(access.permissions.is_empty());
        assert!(access.groups.is_empty());
        assert!(!access.otp_required);
    }
}
