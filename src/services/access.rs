//! Tenant membership checks run before every organization-scoped operation.

use crate::auth::AuthenticatedUser;
use crate::domain::member::{Member, MemberRole};
use crate::domain::types::OrganizationId;
use crate::repository::MemberReader;
use crate::services::{ServiceError, ServiceResult};

/// Returns the caller's membership in organization `organization_id`.
///
/// A malformed id, an unknown organization and a missing membership all yield
/// [`ServiceError::Forbidden`], so tenant ids cannot be probed.
pub fn require_member<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Member>
where
    R: MemberReader + ?Sized,
{
    let user_id = user.user_id().map_err(|_| ServiceError::Unauthorized)?;
    let organization_id =
        OrganizationId::new(organization_id).map_err(|_| ServiceError::Forbidden)?;

    repo.get_member_by_user(organization_id, &user_id)
        .map_err(|err| {
            log::error!("Failed to load membership: {err}");
            err
        })?
        .ok_or(ServiceError::Forbidden)
}

/// Like [`require_member`], restricted to owners and admins.
pub fn require_manager<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Member>
where
    R: MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    if !member.role.can_manage() {
        return Err(ServiceError::Forbidden);
    }
    Ok(member)
}

pub fn require_owner<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Member>
where
    R: MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    if member.role != MemberRole::Owner {
        return Err(ServiceError::Forbidden);
    }
    Ok(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, user};

    #[test]
    fn non_member_is_forbidden() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "stranger", None);

        let result = require_member(&repo, &user("stranger"), ORG);

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn malformed_organization_id_is_forbidden() {
        let mut repo = MockRepository::new();
        repo.expect_get_member_by_user().times(0);

        let result = require_member(&repo, &user("alice"), 0);

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn plain_member_cannot_manage() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));

        assert!(require_member(&repo, &user("bob"), ORG).is_ok());
        assert!(matches!(
            require_manager(&repo, &user("bob"), ORG),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn admin_manages_but_is_not_owner() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "carol", Some(MemberRole::Admin));

        assert!(require_manager(&repo, &user("carol"), ORG).is_ok());
        assert!(matches!(
            require_owner(&repo, &user("carol"), ORG),
            Err(ServiceError::Forbidden)
        ));
    }
}
