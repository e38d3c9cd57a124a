//! Organization membership management.
//!
//! Only an owner may grant or take away the OWNER role, and an organization
//! never loses its last owner.

use crate::auth::AuthenticatedUser;
use crate::domain::member::{Member, MemberRole};
use crate::domain::types::{MemberId, OrganizationId};
use crate::forms::member::MemberRoleForm;
use crate::repository::{MemberReader, MemberWriter};
use crate::services::access::{require_manager, require_member};
use crate::services::{ServiceError, ServiceResult, path_id};

pub fn list_members<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Vec<Member>>
where
    R: MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let members = repo.list_members(member.organization_id).map_err(|err| {
        log::error!("Failed to list members: {err}");
        err
    })?;

    Ok(members)
}

fn load_target<R>(
    repo: &R,
    organization_id: OrganizationId,
    member_id: i32,
) -> ServiceResult<Member>
where
    R: MemberReader + ?Sized,
{
    let member_id = path_id(member_id, MemberId::new)?;
    repo.get_member_by_id(member_id, organization_id)?
        .ok_or(ServiceError::NotFound)
}

fn ensure_not_last_owner<R>(repo: &R, target: &Member) -> ServiceResult<()>
where
    R: MemberReader + ?Sized,
{
    if target.role == MemberRole::Owner && repo.count_owners(target.organization_id)? <= 1 {
        return Err(ServiceError::conflict(
            "an organization must keep at least one owner",
        ));
    }
    Ok(())
}

/// Changes the role of a member. Owners and admins only.
pub fn update_member_role<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    member_id: i32,
    form: MemberRoleForm,
) -> ServiceResult<Member>
where
    R: MemberReader + MemberWriter + ?Sized,
{
    let actor = require_manager(repo, user, organization_id)?;
    let role = MemberRole::try_from(form)?;
    let target = load_target(repo, actor.organization_id, member_id)?;

    if target.role == role {
        return Ok(target);
    }
    let touches_owner = target.role == MemberRole::Owner || role == MemberRole::Owner;
    if touches_owner && actor.role != MemberRole::Owner {
        return Err(ServiceError::Forbidden);
    }
    ensure_not_last_owner(repo, &target)?;

    let member = repo.update_member_role(target.id, role).map_err(|err| {
        log::error!("Failed to update member role: {err}");
        err
    })?;

    Ok(member)
}

/// Removes a member from the organization. Owners and admins only.
pub fn remove_member<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    member_id: i32,
) -> ServiceResult<()>
where
    R: MemberReader + MemberWriter + ?Sized,
{
    let actor = require_manager(repo, user, organization_id)?;
    let target = load_target(repo, actor.organization_id, member_id)?;

    if target.role == MemberRole::Owner && actor.role != MemberRole::Owner {
        return Err(ServiceError::Forbidden);
    }
    ensure_not_last_owner(repo, &target)?;

    repo.delete_member(target.id).map_err(|err| {
        log::error!("Failed to remove member: {err}");
        err
    })?;

    Ok(())
}

/// Removes the caller's own membership.
pub fn leave_organization<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<()>
where
    R: MemberReader + MemberWriter + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    ensure_not_last_owner(repo, &member)?;

    repo.delete_member(member.id).map_err(|err| {
        log::error!("Failed to leave organization: {err}");
        err
    })?;

    Ok(())
}
