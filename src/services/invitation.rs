//! Invitations sent by organization managers and answered by the invitee.

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::invitation::{Invitation, InvitationStatus, NewInvitation};
use crate::domain::member::{Member, MemberRole};
use crate::domain::types::{Email, InvitationId, InvitationToken};
use crate::forms::invitation::{InvitationForm, InvitationPayload};
use crate::repository::{InvitationReader, InvitationWriter, MemberReader};
use crate::services::access::require_manager;
use crate::services::{ServiceError, ServiceResult, path_id};

pub fn list_invitations<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Vec<Invitation>>
where
    R: InvitationReader + MemberReader + ?Sized,
{
    let member = require_manager(repo, user, organization_id)?;

    let invitations = repo
        .list_invitations(member.organization_id)
        .map_err(|err| {
            log::error!("Failed to list invitations: {err}");
            err
        })?;

    Ok(invitations)
}

/// Invites `form.email` to join with `form.role`.
pub fn create_invitation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: InvitationForm,
) -> ServiceResult<Invitation>
where
    R: InvitationReader + InvitationWriter + MemberReader + ?Sized,
{
    let actor = require_manager(repo, user, organization_id)?;
    let payload = InvitationPayload::try_from(form)?;

    if payload.role == MemberRole::Owner && actor.role != MemberRole::Owner {
        return Err(ServiceError::Forbidden);
    }
    if repo
        .get_member_by_email(actor.organization_id, &payload.email)?
        .is_some()
    {
        return Err(ServiceError::conflict(format!(
            "{} is already a member",
            payload.email
        )));
    }

    let now = Utc::now().naive_utc();
    let pending = repo.find_pending_invitation(actor.organization_id, &payload.email)?;
    if pending.is_some_and(|invitation| invitation.is_open(now)) {
        return Err(ServiceError::conflict(format!(
            "{} already has a pending invitation",
            payload.email
        )));
    }

    let new_invitation = NewInvitation::new(
        actor.organization_id,
        payload.email,
        payload.role,
        actor.user_id,
        now,
    );
    let invitation = repo.create_invitation(&new_invitation).map_err(|err| {
        log::error!("Failed to create invitation: {err}");
        err
    })?;

    Ok(invitation)
}

/// Withdraws a pending invitation.
pub fn cancel_invitation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    invitation_id: i32,
) -> ServiceResult<Invitation>
where
    R: InvitationReader + InvitationWriter + MemberReader + ?Sized,
{
    let actor = require_manager(repo, user, organization_id)?;
    let invitation_id = path_id(invitation_id, InvitationId::new)?;

    let invitation = repo
        .get_invitation_by_id(invitation_id, actor.organization_id)?
        .ok_or(ServiceError::NotFound)?;
    if invitation.status != InvitationStatus::Pending {
        return Err(ServiceError::conflict(format!(
            "invitation is already {}",
            invitation.status.as_str().to_lowercase()
        )));
    }

    let invitation = repo
        .set_invitation_status(invitation.id, InvitationStatus::Cancelled)
        .map_err(|err| {
            log::error!("Failed to cancel invitation: {err}");
            err
        })?;

    Ok(invitation)
}

/// Open invitations addressed to the caller's email.
pub fn list_my_invitations<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Invitation>>
where
    R: InvitationReader + ?Sized,
{
    let email = Email::new(user.email.as_str()).map_err(|_| ServiceError::Unauthorized)?;
    let now = Utc::now().naive_utc();

    let invitations = repo
        .list_pending_invitations_for_email(&email)
        .map_err(|err| {
            log::error!("Failed to list invitations: {err}");
            err
        })?
        .into_iter()
        .filter(|invitation| invitation.is_open(now))
        .collect();

    Ok(invitations)
}

/// Loads an invitation addressed to the caller that can still be answered.
fn load_open_invitation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    token: &str,
) -> ServiceResult<Invitation>
where
    R: InvitationReader + ?Sized,
{
    let token: InvitationToken = token.parse().map_err(|_| ServiceError::NotFound)?;
    let invitation = repo
        .get_invitation_by_token(&token)?
        .ok_or(ServiceError::NotFound)?;

    let email = Email::new(user.email.as_str()).map_err(|_| ServiceError::Unauthorized)?;
    if invitation.email != email {
        return Err(ServiceError::Forbidden);
    }
    if !invitation.is_open(Utc::now().naive_utc()) {
        return Err(ServiceError::conflict("invitation is no longer valid"));
    }

    Ok(invitation)
}

/// Joins the inviting organization.
pub fn accept_invitation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    token: &str,
) -> ServiceResult<Member>
where
    R: InvitationReader + InvitationWriter + MemberReader + ?Sized,
{
    let profile = user.profile().map_err(|_| ServiceError::Unauthorized)?;
    let invitation = load_open_invitation(repo, user, token)?;

    if repo
        .get_member_by_user(invitation.organization_id, &profile.user_id)?
        .is_some()
    {
        return Err(ServiceError::conflict("already a member of this organization"));
    }

    let member = repo
        .accept_invitation(&invitation, &profile)
        .map_err(|err| {
            log::error!("Failed to accept invitation: {err}");
            err
        })?;

    Ok(member)
}

pub fn reject_invitation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    token: &str,
) -> ServiceResult<Invitation>
where
    R: InvitationReader + InvitationWriter + ?Sized,
{
    let invitation = load_open_invitation(repo, user, token)?;

    let invitation = repo
        .set_invitation_status(invitation.id, InvitationStatus::Rejected)
        .map_err(|err| {
            log::error!("Failed to reject invitation: {err}");
            err
        })?;

    Ok(invitation)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::types::{OrganizationId, UserId};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, member, now, user};

    fn invitation(email: &str, status: InvitationStatus, expires_in_days: i64) -> Invitation {
        Invitation {
            id: InvitationId::new(5).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            email: Email::new(email).unwrap(),
            role: MemberRole::Member,
            token: InvitationToken::generate(),
            status,
            invited_by: UserId::new("owner").unwrap(),
            expires_at: Utc::now().naive_utc() + Duration::days(expires_in_days),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn form(email: &str, role: &str) -> InvitationForm {
        InvitationForm {
            email: email.to_string(),
            role: Some(role.to_string()),
        }
    }

    #[test]
    fn manager_invites_new_email() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "admin", Some(MemberRole::Admin));
        repo.expect_get_member_by_email().returning(|_, _| Ok(None));
        repo.expect_find_pending_invitation()
            .returning(|_, _| Ok(None));
        repo.expect_create_invitation()
            .withf(|new| {
                new.email.as_str() == "guest@example.com"
                    && new.role == MemberRole::Admin
                    && new.invited_by.as_str() == "admin"
            })
            .times(1)
            .returning(|_| Ok(invitation("guest@example.com", InvitationStatus::Pending, 7)));

        let created = create_invitation(
            &repo,
            &user("admin"),
            ORG,
            form("guest@example.com", "ADMIN"),
        )
        .unwrap();

        assert_eq!(created.status, InvitationStatus::Pending);
    }

    #[test]
    fn existing_member_or_open_invitation_conflicts() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "admin", Some(MemberRole::Admin));
        repo.expect_get_member_by_email()
            .returning(|_, _| Ok(Some(member(3, "guest", MemberRole::Member))));
        repo.expect_create_invitation().times(0);

        let result = create_invitation(&repo, &user("admin"), ORG, form("guest@example.com", ""));
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        let mut repo = MockRepository::new();
        expect_member(&mut repo, "admin", Some(MemberRole::Admin));
        repo.expect_get_member_by_email().returning(|_, _| Ok(None));
        repo.expect_find_pending_invitation().returning(|_, _| {
            Ok(Some(invitation("guest@example.com", InvitationStatus::Pending, 3)))
        });
        repo.expect_create_invitation().times(0);

        let result = create_invitation(&repo, &user("admin"), ORG, form("guest@example.com", ""));
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn expired_pending_invitation_can_be_resent() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "admin", Some(MemberRole::Admin));
        repo.expect_get_member_by_email().returning(|_, _| Ok(None));
        repo.expect_find_pending_invitation().returning(|_, _| {
            Ok(Some(invitation("guest@example.com", InvitationStatus::Pending, -1)))
        });
        repo.expect_create_invitation()
            .times(1)
            .returning(|_| Ok(invitation("guest@example.com", InvitationStatus::Pending, 7)));

        assert!(
            create_invitation(&repo, &user("admin"), ORG, form("guest@example.com", "")).is_ok()
        );
    }

    #[test]
    fn accepting_requires_matching_email() {
        let mut repo = MockRepository::new();
        repo.expect_get_invitation_by_token()
            .returning(|_| {
                Ok(Some(invitation(
                    "someone@example.com",
                    InvitationStatus::Pending,
                    7,
                )))
            });
        repo.expect_accept_invitation().times(0);

        let token = InvitationToken::generate().to_string();
        let result = accept_invitation(&repo, &user("guest"), &token);

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn accepting_open_invitation_creates_membership() {
        let mut repo = MockRepository::new();
        repo.expect_get_invitation_by_token()
            .returning(|_| Ok(Some(invitation("guest@example.com", InvitationStatus::Pending, 7))));
        repo.expect_get_member_by_user().returning(|_, _| Ok(None));
        repo.expect_accept_invitation()
            .withf(|invitation, profile| {
                invitation.id.get() == 5 && profile.email.as_str() == "guest@example.com"
            })
            .times(1)
            .returning(|_, _| Ok(member(9, "guest", MemberRole::Member)));

        let token = InvitationToken::generate().to_string();
        let joined = accept_invitation(&repo, &user("guest"), &token).unwrap();

        assert_eq!(joined.id.get(), 9);
    }

    #[test]
    fn answered_invitation_cannot_be_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_invitation_by_token().returning(|_| {
            Ok(Some(invitation("guest@example.com", InvitationStatus::Accepted, 7)))
        });
        repo.expect_set_invitation_status().times(0);

        let token = InvitationToken::generate().to_string();
        let result = reject_invitation(&repo, &user("guest"), &token);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn malformed_token_is_not_found() {
        let repo = MockRepository::new();

        let result = reject_invitation(&repo, &user("guest"), "not-a-token");

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn my_invitations_skip_expired_ones() {
        let mut repo = MockRepository::new();
        repo.expect_list_pending_invitations_for_email()
            .withf(|email| email.as_str() == "guest@example.com")
            .returning(|_| {
                Ok(vec![
                    invitation("guest@example.com", InvitationStatus::Pending, 2),
                    invitation("guest@example.com", InvitationStatus::Pending, -2),
                ])
            });

        let open = list_my_invitations(&repo, &user("guest")).unwrap();

        assert_eq!(open.len(), 1);
    }
}
