//! Organization (tenant) lifecycle and its company record.

use crate::auth::AuthenticatedUser;
use crate::domain::organization::{Company, Organization, OrganizationMembership};
use crate::dto::organization::{CreatedOrganization, OrganizationDetails};
use crate::forms::organization::{CompanyForm, OrganizationForm, OrganizationPayload};
use crate::repository::{MemberReader, OrganizationReader, OrganizationWriter};
use crate::services::access::{require_manager, require_member, require_owner};
use crate::services::{ServiceError, ServiceResult};

/// Organizations the caller belongs to, with the role held in each.
pub fn list_organizations<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<OrganizationMembership>>
where
    R: OrganizationReader + ?Sized,
{
    let user_id = user.user_id().map_err(|_| ServiceError::Unauthorized)?;

    let organizations = repo.list_organizations_for_user(&user_id).map_err(|err| {
        log::error!("Failed to list organizations: {err}");
        err
    })?;

    Ok(organizations)
}

/// Creates an organization and makes the caller its owner.
pub fn create_organization<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: OrganizationForm,
) -> ServiceResult<CreatedOrganization>
where
    R: OrganizationReader + OrganizationWriter + ?Sized,
{
    let profile = user.profile().map_err(|_| ServiceError::Unauthorized)?;
    let payload = OrganizationPayload::try_from(form)?;

    if repo.get_organization_by_slug(&payload.slug)?.is_some() {
        return Err(ServiceError::conflict(format!(
            "slug {} is already taken",
            payload.slug
        )));
    }

    let (organization, owner) = repo
        .create_organization_with_owner(&payload.into_new(), &profile)
        .map_err(|err| {
            log::error!("Failed to create organization: {err}");
            err
        })?;

    Ok(CreatedOrganization {
        organization,
        owner,
    })
}

pub fn get_organization<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<OrganizationDetails>
where
    R: OrganizationReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let organization = repo
        .get_organization_by_id(member.organization_id)?
        .ok_or(ServiceError::NotFound)?;
    let company = repo.get_company(member.organization_id)?;

    Ok(OrganizationDetails {
        organization,
        role: member.role,
        company,
    })
}

/// Updates the organization profile. Owners and admins only.
pub fn update_organization<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: OrganizationForm,
) -> ServiceResult<Organization>
where
    R: OrganizationReader + OrganizationWriter + MemberReader + ?Sized,
{
    let member = require_manager(repo, user, organization_id)?;
    let payload = OrganizationPayload::try_from(form)?;

    let taken = repo
        .get_organization_by_slug(&payload.slug)?
        .is_some_and(|existing| existing.id != member.organization_id);
    if taken {
        return Err(ServiceError::conflict(format!(
            "slug {} is already taken",
            payload.slug
        )));
    }

    let organization = repo
        .update_organization(member.organization_id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update organization: {err}");
            err
        })?;

    Ok(organization)
}

/// Deletes the organization and everything scoped to it. Owners only.
pub fn delete_organization<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<()>
where
    R: OrganizationWriter + MemberReader + ?Sized,
{
    let member = require_owner(repo, user, organization_id)?;

    repo.delete_organization(member.organization_id)
        .map_err(|err| {
            log::error!("Failed to delete organization: {err}");
            err
        })?;

    Ok(())
}

pub fn get_company<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Option<Company>>
where
    R: OrganizationReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    Ok(repo.get_company(member.organization_id)?)
}

/// Creates or replaces the legal company record. Owners and admins only.
pub fn save_company<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: CompanyForm,
) -> ServiceResult<Company>
where
    R: OrganizationWriter + MemberReader + ?Sized,
{
    let member = require_manager(repo, user, organization_id)?;
    let company = form.into_domain(member.organization_id)?;

    let company = repo.upsert_company(&company).map_err(|err| {
        log::error!("Failed to save company: {err}");
        err
    })?;

    Ok(company)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::MemberRole;
    use crate::domain::types::{DisplayName, OrganizationId, Slug};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, member, now, user};

    fn organization(id: i32, slug: &str) -> Organization {
        Organization {
            id: OrganizationId::new(id).unwrap(),
            name: DisplayName::new("Acme").unwrap(),
            slug: Slug::new(slug).unwrap(),
            email: None,
            phone: None,
            website: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn form(name: &str) -> OrganizationForm {
        OrganizationForm {
            name: name.to_string(),
            ..OrganizationForm::default()
        }
    }

    #[test]
    fn creating_makes_the_caller_owner() {
        let mut repo = MockRepository::new();
        repo.expect_get_organization_by_slug()
            .withf(|slug| slug.as_str() == "acme")
            .returning(|_| Ok(None));
        repo.expect_create_organization_with_owner()
            .withf(|org, owner| org.slug.as_str() == "acme" && owner.user_id.as_str() == "alice")
            .times(1)
            .returning(|_, _| {
                Ok((
                    organization(ORG, "acme"),
                    member(1, "alice", MemberRole::Owner),
                ))
            });

        let created = create_organization(&repo, &user("alice"), form("Acme")).unwrap();

        assert_eq!(created.owner.role, MemberRole::Owner);
    }

    #[test]
    fn taken_slug_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_organization_by_slug()
            .returning(|_| Ok(Some(organization(99, "acme"))));
        repo.expect_create_organization_with_owner().times(0);

        let result = create_organization(&repo, &user("alice"), form("Acme"));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn invalid_form_is_a_validation_error() {
        let repo = MockRepository::new();

        let result = create_organization(&repo, &user("alice"), form(""));

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn keeping_own_slug_is_allowed() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "alice", Some(MemberRole::Admin));
        repo.expect_get_organization_by_slug()
            .returning(|_| Ok(Some(organization(ORG, "acme"))));
        repo.expect_update_organization()
            .times(1)
            .returning(|_, _| Ok(organization(ORG, "acme")));

        assert!(update_organization(&repo, &user("alice"), ORG, form("Acme")).is_ok());
    }

    #[test]
    fn members_cannot_update_and_admins_cannot_delete() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_update_organization().times(0);

        let result = update_organization(&repo, &user("bob"), ORG, form("Acme"));
        assert!(matches!(result, Err(ServiceError::Forbidden)));

        let mut repo = MockRepository::new();
        expect_member(&mut repo, "carol", Some(MemberRole::Admin));
        repo.expect_delete_organization().times(0);

        let result = delete_organization(&repo, &user("carol"), ORG);
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn details_include_role_and_company() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_organization_by_id()
            .returning(|_| Ok(Some(organization(ORG, "acme"))));
        repo.expect_get_company().returning(|_| Ok(None));

        let details = get_organization(&repo, &user("bob"), ORG).unwrap();

        assert_eq!(details.role, MemberRole::Member);
        assert!(details.company.is_none());
    }
}
