//! People to reach at a client or supplier.

use crate::auth::AuthenticatedUser;
use crate::domain::contact::Contact;
use crate::domain::types::{ContactId, OrganizationId};
use crate::forms::contact::{ContactForm, ContactPayload};
use crate::repository::{ClientReader, ContactReader, ContactWriter, MemberReader, SupplierReader};
use crate::services::access::require_member;
use crate::services::address::{OwnerKind, resolve_owner};
use crate::services::{ServiceError, ServiceResult, path_id};

pub fn list_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    kind: OwnerKind,
    owner_id: i32,
) -> ServiceResult<Vec<Contact>>
where
    R: ContactReader + ClientReader + SupplierReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let owner = resolve_owner(repo, member.organization_id, kind, owner_id)?;

    let contacts = repo
        .list_contacts(member.organization_id, owner)
        .map_err(|err| {
            log::error!("Failed to list contacts: {err}");
            err
        })?;

    Ok(contacts)
}

pub fn create_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    kind: OwnerKind,
    owner_id: i32,
    form: ContactForm,
) -> ServiceResult<Contact>
where
    R: ContactWriter + ClientReader + SupplierReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = ContactPayload::try_from(form)?;
    let owner = resolve_owner(repo, member.organization_id, kind, owner_id)?;

    let contact = repo
        .create_contact(&payload.into_new(member.organization_id, owner))
        .map_err(|err| {
            log::error!("Failed to create contact: {err}");
            err
        })?;

    Ok(contact)
}

fn load_contact<R>(
    repo: &R,
    organization_id: OrganizationId,
    contact_id: i32,
) -> ServiceResult<Contact>
where
    R: ContactReader + ?Sized,
{
    let contact_id = path_id(contact_id, ContactId::new)?;
    repo.get_contact_by_id(contact_id, organization_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn update_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    contact_id: i32,
    form: ContactForm,
) -> ServiceResult<Contact>
where
    R: ContactReader + ContactWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = ContactPayload::try_from(form)?;
    let existing = load_contact(repo, member.organization_id, contact_id)?;

    let contact = repo
        .update_contact(existing.id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update contact: {err}");
            err
        })?;

    Ok(contact)
}

pub fn set_default_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    contact_id: i32,
) -> ServiceResult<Contact>
where
    R: ContactReader + ContactWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let existing = load_contact(repo, member.organization_id, contact_id)?;
    if existing.is_default {
        return Ok(existing);
    }

    let contact = repo.set_default_contact(existing.id).map_err(|err| {
        log::error!("Failed to set default contact: {err}");
        err
    })?;

    Ok(contact)
}

pub fn delete_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    contact_id: i32,
) -> ServiceResult<()>
where
    R: ContactReader + ContactWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let existing = load_contact(repo, member.organization_id, contact_id)?;

    repo.delete_contact(existing.id).map_err(|err| {
        log::error!("Failed to delete contact: {err}");
        err
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{Client, ClientType};
    use crate::domain::member::MemberRole;
    use crate::domain::party::Party;
    use crate::domain::types::{ClientId, DisplayName, RecordStatus};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, now, user};

    fn client(id: i32) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            client_type: ClientType::Individual,
            name: DisplayName::new("Jeanne Martin").unwrap(),
            email: None,
            phone: None,
            website: None,
            siren: None,
            vat_number: None,
            notes: None,
            status: RecordStatus::Active,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn contact(id: i32, owner: Party) -> Contact {
        Contact {
            id: ContactId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            owner,
            first_name: DisplayName::new("Jeanne").unwrap(),
            last_name: DisplayName::new("Martin").unwrap(),
            email: None,
            phone: None,
            position: None,
            is_default: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn contact_is_attached_to_the_client() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_client_by_id()
            .returning(|id, _| Ok(Some(client(id.get()))));
        repo.expect_create_contact()
            .withf(|new| new.owner == Party::Client(ClientId::new(4).unwrap()))
            .times(1)
            .returning(|new| Ok(contact(1, new.owner)));

        let form = ContactForm {
            first_name: "Jeanne".into(),
            last_name: "Martin".into(),
            ..ContactForm::default()
        };
        let created = create_contact(&repo, &user("bob"), ORG, OwnerKind::Client, 4, form).unwrap();

        assert_eq!(created.owner, Party::Client(ClientId::new(4).unwrap()));
    }

    #[test]
    fn unknown_contact_cannot_become_default() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_contact_by_id().returning(|_, _| Ok(None));
        repo.expect_set_default_contact().times(0);

        let result = set_default_contact(&repo, &user("bob"), ORG, 77);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
