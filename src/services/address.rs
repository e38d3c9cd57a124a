//! Postal addresses attached to clients and suppliers.

use crate::auth::AuthenticatedUser;
use crate::domain::address::Address;
use crate::domain::party::Party;
use crate::domain::types::{AddressId, ClientId, OrganizationId, SupplierId};
use crate::forms::address::{AddressForm, AddressPayload};
use crate::repository::{AddressReader, AddressWriter, ClientReader, MemberReader, SupplierReader};
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult, path_id};

/// Kind of record owning addresses and contacts, taken from the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Client,
    Supplier,
}

impl OwnerKind {
    /// Parses the collection segment of the route, `clients` or `suppliers`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "clients" => Some(OwnerKind::Client),
            "suppliers" => Some(OwnerKind::Supplier),
            _ => None,
        }
    }
}

/// Resolves the owner from the route, checking it exists in the organization.
pub(crate) fn resolve_owner<R>(
    repo: &R,
    organization_id: OrganizationId,
    kind: OwnerKind,
    owner_id: i32,
) -> ServiceResult<Party>
where
    R: ClientReader + SupplierReader + ?Sized,
{
    let owner = match kind {
        OwnerKind::Client => {
            let id = path_id(owner_id, ClientId::new)?;
            repo.get_client_by_id(id, organization_id)?
                .map(|client| Party::Client(client.id))
        }
        OwnerKind::Supplier => {
            let id = path_id(owner_id, SupplierId::new)?;
            repo.get_supplier_by_id(id, organization_id)?
                .map(|supplier| Party::Supplier(supplier.id))
        }
    };
    owner.ok_or(ServiceError::NotFound)
}

pub fn list_addresses<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    kind: OwnerKind,
    owner_id: i32,
) -> ServiceResult<Vec<Address>>
where
    R: AddressReader + ClientReader + SupplierReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let owner = resolve_owner(repo, member.organization_id, kind, owner_id)?;

    let addresses = repo
        .list_addresses(member.organization_id, owner)
        .map_err(|err| {
            log::error!("Failed to list addresses: {err}");
            err
        })?;

    Ok(addresses)
}

pub fn create_address<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    kind: OwnerKind,
    owner_id: i32,
    form: AddressForm,
) -> ServiceResult<Address>
where
    R: AddressWriter + ClientReader + SupplierReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = AddressPayload::try_from(form)?;
    let owner = resolve_owner(repo, member.organization_id, kind, owner_id)?;

    let address = repo
        .create_address(&payload.into_new(member.organization_id, owner))
        .map_err(|err| {
            log::error!("Failed to create address: {err}");
            err
        })?;

    Ok(address)
}

fn load_address<R>(
    repo: &R,
    organization_id: OrganizationId,
    address_id: i32,
) -> ServiceResult<Address>
where
    R: AddressReader + ?Sized,
{
    let address_id = path_id(address_id, AddressId::new)?;
    repo.get_address_by_id(address_id, organization_id)?
        .ok_or(ServiceError::NotFound)
}

/// Updates an address. The default flag is changed through
/// [`set_default_address`] only.
pub fn update_address<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    address_id: i32,
    form: AddressForm,
) -> ServiceResult<Address>
where
    R: AddressReader + AddressWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = AddressPayload::try_from(form)?;
    let existing = load_address(repo, member.organization_id, address_id)?;

    let address = repo
        .update_address(existing.id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update address: {err}");
            err
        })?;

    Ok(address)
}

pub fn set_default_address<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    address_id: i32,
) -> ServiceResult<Address>
where
    R: AddressReader + AddressWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let existing = load_address(repo, member.organization_id, address_id)?;
    if existing.is_default {
        return Ok(existing);
    }

    let address = repo.set_default_address(existing.id).map_err(|err| {
        log::error!("Failed to set default address: {err}");
        err
    })?;

    Ok(address)
}

pub fn delete_address<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    address_id: i32,
) -> ServiceResult<()>
where
    R: AddressReader + AddressWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let existing = load_address(repo, member.organization_id, address_id)?;

    repo.delete_address(existing.id).map_err(|err| {
        log::error!("Failed to delete address: {err}");
        err
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::AddressType;
    use crate::domain::member::MemberRole;
    use crate::domain::types::{CountryCode, NonEmptyString, PostalCode};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, now, user};

    fn address(id: i32, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            owner: Party::Supplier(SupplierId::new(2).unwrap()),
            address_type: AddressType::Billing,
            line1: NonEmptyString::new("1 rue de Rivoli").unwrap(),
            line2: None,
            postal_code: PostalCode::new("75001").unwrap(),
            city: NonEmptyString::new("Paris").unwrap(),
            country: CountryCode::new("FR").unwrap(),
            is_default,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn form() -> AddressForm {
        AddressForm {
            line1: "1 rue de Rivoli".into(),
            postal_code: "75001".into(),
            city: "Paris".into(),
            ..AddressForm::default()
        }
    }

    #[test]
    fn owner_kind_comes_from_the_collection_segment() {
        assert_eq!(OwnerKind::from_segment("clients"), Some(OwnerKind::Client));
        assert_eq!(OwnerKind::from_segment("suppliers"), Some(OwnerKind::Supplier));
        assert_eq!(OwnerKind::from_segment("products"), None);
    }

    #[test]
    fn owner_must_exist() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_client_by_id().returning(|_, _| Ok(None));
        repo.expect_create_address().times(0);

        let result = create_address(&repo, &user("bob"), ORG, OwnerKind::Client, 5, form());

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn setting_default_flips_through_repository() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_address_by_id()
            .returning(|id, _| Ok(Some(address(id.get(), false))));
        repo.expect_set_default_address()
            .withf(|id| id.get() == 3)
            .times(1)
            .returning(|id| Ok(address(id.get(), true)));

        let updated = set_default_address(&repo, &user("bob"), ORG, 3).unwrap();

        assert!(updated.is_default);
    }

    #[test]
    fn already_default_address_is_left_alone() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_address_by_id()
            .returning(|id, _| Ok(Some(address(id.get(), true))));
        repo.expect_set_default_address().times(0);

        assert!(set_default_address(&repo, &user("bob"), ORG, 3).is_ok());
    }

    #[test]
    fn deleting_missing_address_is_not_found() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_address_by_id().returning(|_, _| Ok(None));
        repo.expect_delete_address().times(0);

        let result = delete_address(&repo, &user("bob"), ORG, 3);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
