use crate::auth::AuthenticatedUser;
use crate::domain::supplier::Supplier;
use crate::domain::types::{OrganizationId, RecordStatus, SupplierId};
use crate::forms::supplier::{SupplierForm, SupplierPayload};
use crate::list_state::ListState;
use crate::pagination::ListPage;
use crate::repository::{
    MemberReader, PartySort, SortDirection, SupplierListQuery, SupplierReader, SupplierWriter,
};
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult, path_id};

fn supplier_query(organization_id: OrganizationId, state: &ListState) -> SupplierListQuery {
    let mut query = SupplierListQuery::new(organization_id).paginate(state.page, state.per_page);

    if let Some(search) = &state.search {
        query = query.search(search.clone());
    }
    if let Some(status) = state.filter("status").and_then(|s| s.parse::<RecordStatus>().ok()) {
        query = query.status(status);
    }
    if let Some(sort) = &state.sort {
        let column = PartySort::from_column(&sort.column).unwrap_or_default();
        query = query.sort(column, SortDirection::from_descending(sort.descending));
    }

    query
}

pub fn list_suppliers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    state: &ListState,
) -> ServiceResult<ListPage<Supplier>>
where
    R: SupplierReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let state = state
        .clone()
        .with_known_sort(|column| PartySort::from_column(column).is_some());

    let (total, suppliers) = repo
        .list_suppliers(supplier_query(member.organization_id, &state))
        .map_err(|err| {
            log::error!("Failed to list suppliers: {err}");
            err
        })?;

    Ok(ListPage::new(suppliers, total, &state))
}

pub fn get_supplier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    supplier_id: i32,
) -> ServiceResult<Supplier>
where
    R: SupplierReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let supplier_id = path_id(supplier_id, SupplierId::new)?;

    repo.get_supplier_by_id(supplier_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_supplier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: SupplierForm,
) -> ServiceResult<Supplier>
where
    R: SupplierWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = SupplierPayload::try_from(form)?;

    let supplier = repo
        .create_supplier(&payload.into_new(member.organization_id))
        .map_err(|err| {
            log::error!("Failed to create supplier: {err}");
            err
        })?;

    Ok(supplier)
}

pub fn update_supplier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    supplier_id: i32,
    form: SupplierForm,
) -> ServiceResult<Supplier>
where
    R: SupplierReader + SupplierWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let supplier_id = path_id(supplier_id, SupplierId::new)?;
    let payload = SupplierPayload::try_from(form)?;

    let existing = repo
        .get_supplier_by_id(supplier_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)?;

    let supplier = repo
        .update_supplier(existing.id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update supplier: {err}");
            err
        })?;

    Ok(supplier)
}

pub fn delete_supplier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    supplier_id: i32,
) -> ServiceResult<()>
where
    R: SupplierWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let supplier_id = path_id(supplier_id, SupplierId::new)?;

    let deleted = repo
        .delete_suppliers(member.organization_id, &[supplier_id])
        .map_err(|err| {
            log::error!("Failed to delete supplier: {err}");
            err
        })?;
    if deleted == 0 {
        return Err(ServiceError::NotFound);
    }

    Ok(())
}

pub fn delete_selected_suppliers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    selected: &[i32],
) -> ServiceResult<usize>
where
    R: SupplierWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let ids: Vec<SupplierId> = selected
        .iter()
        .filter_map(|id| SupplierId::new(*id).ok())
        .collect();
    if ids.is_empty() {
        return Err(ServiceError::invalid(
            "selected",
            "select at least one supplier",
        ));
    }

    let deleted = repo
        .delete_suppliers(member.organization_id, &ids)
        .map_err(|err| {
            log::error!("Failed to delete suppliers: {err}");
            err
        })?;

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::MemberRole;
    use crate::domain::types::DisplayName;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, now, user};

    fn supplier(id: i32) -> Supplier {
        Supplier {
            id: SupplierId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            name: DisplayName::new("Paper Co").unwrap(),
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

    #[test]
    fn status_filter_and_sort_are_applied() {
        let state = ListState::from_query("status=ACTIVE&sort=email");
        let query = supplier_query(OrganizationId::new(ORG).unwrap(), &state);

        assert_eq!(query.status, Some(RecordStatus::Active));
        assert_eq!(query.sort, PartySort::Email);
        assert_eq!(query.direction, SortDirection::Asc);
    }

    #[test]
    fn supplier_of_another_organization_is_not_found() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_supplier_by_id()
            .withf(|id, org| id.get() == 12 && org.get() == ORG)
            .returning(|_, _| Ok(None));

        let result = get_supplier(&repo, &user("bob"), ORG, 12);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_writes_the_existing_row() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_supplier_by_id()
            .returning(|id, _| Ok(Some(supplier(id.get()))));
        repo.expect_update_supplier()
            .withf(|id, updates| id.get() == 4 && updates.status == RecordStatus::Archived)
            .times(1)
            .returning(|id, _| Ok(supplier(id.get())));

        let form = SupplierForm {
            name: "Paper Co".into(),
            status: Some("ARCHIVED".into()),
            ..SupplierForm::default()
        };
        assert!(update_supplier(&repo, &user("bob"), ORG, 4, form).is_ok());
    }
}
