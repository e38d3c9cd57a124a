//! Client directory of an organization.

use crate::auth::AuthenticatedUser;
use crate::domain::client::{Client, ClientType};
use crate::domain::types::{ClientId, OrganizationId, RecordStatus};
use crate::forms::client::{ClientForm, ClientPayload};
use crate::list_state::ListState;
use crate::pagination::ListPage;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, MemberReader, PartySort, SortDirection,
};
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult, path_id};

/// Translates the list state into a repository query.
///
/// Unknown sort columns fall back to the name, unknown or malformed filters
/// are ignored.
fn client_query(organization_id: OrganizationId, state: &ListState) -> ClientListQuery {
    let mut query = ClientListQuery::new(organization_id).paginate(state.page, state.per_page);

    if let Some(search) = &state.search {
        query = query.search(search.clone());
    }
    if let Some(status) = state.filter("status").and_then(|s| s.parse::<RecordStatus>().ok()) {
        query = query.status(status);
    }
    if let Some(client_type) = state.filter("type").and_then(|s| s.parse::<ClientType>().ok()) {
        query = query.client_type(client_type);
    }
    if let Some(sort) = &state.sort {
        let column = PartySort::from_column(&sort.column).unwrap_or_default();
        query = query.sort(column, SortDirection::from_descending(sort.descending));
    }

    query
}

pub fn list_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    state: &ListState,
) -> ServiceResult<ListPage<Client>>
where
    R: ClientReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let state = state
        .clone()
        .with_known_sort(|column| PartySort::from_column(column).is_some());

    let (total, clients) = repo
        .list_clients(client_query(member.organization_id, &state))
        .map_err(|err| {
            log::error!("Failed to list clients: {err}");
            err
        })?;

    Ok(ListPage::new(clients, total, &state))
}

pub fn get_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    client_id: i32,
) -> ServiceResult<Client>
where
    R: ClientReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let client_id = path_id(client_id, ClientId::new)?;

    repo.get_client_by_id(client_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: ClientForm,
) -> ServiceResult<Client>
where
    R: ClientWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = ClientPayload::try_from(form)?;

    let client = repo
        .create_client(&payload.into_new(member.organization_id))
        .map_err(|err| {
            log::error!("Failed to create client: {err}");
            err
        })?;

    Ok(client)
}

pub fn update_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    client_id: i32,
    form: ClientForm,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let client_id = path_id(client_id, ClientId::new)?;
    let payload = ClientPayload::try_from(form)?;

    let existing = repo
        .get_client_by_id(client_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)?;

    let client = repo
        .update_client(existing.id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update client: {err}");
            err
        })?;

    Ok(client)
}

pub fn delete_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    client_id: i32,
) -> ServiceResult<()>
where
    R: ClientWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let client_id = path_id(client_id, ClientId::new)?;

    let deleted = repo
        .delete_clients(member.organization_id, &[client_id])
        .map_err(|err| {
            log::error!("Failed to delete client: {err}");
            err
        })?;
    if deleted == 0 {
        return Err(ServiceError::NotFound);
    }

    Ok(())
}

/// Deletes the selected clients, returning how many were removed.
pub fn delete_selected_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    selected: &[i32],
) -> ServiceResult<usize>
where
    R: ClientWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let ids: Vec<ClientId> = selected
        .iter()
        .filter_map(|id| ClientId::new(*id).ok())
        .collect();
    if ids.is_empty() {
        return Err(ServiceError::invalid("selected", "select at least one client"));
    }

    let deleted = repo
        .delete_clients(member.organization_id, &ids)
        .map_err(|err| {
            log::error!("Failed to delete clients: {err}");
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

    fn client(id: i32, name: &str) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            client_type: ClientType::Company,
            name: DisplayName::new(name).unwrap(),
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
    fn list_state_becomes_repository_query() {
        let state = ListState::from_query(
            "search=acme&sort=-createdAt&page=2&perPage=20&status=archived&type=bogus&color=red",
        );
        let query = client_query(OrganizationId::new(ORG).unwrap(), &state);

        assert_eq!(query.search.as_deref(), Some("acme"));
        assert_eq!(query.status, Some(RecordStatus::Archived));
        assert_eq!(query.client_type, None);
        assert_eq!(query.sort, PartySort::CreatedAt);
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!(query.pagination.map(|p| (p.page, p.per_page)), Some((2, 20)));
    }

    #[test]
    fn unknown_sort_column_falls_back_to_name() {
        let state = ListState::from_query("sort=password");
        let query = client_query(OrganizationId::new(ORG).unwrap(), &state);
        assert_eq!(query.sort, PartySort::Name);
    }

    #[test]
    fn listing_wraps_results_in_a_page() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_clients()
            .withf(|query| query.organization_id.get() == ORG)
            .returning(|_| Ok((11, vec![client(1, "Acme")])));

        let page = list_clients(&repo, &user("bob"), ORG, &ListState::default()).unwrap();

        assert_eq!(page.total, 11);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn unknown_sort_column_is_not_echoed_back() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_clients()
            .withf(|query| query.sort == PartySort::Name)
            .returning(|_| Ok((1, vec![client(1, "Acme")])));
        let state = ListState::from_query("sort=-password&search=acme");

        let page = list_clients(&repo, &user("bob"), ORG, &state).unwrap();

        assert_eq!(page.query, "search=acme");
    }

    #[test]
    fn missing_client_is_not_found() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_client_by_id().returning(|_, _| Ok(None));
        repo.expect_update_client().times(0);

        let form = ClientForm {
            name: "Acme".into(),
            ..ClientForm::default()
        };
        let result = update_client(&repo, &user("bob"), ORG, 3, form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn deleting_nothing_is_not_found() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_delete_clients().returning(|_, _| Ok(0));

        let result = delete_client(&repo, &user("bob"), ORG, 3);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn bulk_delete_needs_a_selection() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_delete_clients()
            .withf(|org, ids| org.get() == ORG && ids.len() == 2)
            .times(1)
            .returning(|_, ids| Ok(ids.len()));

        assert_eq!(
            delete_selected_clients(&repo, &user("bob"), ORG, &[4, 0, 9]).unwrap(),
            2
        );
        assert!(matches!(
            delete_selected_clients(&repo, &user("bob"), ORG, &[]),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn strangers_cannot_create() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "eve", None);
        repo.expect_create_client().times(0);

        let result = create_client(&repo, &user("eve"), ORG, ClientForm::default());

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }
}
