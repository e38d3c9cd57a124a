use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        client::{Client, NewClient, UpdateClient},
        types::{ClientId, OrganizationId},
    },
    models::client::{
        Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
    },
    repository::{
        ClientListQuery, ClientReader, ClientWriter, DieselRepository, PartySort, SortDirection,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::clients,
};

/// Builds the filtered (unsorted, unpaginated) client query.
fn filtered(query: &ClientListQuery) -> clients::BoxedQuery<'static, Sqlite> {
    let mut items = clients::table
        .filter(clients::organization_id.eq(query.organization_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref() {
        let pattern = format!("%{term}%");
        items = items.filter(
            clients::name
                .like(pattern.clone())
                .or(clients::email.like(pattern.clone()))
                .or(clients::phone.like(pattern.clone()))
                .or(clients::siren.like(pattern)),
        );
    }

    if let Some(status) = query.status {
        items = items.filter(clients::status.eq(status.as_str()));
    }

    if let Some(client_type) = query.client_type {
        items = items.filter(clients::client_type.eq(client_type.as_str()));
    }

    items
}

fn sorted(
    items: clients::BoxedQuery<'static, Sqlite>,
    sort: PartySort,
    direction: SortDirection,
) -> clients::BoxedQuery<'static, Sqlite> {
    let items = match (sort, direction) {
        (PartySort::Name, SortDirection::Asc) => items.order(clients::name.asc()),
        (PartySort::Name, SortDirection::Desc) => items.order(clients::name.desc()),
        (PartySort::Email, SortDirection::Asc) => items.order(clients::email.asc()),
        (PartySort::Email, SortDirection::Desc) => items.order(clients::email.desc()),
        (PartySort::CreatedAt, SortDirection::Asc) => items.order(clients::created_at.asc()),
        (PartySort::CreatedAt, SortDirection::Desc) => items.order(clients::created_at.desc()),
        (PartySort::UpdatedAt, SortDirection::Asc) => items.order(clients::updated_at.asc()),
        (PartySort::UpdatedAt, SortDirection::Desc) => items.order(clients::updated_at.desc()),
    };
    items.then_order_by(clients::id.asc())
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(
        &self,
        id: ClientId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;

        let client = clients::table
            .filter(clients::id.eq(id.get()))
            .filter(clients::organization_id.eq(organization_id.get()))
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(Client::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = sorted(filtered(&query), query.sort, query.direction);
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let clients = items
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let db_new_client: DbNewClient = client.into();

        let created = diesel::insert_into(clients::table)
            .values(&db_new_client)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(created)?)
    }

    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateClient::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(clients::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(updated)?)
    }

    fn delete_clients(
        &self,
        organization_id: OrganizationId,
        ids: &[ClientId],
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let deleted = diesel::delete(
            clients::table
                .filter(clients::organization_id.eq(organization_id.get()))
                .filter(clients::id.eq_any(raw_ids)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}
