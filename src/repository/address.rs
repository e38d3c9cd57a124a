//! Addresses of clients and suppliers.
//!
//! Each owner has at most one default address. Every write that can move the
//! default flag runs inside a single transaction.

use chrono::Utc;
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        address::{Address, NewAddress, UpdateAddress},
        party::Party,
        types::{AddressId, OrganizationId},
    },
    models::address::{
        Address as DbAddress, NewAddress as DbNewAddress, UpdateAddress as DbUpdateAddress,
    },
    repository::{
        AddressReader, AddressWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::addresses,
};

fn owned_by(owner: Party) -> addresses::BoxedQuery<'static, Sqlite> {
    let items = addresses::table.into_boxed();
    match owner {
        Party::Client(id) => items.filter(addresses::client_id.eq(id.get())),
        Party::Supplier(id) => items.filter(addresses::supplier_id.eq(id.get())),
    }
}

fn clear_default(conn: &mut SqliteConnection, owner: Party) -> QueryResult<usize> {
    let now = Utc::now().naive_utc();
    let changes = (addresses::is_default.eq(false), addresses::updated_at.eq(now));
    match owner {
        Party::Client(id) => diesel::update(
            addresses::table
                .filter(addresses::client_id.eq(id.get()))
                .filter(addresses::is_default.eq(true)),
        )
        .set(changes)
        .execute(conn),
        Party::Supplier(id) => diesel::update(
            addresses::table
                .filter(addresses::supplier_id.eq(id.get()))
                .filter(addresses::is_default.eq(true)),
        )
        .set(changes)
        .execute(conn),
    }
}

fn mark_default(conn: &mut SqliteConnection, id: i32) -> QueryResult<DbAddress> {
    diesel::update(addresses::table.find(id))
        .set((
            addresses::is_default.eq(true),
            addresses::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbAddress>(conn)
}

fn owner_of(row: &DbAddress) -> QueryResult<Party> {
    Party::from_columns(row.client_id, row.supplier_id)
        .map_err(|e| diesel::result::Error::DeserializationError(Box::new(e)))
}

impl AddressReader for DieselRepository {
    fn get_address_by_id(
        &self,
        id: AddressId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Address>> {
        let mut conn = self.conn()?;

        let address = addresses::table
            .filter(addresses::id.eq(id.get()))
            .filter(addresses::organization_id.eq(organization_id.get()))
            .first::<DbAddress>(&mut conn)
            .optional()?;

        address
            .map(Address::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_addresses(
        &self,
        organization_id: OrganizationId,
        owner: Party,
    ) -> RepositoryResult<Vec<Address>> {
        let mut conn = self.conn()?;

        let rows = owned_by(owner)
            .filter(addresses::organization_id.eq(organization_id.get()))
            .order((addresses::is_default.desc(), addresses::id.asc()))
            .load::<DbAddress>(&mut conn)?;

        rows.into_iter()
            .map(Address::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }
}

impl AddressWriter for DieselRepository {
    fn create_address(&self, address: &NewAddress) -> RepositoryResult<Address> {
        let mut conn = self.conn()?;

        let mut db_new_address: DbNewAddress = address.into();

        let created = conn.transaction::<DbAddress, diesel::result::Error, _>(|conn| {
            let existing: i64 = owned_by(address.owner).count().get_result(conn)?;

            db_new_address.is_default = address.is_default || existing == 0;
            if db_new_address.is_default {
                clear_default(conn, address.owner)?;
            }

            diesel::insert_into(addresses::table)
                .values(&db_new_address)
                .get_result::<DbAddress>(conn)
        })?;

        Ok(Address::try_from(created)?)
    }

    fn update_address(&self, id: AddressId, updates: &UpdateAddress) -> RepositoryResult<Address> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateAddress::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(addresses::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbAddress>(&mut conn)?;

        Ok(Address::try_from(updated)?)
    }

    fn set_default_address(&self, id: AddressId) -> RepositoryResult<Address> {
        let mut conn = self.conn()?;

        let updated = conn.transaction::<DbAddress, diesel::result::Error, _>(|conn| {
            let row = addresses::table.find(id.get()).first::<DbAddress>(conn)?;
            clear_default(conn, owner_of(&row)?)?;
            mark_default(conn, row.id)
        })?;

        Ok(Address::try_from(updated)?)
    }

    fn delete_address(&self, id: AddressId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let row = addresses::table.find(id.get()).first::<DbAddress>(conn)?;
            diesel::delete(addresses::table.find(row.id)).execute(conn)?;

            if row.is_default {
                let successor = owned_by(owner_of(&row)?)
                    .order(addresses::id.asc())
                    .select(addresses::id)
                    .first::<i32>(conn)
                    .optional()?;
                if let Some(successor) = successor {
                    mark_default(conn, successor)?;
                }
            }
            Ok(())
        })?;

        Ok(())
    }
}
