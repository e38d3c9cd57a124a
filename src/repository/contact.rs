//! Contacts of clients and suppliers, with the same single-default rule as
//! contacts.

use chrono::Utc;
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        contact::{Contact, NewContact, UpdateContact},
        party::Party,
        types::{ContactId, OrganizationId},
    },
    models::contact::{
        Contact as DbContact, NewContact as DbNewContact, UpdateContact as DbUpdateContact,
    },
    repository::{
        ContactReader, ContactWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::contacts,
};

fn owned_by(owner: Party) -> contacts::BoxedQuery<'static, Sqlite> {
    let items = contacts::table.into_boxed();
    match owner {
        Party::Client(id) => items.filter(contacts::client_id.eq(id.get())),
        Party::Supplier(id) => items.filter(contacts::supplier_id.eq(id.get())),
    }
}

fn clear_default(conn: &mut SqliteConnection, owner: Party) -> QueryResult<usize> {
    let now = Utc::now().naive_utc();
    let changes = (contacts::is_default.eq(false), contacts::updated_at.eq(now));
    match owner {
        Party::Client(id) => diesel::update(
            contacts::table
                .filter(contacts::client_id.eq(id.get()))
                .filter(contacts::is_default.eq(true)),
        )
        .set(changes)
        .execute(conn),
        Party::Supplier(id) => diesel::update(
            contacts::table
                .filter(contacts::supplier_id.eq(id.get()))
                .filter(contacts::is_default.eq(true)),
        )
        .set(changes)
        .execute(conn),
    }
}

fn mark_default(conn: &mut SqliteConnection, id: i32) -> QueryResult<DbContact> {
    diesel::update(contacts::table.find(id))
        .set((
            contacts::is_default.eq(true),
            contacts::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbContact>(conn)
}

fn owner_of(row: &DbContact) -> QueryResult<Party> {
    Party::from_columns(row.client_id, row.supplier_id)
        .map_err(|e| diesel::result::Error::DeserializationError(Box::new(e)))
}

impl ContactReader for DieselRepository {
    fn get_contact_by_id(
        &self,
        id: ContactId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Contact>> {
        let mut conn = self.conn()?;

        let contact = contacts::table
            .filter(contacts::id.eq(id.get()))
            .filter(contacts::organization_id.eq(organization_id.get()))
            .first::<DbContact>(&mut conn)
            .optional()?;

        contact
            .map(Contact::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_contacts(
        &self,
        organization_id: OrganizationId,
        owner: Party,
    ) -> RepositoryResult<Vec<Contact>> {
        let mut conn = self.conn()?;

        let rows = owned_by(owner)
            .filter(contacts::organization_id.eq(organization_id.get()))
            .order((contacts::is_default.desc(), contacts::id.asc()))
            .load::<DbContact>(&mut conn)?;

        rows.into_iter()
            .map(Contact::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }
}

impl ContactWriter for DieselRepository {
    fn create_contact(&self, contact: &NewContact) -> RepositoryResult<Contact> {
        let mut conn = self.conn()?;

        let mut db_new_contact: DbNewContact = contact.into();

        let created = conn.transaction::<DbContact, diesel::result::Error, _>(|conn| {
            let existing: i64 = owned_by(contact.owner).count().get_result(conn)?;

            db_new_contact.is_default = contact.is_default || existing == 0;
            if db_new_contact.is_default {
                clear_default(conn, contact.owner)?;
            }

            diesel::insert_into(contacts::table)
                .values(&db_new_contact)
                .get_result::<DbContact>(conn)
        })?;

        Ok(Contact::try_from(created)?)
    }

    fn update_contact(&self, id: ContactId, updates: &UpdateContact) -> RepositoryResult<Contact> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateContact::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(contacts::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbContact>(&mut conn)?;

        Ok(Contact::try_from(updated)?)
    }

    fn set_default_contact(&self, id: ContactId) -> RepositoryResult<Contact> {
        let mut conn = self.conn()?;

        let updated = conn.transaction::<DbContact, diesel::result::Error, _>(|conn| {
            let row = contacts::table.find(id.get()).first::<DbContact>(conn)?;
            clear_default(conn, owner_of(&row)?)?;
            mark_default(conn, row.id)
        })?;

        Ok(Contact::try_from(updated)?)
    }

    fn delete_contact(&self, id: ContactId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let row = contacts::table.find(id.get()).first::<DbContact>(conn)?;
            diesel::delete(contacts::table.find(row.id)).execute(conn)?;

            if row.is_default {
                let successor = owned_by(owner_of(&row)?)
                    .order(contacts::id.asc())
                    .select(contacts::id)
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
