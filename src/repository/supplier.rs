use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        supplier::{NewSupplier, Supplier, UpdateSupplier},
        types::{OrganizationId, SupplierId},
    },
    models::supplier::{
        NewSupplier as DbNewSupplier, Supplier as DbSupplier, UpdateSupplier as DbUpdateSupplier,
    },
    repository::{
        DieselRepository, PartySort, SortDirection, SupplierListQuery, SupplierReader,
        SupplierWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::suppliers,
};

/// Builds the filtered (unsorted, unpaginated) supplier query.
fn filtered(query: &SupplierListQuery) -> suppliers::BoxedQuery<'static, Sqlite> {
    let mut items = suppliers::table
        .filter(suppliers::organization_id.eq(query.organization_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref() {
        let pattern = format!("%{term}%");
        items = items.filter(
            suppliers::name
                .like(pattern.clone())
                .or(suppliers::email.like(pattern.clone()))
                .or(suppliers::phone.like(pattern.clone()))
                .or(suppliers::siren.like(pattern)),
        );
    }

    if let Some(status) = query.status {
        items = items.filter(suppliers::status.eq(status.as_str()));
    }

    items
}

fn sorted(
    items: suppliers::BoxedQuery<'static, Sqlite>,
    sort: PartySort,
    direction: SortDirection,
) -> suppliers::BoxedQuery<'static, Sqlite> {
    let items = match (sort, direction) {
        (PartySort::Name, SortDirection::Asc) => items.order(suppliers::name.asc()),
        (PartySort::Name, SortDirection::Desc) => items.order(suppliers::name.desc()),
        (PartySort::Email, SortDirection::Asc) => items.order(suppliers::email.asc()),
        (PartySort::Email, SortDirection::Desc) => items.order(suppliers::email.desc()),
        (PartySort::CreatedAt, SortDirection::Asc) => items.order(suppliers::created_at.asc()),
        (PartySort::CreatedAt, SortDirection::Desc) => items.order(suppliers::created_at.desc()),
        (PartySort::UpdatedAt, SortDirection::Asc) => items.order(suppliers::updated_at.asc()),
        (PartySort::UpdatedAt, SortDirection::Desc) => items.order(suppliers::updated_at.desc()),
    };
    items.then_order_by(suppliers::id.asc())
}

impl SupplierReader for DieselRepository {
    fn get_supplier_by_id(
        &self,
        id: SupplierId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Supplier>> {
        let mut conn = self.conn()?;

        let supplier = suppliers::table
            .filter(suppliers::id.eq(id.get()))
            .filter(suppliers::organization_id.eq(organization_id.get()))
            .first::<DbSupplier>(&mut conn)
            .optional()?;

        supplier
            .map(Supplier::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = sorted(filtered(&query), query.sort, query.direction);
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let suppliers = items
            .load::<DbSupplier>(&mut conn)?
            .into_iter()
            .map(Supplier::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, suppliers))
    }
}

impl SupplierWriter for DieselRepository {
    fn create_supplier(&self, supplier: &NewSupplier) -> RepositoryResult<Supplier> {
        let mut conn = self.conn()?;

        let db_new_supplier: DbNewSupplier = supplier.into();

        let created = diesel::insert_into(suppliers::table)
            .values(&db_new_supplier)
            .get_result::<DbSupplier>(&mut conn)?;

        Ok(Supplier::try_from(created)?)
    }

    fn update_supplier(
        &self,
        id: SupplierId,
        updates: &UpdateSupplier,
    ) -> RepositoryResult<Supplier> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateSupplier::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(suppliers::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbSupplier>(&mut conn)?;

        Ok(Supplier::try_from(updated)?)
    }

    fn delete_suppliers(
        &self,
        organization_id: OrganizationId,
        ids: &[SupplierId],
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let deleted = diesel::delete(
            suppliers::table
                .filter(suppliers::organization_id.eq(organization_id.get()))
                .filter(suppliers::id.eq_any(raw_ids)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}
