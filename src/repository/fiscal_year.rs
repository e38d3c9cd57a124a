use chrono::Utc;
use diesel::sqlite::SqliteConnection;
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        fiscal_year::{FiscalYear, NewFiscalYear, UpdateFiscalYear},
        types::{FiscalYearId, OrganizationId},
    },
    models::fiscal_year::{
        FiscalYear as DbFiscalYear, NewFiscalYear as DbNewFiscalYear,
        UpdateFiscalYear as DbUpdateFiscalYear,
    },
    repository::{
        DieselRepository, FiscalYearReader, FiscalYearWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::fiscal_years,
};

/// At most one current fiscal year per organization.
fn clear_current(conn: &mut SqliteConnection, organization_id: i32) -> QueryResult<usize> {
    diesel::update(
        fiscal_years::table
            .filter(fiscal_years::organization_id.eq(organization_id))
            .filter(fiscal_years::is_current.eq(true)),
    )
    .set((
        fiscal_years::is_current.eq(false),
        fiscal_years::updated_at.eq(Utc::now().naive_utc()),
    ))
    .execute(conn)
}

impl FiscalYearReader for DieselRepository {
    fn get_fiscal_year_by_id(
        &self,
        id: FiscalYearId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<FiscalYear>> {
        let mut conn = self.conn()?;

        let fiscal_year = fiscal_years::table
            .filter(fiscal_years::id.eq(id.get()))
            .filter(fiscal_years::organization_id.eq(organization_id.get()))
            .first::<DbFiscalYear>(&mut conn)
            .optional()?;

        fiscal_year
            .map(FiscalYear::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_fiscal_years(
        &self,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Vec<FiscalYear>> {
        let mut conn = self.conn()?;

        let rows = fiscal_years::table
            .filter(fiscal_years::organization_id.eq(organization_id.get()))
            .order((fiscal_years::start_date.desc(), fiscal_years::id.desc()))
            .load::<DbFiscalYear>(&mut conn)?;

        rows.into_iter()
            .map(FiscalYear::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }
}

impl FiscalYearWriter for DieselRepository {
    fn create_fiscal_year(&self, fiscal_year: &NewFiscalYear) -> RepositoryResult<FiscalYear> {
        let mut conn = self.conn()?;

        let db_new_fiscal_year: DbNewFiscalYear = fiscal_year.into();

        let created = conn.transaction::<DbFiscalYear, diesel::result::Error, _>(|conn| {
            if db_new_fiscal_year.is_current {
                clear_current(conn, db_new_fiscal_year.organization_id)?;
            }
            diesel::insert_into(fiscal_years::table)
                .values(&db_new_fiscal_year)
                .get_result::<DbFiscalYear>(conn)
        })?;

        Ok(FiscalYear::try_from(created)?)
    }

    fn update_fiscal_year(
        &self,
        id: FiscalYearId,
        updates: &UpdateFiscalYear,
    ) -> RepositoryResult<FiscalYear> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateFiscalYear::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(fiscal_years::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbFiscalYear>(&mut conn)?;

        Ok(FiscalYear::try_from(updated)?)
    }

    fn set_current_fiscal_year(&self, id: FiscalYearId) -> RepositoryResult<FiscalYear> {
        let mut conn = self.conn()?;

        let updated = conn.transaction::<DbFiscalYear, diesel::result::Error, _>(|conn| {
            let row = fiscal_years::table
                .find(id.get())
                .first::<DbFiscalYear>(conn)?;
            clear_current(conn, row.organization_id)?;
            diesel::update(fiscal_years::table.find(row.id))
                .set((
                    fiscal_years::is_current.eq(true),
                    fiscal_years::updated_at.eq(Utc::now().naive_utc()),
                ))
                .get_result::<DbFiscalYear>(conn)
        })?;

        Ok(FiscalYear::try_from(updated)?)
    }

    fn delete_fiscal_year(&self, id: FiscalYearId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(fiscal_years::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
