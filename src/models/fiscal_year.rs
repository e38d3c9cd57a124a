use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::fiscal_year::{
    FiscalPeriod, FiscalYear as DomainFiscalYear, NewFiscalYear as DomainNewFiscalYear,
    UpdateFiscalYear as DomainUpdateFiscalYear,
};
use crate::domain::types::{DisplayName, FiscalYearId, OrganizationId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::fiscal_years)]
/// Diesel model for [`crate::domain::fiscal_year::FiscalYear`].
pub struct FiscalYear {
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::fiscal_years)]
pub struct NewFiscalYear<'a> {
    pub organization_id: i32,
    pub name: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::fiscal_years)]
pub struct UpdateFiscalYear<'a> {
    pub name: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<FiscalYear> for DomainFiscalYear {
    type Error = TypeConstraintError;

    fn try_from(fiscal_year: FiscalYear) -> Result<Self, Self::Error> {
        Ok(Self {
            id: FiscalYearId::try_from(fiscal_year.id)?,
            organization_id: OrganizationId::try_from(fiscal_year.organization_id)?,
            name: DisplayName::new(fiscal_year.name)?,
            period: FiscalPeriod::new(fiscal_year.start_date, fiscal_year.end_date)?,
            is_current: fiscal_year.is_current,
            created_at: fiscal_year.created_at,
            updated_at: fiscal_year.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewFiscalYear> for NewFiscalYear<'a> {
    fn from(fiscal_year: &'a DomainNewFiscalYear) -> Self {
        Self {
            organization_id: fiscal_year.organization_id.get(),
            name: fiscal_year.name.as_str(),
            start_date: fiscal_year.period.start_date(),
            end_date: fiscal_year.period.end_date(),
            is_current: fiscal_year.is_current,
        }
    }
}

impl<'a> UpdateFiscalYear<'a> {
    pub fn new(fiscal_year: &'a DomainUpdateFiscalYear, updated_at: NaiveDateTime) -> Self {
        Self {
            name: fiscal_year.name.as_str(),
            start_date: fiscal_year.period.start_date(),
            end_date: fiscal_year.period.end_date(),
            updated_at,
        }
    }
}
