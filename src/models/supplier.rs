use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::supplier::{
    NewSupplier as DomainNewSupplier, Supplier as DomainSupplier,
    UpdateSupplier as DomainUpdateSupplier,
};
use crate::domain::types::{
    DisplayName, Email, OrganizationId, PhoneNumber, RecordStatus, SanitizedText, Siren,
    SupplierId, TypeConstraintError, VatNumber, WebsiteUrl, optional,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::suppliers)]
/// Diesel model for [`crate::domain::supplier::Supplier`].
pub struct Supplier {
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub siren: Option<String>,
    pub vat_number: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::suppliers)]
pub struct NewSupplier<'a> {
    pub organization_id: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
    pub siren: Option<&'a str>,
    pub vat_number: Option<&'a str>,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::suppliers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateSupplier<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
    pub siren: Option<&'a str>,
    pub vat_number: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Supplier> for DomainSupplier {
    type Error = TypeConstraintError;

    fn try_from(supplier: Supplier) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SupplierId::try_from(supplier.id)?,
            organization_id: OrganizationId::try_from(supplier.organization_id)?,
            name: DisplayName::new(supplier.name)?,
            email: optional(supplier.email, Email::new)?,
            phone: optional(supplier.phone, PhoneNumber::new)?,
            website: optional(supplier.website, WebsiteUrl::new)?,
            siren: optional(supplier.siren, Siren::new)?,
            vat_number: optional(supplier.vat_number, VatNumber::new)?,
            notes: optional(supplier.notes, SanitizedText::new)?,
            status: supplier.status.parse::<RecordStatus>()?,
            created_at: supplier.created_at,
            updated_at: supplier.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewSupplier> for NewSupplier<'a> {
    fn from(supplier: &'a DomainNewSupplier) -> Self {
        Self {
            organization_id: supplier.organization_id.get(),
            name: supplier.name.as_str(),
            email: supplier.email.as_ref().map(Email::as_str),
            phone: supplier.phone.as_ref().map(PhoneNumber::as_str),
            website: supplier.website.as_ref().map(WebsiteUrl::as_str),
            siren: supplier.siren.as_ref().map(Siren::as_str),
            vat_number: supplier.vat_number.as_ref().map(VatNumber::as_str),
            notes: supplier.notes.as_ref().map(SanitizedText::as_str),
        }
    }
}

impl<'a> UpdateSupplier<'a> {
    pub fn new(supplier: &'a DomainUpdateSupplier, updated_at: NaiveDateTime) -> Self {
        Self {
            name: supplier.name.as_str(),
            email: supplier.email.as_ref().map(Email::as_str),
            phone: supplier.phone.as_ref().map(PhoneNumber::as_str),
            website: supplier.website.as_ref().map(WebsiteUrl::as_str),
            siren: supplier.siren.as_ref().map(Siren::as_str),
            vat_number: supplier.vat_number.as_ref().map(VatNumber::as_str),
            notes: supplier.notes.as_ref().map(SanitizedText::as_str),
            status: supplier.status.as_str(),
            updated_at,
        }
    }
}
