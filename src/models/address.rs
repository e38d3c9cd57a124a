use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::address::{
    Address as DomainAddress, AddressType, NewAddress as DomainNewAddress,
    UpdateAddress as DomainUpdateAddress,
};
use crate::domain::party::Party;
use crate::domain::types::{
    AddressId, CountryCode, NonEmptyString, OrganizationId, PostalCode, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::addresses)]
/// Diesel model for [`crate::domain::address::Address`].
pub struct Address {
    pub id: i32,
    pub organization_id: i32,
    pub client_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub address_type: String,
    pub line1: String,
    pub line2: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::addresses)]
pub struct NewAddress<'a> {
    pub organization_id: i32,
    pub client_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub address_type: &'a str,
    pub line1: &'a str,
    pub line2: Option<&'a str>,
    pub postal_code: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub is_default: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::addresses)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateAddress<'a> {
    pub address_type: &'a str,
    pub line1: &'a str,
    pub line2: Option<&'a str>,
    pub postal_code: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Address> for DomainAddress {
    type Error = TypeConstraintError;

    fn try_from(address: Address) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AddressId::try_from(address.id)?,
            organization_id: OrganizationId::try_from(address.organization_id)?,
            owner: Party::from_columns(address.client_id, address.supplier_id)?,
            address_type: address.address_type.parse::<AddressType>()?,
            line1: NonEmptyString::new(address.line1)?,
            line2: address.line2.filter(|s| !s.trim().is_empty()),
            postal_code: PostalCode::new(address.postal_code)?,
            city: NonEmptyString::new(address.city)?,
            country: CountryCode::new(address.country)?,
            is_default: address.is_default,
            created_at: address.created_at,
            updated_at: address.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewAddress> for NewAddress<'a> {
    fn from(address: &'a DomainNewAddress) -> Self {
        Self {
            organization_id: address.organization_id.get(),
            client_id: address.owner.client_id(),
            supplier_id: address.owner.supplier_id(),
            address_type: address.address_type.as_str(),
            line1: address.line1.as_str(),
            line2: address.line2.as_deref(),
            postal_code: address.postal_code.as_str(),
            city: address.city.as_str(),
            country: address.country.as_str(),
            is_default: address.is_default,
        }
    }
}

impl<'a> UpdateAddress<'a> {
    pub fn new(address: &'a DomainUpdateAddress, updated_at: NaiveDateTime) -> Self {
        Self {
            address_type: address.address_type.as_str(),
            line1: address.line1.as_str(),
            line2: address.line2.as_deref(),
            postal_code: address.postal_code.as_str(),
            city: address.city.as_str(),
            country: address.country.as_str(),
            updated_at,
        }
    }
}
