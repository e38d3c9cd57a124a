use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::contact::{
    Contact as DomainContact, NewContact as DomainNewContact, UpdateContact as DomainUpdateContact,
};
use crate::domain::party::Party;
use crate::domain::types::{
    ContactId, DisplayName, Email, OrganizationId, PhoneNumber, TypeConstraintError, optional,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::contacts)]
/// Diesel model for [`crate::domain::contact::Contact`].
pub struct Contact {
    pub id: i32,
    pub organization_id: i32,
    pub client_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
pub struct NewContact<'a> {
    pub organization_id: i32,
    pub client_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
    pub is_default: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateContact<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Contact> for DomainContact {
    type Error = TypeConstraintError;

    fn try_from(contact: Contact) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContactId::try_from(contact.id)?,
            organization_id: OrganizationId::try_from(contact.organization_id)?,
            owner: Party::from_columns(contact.client_id, contact.supplier_id)?,
            first_name: DisplayName::new(contact.first_name)?,
            last_name: DisplayName::new(contact.last_name)?,
            email: optional(contact.email, Email::new)?,
            phone: optional(contact.phone, PhoneNumber::new)?,
            position: contact.position.filter(|s| !s.trim().is_empty()),
            is_default: contact.is_default,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewContact> for NewContact<'a> {
    fn from(contact: &'a DomainNewContact) -> Self {
        Self {
            organization_id: contact.organization_id.get(),
            client_id: contact.owner.client_id(),
            supplier_id: contact.owner.supplier_id(),
            first_name: contact.first_name.as_str(),
            last_name: contact.last_name.as_str(),
            email: contact.email.as_ref().map(Email::as_str),
            phone: contact.phone.as_ref().map(PhoneNumber::as_str),
            position: contact.position.as_deref(),
            is_default: contact.is_default,
        }
    }
}

impl<'a> UpdateContact<'a> {
    pub fn new(contact: &'a DomainUpdateContact, updated_at: NaiveDateTime) -> Self {
        Self {
            first_name: contact.first_name.as_str(),
            last_name: contact.last_name.as_str(),
            email: contact.email.as_ref().map(Email::as_str),
            phone: contact.phone.as_ref().map(PhoneNumber::as_str),
            position: contact.position.as_deref(),
            updated_at,
        }
    }
}
