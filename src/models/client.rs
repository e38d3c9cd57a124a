use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, ClientType, NewClient as DomainNewClient,
    UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    ClientId, DisplayName, Email, OrganizationId, PhoneNumber, RecordStatus, SanitizedText, Siren,
    TypeConstraintError, VatNumber, WebsiteUrl, optional,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub organization_id: i32,
    pub client_type: String,
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
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub organization_id: i32,
    pub client_type: &'a str,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
    pub siren: Option<&'a str>,
    pub vat_number: Option<&'a str>,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub client_type: &'a str,
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

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::try_from(client.id)?,
            organization_id: OrganizationId::try_from(client.organization_id)?,
            client_type: client.client_type.parse::<ClientType>()?,
            name: DisplayName::new(client.name)?,
            email: optional(client.email, Email::new)?,
            phone: optional(client.phone, PhoneNumber::new)?,
            website: optional(client.website, WebsiteUrl::new)?,
            siren: optional(client.siren, Siren::new)?,
            vat_number: optional(client.vat_number, VatNumber::new)?,
            notes: optional(client.notes, SanitizedText::new)?,
            status: client.status.parse::<RecordStatus>()?,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            organization_id: client.organization_id.get(),
            client_type: client.client_type.as_str(),
            name: client.name.as_str(),
            email: client.email.as_ref().map(Email::as_str),
            phone: client.phone.as_ref().map(PhoneNumber::as_str),
            website: client.website.as_ref().map(WebsiteUrl::as_str),
            siren: client.siren.as_ref().map(Siren::as_str),
            vat_number: client.vat_number.as_ref().map(VatNumber::as_str),
            notes: client.notes.as_ref().map(SanitizedText::as_str),
        }
    }
}

impl<'a> UpdateClient<'a> {
    pub fn new(client: &'a DomainUpdateClient, updated_at: NaiveDateTime) -> Self {
        Self {
            client_type: client.client_type.as_str(),
            name: client.name.as_str(),
            email: client.email.as_ref().map(Email::as_str),
            phone: client.phone.as_ref().map(PhoneNumber::as_str),
            website: client.website.as_ref().map(WebsiteUrl::as_str),
            siren: client.siren.as_ref().map(Siren::as_str),
            vat_number: client.vat_number.as_ref().map(VatNumber::as_str),
            notes: client.notes.as_ref().map(SanitizedText::as_str),
            status: client.status.as_str(),
            updated_at,
        }
    }
}
