use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientId, DisplayName, Email, OrganizationId, PhoneNumber, RecordStatus, SanitizedText, Siren,
    TypeConstraintError, VatNumber, WebsiteUrl,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Individual,
    #[default]
    Company,
}

impl ClientType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClientType::Individual => "INDIVIDUAL",
            ClientType::Company => "COMPANY",
        }
    }
}

impl Display for ClientType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INDIVIDUAL" => Ok(ClientType::Individual),
            "COMPANY" => Ok(ClientType::Company),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub organization_id: OrganizationId,
    pub client_type: ClientType,
    pub name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
    pub siren: Option<Siren>,
    pub vat_number: Option<VatNumber>,
    pub notes: Option<SanitizedText>,
    pub status: RecordStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewClient {
    pub organization_id: OrganizationId,
    pub client_type: ClientType,
    pub name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
    pub siren: Option<Siren>,
    pub vat_number: Option<VatNumber>,
    pub notes: Option<SanitizedText>,
}

#[derive(Clone, Debug)]
pub struct UpdateClient {
    pub client_type: ClientType,
    pub name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
    pub siren: Option<Siren>,
    pub vat_number: Option<VatNumber>,
    pub notes: Option<SanitizedText>,
    pub status: RecordStatus,
}
