use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::party::Party;
use crate::domain::types::{
    AddressId, CountryCode, NonEmptyString, OrganizationId, PostalCode, TypeConstraintError,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    #[default]
    Billing,
    Shipping,
    Other,
}

impl AddressType {
    pub const fn as_str(self) -> &'static str {
        match self {
            AddressType::Billing => "BILLING",
            AddressType::Shipping => "SHIPPING",
            AddressType::Other => "OTHER",
        }
    }
}

impl Display for AddressType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BILLING" => Ok(AddressType::Billing),
            "SHIPPING" => Ok(AddressType::Shipping),
            "OTHER" => Ok(AddressType::Other),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub organization_id: OrganizationId,
    pub owner: Party,
    pub address_type: AddressType,
    pub line1: NonEmptyString,
    pub line2: Option<String>,
    pub postal_code: PostalCode,
    pub city: NonEmptyString,
    pub country: CountryCode,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewAddress {
    pub organization_id: OrganizationId,
    pub owner: Party,
    pub address_type: AddressType,
    pub line1: NonEmptyString,
    pub line2: Option<String>,
    pub postal_code: PostalCode,
    pub city: NonEmptyString,
    pub country: CountryCode,
    pub is_default: bool,
}

#[derive(Clone, Debug)]
pub struct UpdateAddress {
    pub address_type: AddressType,
    pub line1: NonEmptyString,
    pub line2: Option<String>,
    pub postal_code: PostalCode,
    pub city: NonEmptyString,
    pub country: CountryCode,
}
