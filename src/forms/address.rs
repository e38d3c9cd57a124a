use serde::Deserialize;
use validator::Validate;

use crate::domain::address::{AddressType, NewAddress, UpdateAddress};
use crate::domain::party::Party;
use crate::domain::types::{CountryCode, NonEmptyString, OrganizationId, PostalCode};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub address_type: Option<String>,
    #[validate(length(min = 1, max = 200, message = "line 1 must be 1 to 200 characters"))]
    pub line1: String,
    #[validate(length(max = 200, message = "line 2 is limited to 200 characters"))]
    pub line2: Option<String>,
    #[validate(length(min = 1, max = 20, message = "postal code must be 1 to 20 characters"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100, message = "city must be 1 to 100 characters"))]
    pub city: String,
    /// ISO country code, `FR` when omitted.
    pub country: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct AddressPayload {
    pub address_type: AddressType,
    pub line1: NonEmptyString,
    pub line2: Option<String>,
    pub postal_code: PostalCode,
    pub city: NonEmptyString,
    pub country: CountryCode,
    pub is_default: bool,
}

impl TryFrom<AddressForm> for AddressPayload {
    type Error = FormError;

    fn try_from(form: AddressForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let address_type = match form.address_type.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().map_err(FormError::field("addressType"))?,
            _ => AddressType::default(),
        };
        let country = non_blank(form.country)
            .map(|raw| raw.trim().to_ascii_uppercase())
            .unwrap_or_else(|| "FR".to_string());
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FormError::rule(
                "country",
                "country must be a two-letter code",
            ));
        }

        Ok(Self {
            address_type,
            line1: NonEmptyString::new(form.line1).map_err(FormError::field("line1"))?,
            line2: non_blank(form.line2),
            postal_code: PostalCode::new(form.postal_code)
                .map_err(FormError::field("postalCode"))?,
            city: NonEmptyString::new(form.city).map_err(FormError::field("city"))?,
            country: CountryCode::new(country).map_err(FormError::field("country"))?,
            is_default: form.is_default,
        })
    }
}

impl AddressPayload {
    pub fn into_new(self, organization_id: OrganizationId, owner: Party) -> NewAddress {
        NewAddress {
            organization_id,
            owner,
            address_type: self.address_type,
            line1: self.line1,
            line2: self.line2,
            postal_code: self.postal_code,
            city: self.city,
            country: self.country,
            is_default: self.is_default,
        }
    }

    pub fn into_update(self) -> UpdateAddress {
        UpdateAddress {
            address_type: self.address_type,
            line1: self.line1,
            line2: self.line2,
            postal_code: self.postal_code,
            city: self.city,
            country: self.country,
        }
    }
}
