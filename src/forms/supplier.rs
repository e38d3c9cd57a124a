use serde::Deserialize;
use validator::Validate;

use crate::domain::supplier::{NewSupplier, UpdateSupplier};
use crate::domain::types::{
    DisplayName, Email, OrganizationId, PhoneNumber, RecordStatus, SanitizedText, Siren,
    VatNumber, WebsiteUrl, optional,
};
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierForm {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub siren: Option<String>,
    pub vat_number: Option<String>,
    #[validate(length(max = 5000, message = "notes are limited to 5000 characters"))]
    pub notes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SupplierPayload {
    pub name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
    pub siren: Option<Siren>,
    pub vat_number: Option<VatNumber>,
    pub notes: Option<SanitizedText>,
    pub status: RecordStatus,
}

impl TryFrom<SupplierForm> for SupplierPayload {
    type Error = FormError;

    fn try_from(form: SupplierForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = match form.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().map_err(FormError::field("status"))?,
            _ => RecordStatus::default(),
        };

        Ok(Self {
            name: DisplayName::new(form.name).map_err(FormError::field("name"))?,
            email: optional(form.email, Email::new).map_err(FormError::field("email"))?,
            phone: optional(form.phone, PhoneNumber::new).map_err(FormError::field("phone"))?,
            website: optional(form.website, WebsiteUrl::new)
                .map_err(FormError::field("website"))?,
            siren: optional(form.siren, Siren::new).map_err(FormError::field("siren"))?,
            vat_number: optional(form.vat_number, VatNumber::new)
                .map_err(FormError::field("vatNumber"))?,
            notes: optional(form.notes, SanitizedText::new).map_err(FormError::field("notes"))?,
            status,
        })
    }
}

impl SupplierPayload {
    pub fn into_new(self, organization_id: OrganizationId) -> NewSupplier {
        NewSupplier {
            organization_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            website: self.website,
            siren: self.siren,
            vat_number: self.vat_number,
            notes: self.notes,
        }
    }

    pub fn into_update(self) -> UpdateSupplier {
        UpdateSupplier {
            name: self.name,
            email: self.email,
            phone: self.phone,
            website: self.website,
            siren: self.siren,
            vat_number: self.vat_number,
            notes: self.notes,
            status: self.status,
        }
    }
}
