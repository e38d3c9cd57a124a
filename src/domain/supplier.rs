use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{
    DisplayName, Email, OrganizationId, PhoneNumber, RecordStatus, SanitizedText, Siren,
    SupplierId, VatNumber, WebsiteUrl,
};

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub organization_id: OrganizationId,
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
pub struct NewSupplier {
    pub organization_id: OrganizationId,
    pub name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
    pub siren: Option<Siren>,
    pub vat_number: Option<VatNumber>,
    pub notes: Option<SanitizedText>,
}

#[derive(Clone, Debug)]
pub struct UpdateSupplier {
    pub name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
    pub siren: Option<Siren>,
    pub vat_number: Option<VatNumber>,
    pub notes: Option<SanitizedText>,
    pub status: RecordStatus,
}
