//! Organizations (tenants) and their legal company record.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::member::MemberRole;
use crate::domain::types::{
    CompanyId, DisplayName, Email, OrganizationId, PhoneNumber, Siren, Siret, Slug, VatNumber,
    WebsiteUrl,
};

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: DisplayName,
    pub slug: Slug,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Organization together with the role the current user holds in it.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMembership {
    #[serde(flatten)]
    pub organization: Organization,
    pub role: MemberRole,
}

#[derive(Clone, Debug)]
pub struct NewOrganization {
    pub name: DisplayName,
    pub slug: Slug,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
}

#[derive(Clone, Debug)]
pub struct UpdateOrganization {
    pub name: DisplayName,
    pub slug: Slug,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
}

/// Legal identity of an organization. At most one per organization.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub organization_id: OrganizationId,
    pub legal_name: DisplayName,
    pub siren: Option<Siren>,
    pub siret: Option<Siret>,
    pub vat_number: Option<VatNumber>,
    pub legal_form: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Values written when creating or replacing the company record.
#[derive(Clone, Debug)]
pub struct UpsertCompany {
    pub organization_id: OrganizationId,
    pub legal_name: DisplayName,
    pub siren: Option<Siren>,
    pub siret: Option<Siret>,
    pub vat_number: Option<VatNumber>,
    pub legal_form: Option<String>,
}

impl UpsertCompany {
    /// A SIRET starts with the SIREN of the same company.
    pub fn registry_numbers_match(&self) -> bool {
        match (&self.siren, &self.siret) {
            (Some(siren), Some(siret)) => siret.as_str().starts_with(siren.as_str()),
            _ => true,
        }
    }
}
