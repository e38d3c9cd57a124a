//! Diesel models for organizations and their company record.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::organization::{
    Company as DomainCompany, NewOrganization as DomainNewOrganization,
    Organization as DomainOrganization, UpdateOrganization as DomainUpdateOrganization,
    UpsertCompany as DomainUpsertCompany,
};
use crate::domain::types::{
    CompanyId, DisplayName, Email, OrganizationId, PhoneNumber, Siren, Siret, Slug,
    TypeConstraintError, VatNumber, WebsiteUrl, optional,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::organizations)]
/// Diesel model for [`crate::domain::organization::Organization`].
pub struct Organization {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::organizations)]
/// Insertable form of [`Organization`].
pub struct NewOrganization<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::organizations)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating an [`Organization`] record.
pub struct UpdateOrganization<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::companies)]
/// Diesel model for [`crate::domain::organization::Company`].
pub struct Company {
    pub id: i32,
    pub organization_id: i32,
    pub legal_name: String,
    pub siren: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub legal_form: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(treat_none_as_null = true)]
/// Values written by the company upsert.
pub struct UpsertCompany<'a> {
    pub organization_id: i32,
    pub legal_name: &'a str,
    pub siren: Option<&'a str>,
    pub siret: Option<&'a str>,
    pub vat_number: Option<&'a str>,
    pub legal_form: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Organization> for DomainOrganization {
    type Error = TypeConstraintError;

    fn try_from(organization: Organization) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrganizationId::try_from(organization.id)?,
            name: DisplayName::new(organization.name)?,
            slug: Slug::new(organization.slug)?,
            email: optional(organization.email, Email::new)?,
            phone: optional(organization.phone, PhoneNumber::new)?,
            website: optional(organization.website, WebsiteUrl::new)?,
            created_at: organization.created_at,
            updated_at: organization.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewOrganization> for NewOrganization<'a> {
    fn from(organization: &'a DomainNewOrganization) -> Self {
        Self {
            name: organization.name.as_str(),
            slug: organization.slug.as_str(),
            email: organization.email.as_ref().map(Email::as_str),
            phone: organization.phone.as_ref().map(PhoneNumber::as_str),
            website: organization.website.as_ref().map(WebsiteUrl::as_str),
        }
    }
}

impl<'a> UpdateOrganization<'a> {
    pub fn new(organization: &'a DomainUpdateOrganization, updated_at: NaiveDateTime) -> Self {
        Self {
            name: organization.name.as_str(),
            slug: organization.slug.as_str(),
            email: organization.email.as_ref().map(Email::as_str),
            phone: organization.phone.as_ref().map(PhoneNumber::as_str),
            website: organization.website.as_ref().map(WebsiteUrl::as_str),
            updated_at,
        }
    }
}

impl TryFrom<Company> for DomainCompany {
    type Error = TypeConstraintError;

    fn try_from(company: Company) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CompanyId::try_from(company.id)?,
            organization_id: OrganizationId::try_from(company.organization_id)?,
            legal_name: DisplayName::new(company.legal_name)?,
            siren: optional(company.siren, Siren::new)?,
            siret: optional(company.siret, Siret::new)?,
            vat_number: optional(company.vat_number, VatNumber::new)?,
            legal_form: company.legal_form.filter(|s| !s.trim().is_empty()),
            created_at: company.created_at,
            updated_at: company.updated_at,
        })
    }
}

impl<'a> UpsertCompany<'a> {
    pub fn new(company: &'a DomainUpsertCompany, updated_at: NaiveDateTime) -> Self {
        Self {
            organization_id: company.organization_id.get(),
            legal_name: company.legal_name.as_str(),
            siren: company.siren.as_ref().map(Siren::as_str),
            siret: company.siret.as_ref().map(Siret::as_str),
            vat_number: company.vat_number.as_ref().map(VatNumber::as_str),
            legal_form: company.legal_form.as_deref(),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn organization_into_domain_normalizes_optional_fields() {
        let now = Utc::now().naive_utc();
        let row = Organization {
            id: 3,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            email: Some("Hello@Acme.test".to_string()),
            phone: Some(String::new()),
            website: None,
            created_at: now,
            updated_at: now,
        };

        let organization = DomainOrganization::try_from(row).unwrap();
        assert_eq!(organization.id.get(), 3);
        assert_eq!(organization.email.unwrap().as_str(), "hello@acme.test");
        assert!(organization.phone.is_none());
    }

    #[test]
    fn organization_with_invalid_slug_is_rejected() {
        let now = Utc::now().naive_utc();
        let row = Organization {
            id: 3,
            name: "Acme".to_string(),
            slug: "Not A Slug".to_string(),
            email: None,
            phone: None,
            website: None,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(
            DomainOrganization::try_from(row),
            Err(TypeConstraintError::InvalidSlug)
        );
    }
}
