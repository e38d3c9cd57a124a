use serde::Deserialize;
use validator::Validate;

use crate::domain::organization::{NewOrganization, UpdateOrganization, UpsertCompany};
use crate::domain::types::{
    DisplayName, Email, OrganizationId, PhoneNumber, Siren, Siret, Slug, VatNumber, WebsiteUrl,
    optional,
};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationForm {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
    /// Derived from the name when omitted.
    #[validate(length(max = 100, message = "slug is limited to 100 characters"))]
    pub slug: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrganizationPayload {
    pub name: DisplayName,
    pub slug: Slug,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub website: Option<WebsiteUrl>,
}

impl TryFrom<OrganizationForm> for OrganizationPayload {
    type Error = FormError;

    fn try_from(form: OrganizationForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let slug = match non_blank(form.slug) {
            Some(slug) => Slug::new(slug),
            None => Slug::from_name(&form.name),
        }
        .map_err(FormError::field("slug"))?;

        Ok(Self {
            name: DisplayName::new(form.name).map_err(FormError::field("name"))?,
            slug,
            email: optional(form.email, Email::new).map_err(FormError::field("email"))?,
            phone: optional(form.phone, PhoneNumber::new).map_err(FormError::field("phone"))?,
            website: optional(form.website, WebsiteUrl::new)
                .map_err(FormError::field("website"))?,
        })
    }
}

impl OrganizationPayload {
    pub fn into_new(self) -> NewOrganization {
        NewOrganization {
            name: self.name,
            slug: self.slug,
            email: self.email,
            phone: self.phone,
            website: self.website,
        }
    }

    pub fn into_update(self) -> UpdateOrganization {
        UpdateOrganization {
            name: self.name,
            slug: self.slug,
            email: self.email,
            phone: self.phone,
            website: self.website,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Legal identity of the organization.
pub struct CompanyForm {
    #[validate(length(min = 1, max = 200, message = "legal name must be 1 to 200 characters"))]
    pub legal_name: String,
    pub siren: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    #[validate(length(max = 50, message = "legal form is limited to 50 characters"))]
    pub legal_form: Option<String>,
}

impl CompanyForm {
    pub fn into_domain(self, organization_id: OrganizationId) -> Result<UpsertCompany, FormError> {
        self.validate()?;

        let company = UpsertCompany {
            organization_id,
            legal_name: DisplayName::new(self.legal_name).map_err(FormError::field("legalName"))?,
            siren: optional(self.siren, Siren::new).map_err(FormError::field("siren"))?,
            siret: optional(self.siret, Siret::new).map_err(FormError::field("siret"))?,
            vat_number: optional(self.vat_number, VatNumber::new)
                .map_err(FormError::field("vatNumber"))?,
            legal_form: non_blank(self.legal_form),
        };

        if !company.registry_numbers_match() {
            return Err(FormError::rule("siret", "SIRET must start with the SIREN"));
        }
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_defaults_to_slugified_name() {
        let payload = OrganizationPayload::try_from(OrganizationForm {
            name: "Café Crème SARL".into(),
            ..OrganizationForm::default()
        })
        .unwrap();
        assert_eq!(payload.slug.as_str(), "cafe-creme-sarl");
    }

    #[test]
    fn explicit_slug_must_be_valid() {
        let err = OrganizationPayload::try_from(OrganizationForm {
            name: "Acme".into(),
            slug: Some("Not A Slug".into()),
            ..OrganizationForm::default()
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("slug"));
    }

    #[test]
    fn company_siret_must_match_siren() {
        let org = OrganizationId::new(1).unwrap();
        let form = CompanyForm {
            legal_name: "Acme SAS".into(),
            siren: Some("123456789".into()),
            siret: Some("73282932000074".into()),
            ..CompanyForm::default()
        };
        let err = form.into_domain(org).unwrap_err();
        assert!(err.field_errors().contains_key("siret"));

        let form = CompanyForm {
            legal_name: "Acme SAS".into(),
            siren: Some("732829320".into()),
            siret: Some("73282932000074".into()),
            legal_form: Some("  ".into()),
            ..CompanyForm::default()
        };
        let company = form.into_domain(org).unwrap();
        assert!(company.legal_form.is_none());
    }
}
