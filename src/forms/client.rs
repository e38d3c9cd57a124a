use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{ClientType, NewClient, UpdateClient};
use crate::domain::types::{
    DisplayName, Email, OrganizationId, PhoneNumber, RecordStatus, SanitizedText, Siren,
    VatNumber, WebsiteUrl, optional,
};
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of client create and update requests.
pub struct ClientForm {
    #[serde(default)]
    pub client_type: Option<String>,
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub siren: Option<String>,
    pub vat_number: Option<String>,
    #[validate(length(max = 5000, message = "notes are limited to 5000 characters"))]
    pub notes: Option<String>,
    /// Ignored on creation.
    pub status: Option<String>,
}

/// Typed client values shared by creation and update.
#[derive(Debug, Clone)]
pub struct ClientPayload {
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

impl TryFrom<ClientForm> for ClientPayload {
    type Error = FormError;

    fn try_from(form: ClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let client_type = match form.client_type.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().map_err(FormError::field("clientType"))?,
            _ => ClientType::default(),
        };
        let status = match form.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().map_err(FormError::field("status"))?,
            _ => RecordStatus::default(),
        };

        Ok(Self {
            client_type,
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

impl ClientPayload {
    pub fn into_new(self, organization_id: OrganizationId) -> NewClient {
        NewClient {
            organization_id,
            client_type: self.client_type,
            name: self.name,
            email: self.email,
            phone: self.phone,
            website: self.website,
            siren: self.siren,
            vat_number: self.vat_number,
            notes: self.notes,
        }
    }

    pub fn into_update(self) -> UpdateClient {
        UpdateClient {
            client_type: self.client_type,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str) -> ClientForm {
        ClientForm {
            name: name.to_string(),
            ..ClientForm::default()
        }
    }

    #[test]
    fn minimal_form_uses_defaults() {
        let payload = ClientPayload::try_from(form("Acme")).unwrap();
        assert_eq!(payload.client_type, ClientType::Company);
        assert_eq!(payload.status, RecordStatus::Active);
        assert!(payload.email.is_none());
    }

    #[test]
    fn blank_optionals_are_dropped_and_values_normalized() {
        let payload = ClientPayload::try_from(ClientForm {
            client_type: Some("individual".into()),
            email: Some(" Bob@Example.COM ".into()),
            website: Some("   ".into()),
            notes: Some("<script>x</script>Call <b>Monday</b>".into()),
            ..form("Bob")
        })
        .unwrap();

        assert_eq!(payload.client_type, ClientType::Individual);
        assert_eq!(payload.email.unwrap().as_str(), "bob@example.com");
        assert!(payload.website.is_none());
        assert!(!payload.notes.unwrap().as_str().contains("script"));
    }

    #[test]
    fn invalid_fields_are_reported_by_name() {
        let err = ClientPayload::try_from(ClientForm {
            siren: Some("12".into()),
            ..form("Acme")
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("siren"));

        let err = ClientPayload::try_from(form("")).unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }
}
