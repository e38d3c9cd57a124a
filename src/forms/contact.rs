use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::{NewContact, UpdateContact};
use crate::domain::party::Party;
use crate::domain::types::{DisplayName, Email, OrganizationId, PhoneNumber, optional};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100, message = "first name must be 1 to 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last name must be 1 to 100 characters"))]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "position is limited to 100 characters"))]
    pub position: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct ContactPayload {
    pub first_name: DisplayName,
    pub last_name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
    pub is_default: bool,
}

impl TryFrom<ContactForm> for ContactPayload {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            first_name: DisplayName::new(form.first_name).map_err(FormError::field("firstName"))?,
            last_name: DisplayName::new(form.last_name).map_err(FormError::field("lastName"))?,
            email: optional(form.email, Email::new).map_err(FormError::field("email"))?,
            phone: optional(form.phone, PhoneNumber::new).map_err(FormError::field("phone"))?,
            position: non_blank(form.position),
            is_default: form.is_default,
        })
    }
}

impl ContactPayload {
    pub fn into_new(self, organization_id: OrganizationId, owner: Party) -> NewContact {
        NewContact {
            organization_id,
            owner,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            position: self.position,
            is_default: self.is_default,
        }
    }

    pub fn into_update(self) -> UpdateContact {
        UpdateContact {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_fields_are_normalized() {
        let payload = ContactPayload::try_from(ContactForm {
            first_name: "Jeanne".into(),
            last_name: "Martin".into(),
            email: Some("JEANNE@example.fr".into()),
            position: Some(" ".into()),
            ..ContactForm::default()
        })
        .unwrap();
        assert_eq!(payload.email.unwrap().as_str(), "jeanne@example.fr");
        assert!(payload.position.is_none());
    }

    #[test]
    fn bad_phone_is_reported() {
        let err = ContactPayload::try_from(ContactForm {
            first_name: "Jeanne".into(),
            last_name: "Martin".into(),
            phone: Some("call me".into()),
            ..ContactForm::default()
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("phone"));
    }
}
