use serde::Deserialize;
use validator::Validate;

use crate::domain::member::MemberRole;
use crate::domain::types::Email;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct InvitationForm {
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug)]
pub struct InvitationPayload {
    pub email: Email,
    pub role: MemberRole,
}

impl TryFrom<InvitationForm> for InvitationPayload {
    type Error = FormError;

    fn try_from(form: InvitationForm) -> Result<Self, Self::Error> {
        let form = InvitationForm {
            email: form.email.trim().to_string(),
            role: form.role,
        };
        form.validate()?;

        let role = match form.role.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().map_err(FormError::field("role"))?,
            _ => MemberRole::Member,
        };

        Ok(Self {
            email: Email::new(form.email).map_err(FormError::field("email"))?,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_member() {
        let payload = InvitationPayload::try_from(InvitationForm {
            email: " New@Example.com ".into(),
            role: None,
        })
        .unwrap();
        assert_eq!(payload.role, MemberRole::Member);
        assert_eq!(payload.email.as_str(), "new@example.com");
    }

    #[test]
    fn invalid_email_is_reported() {
        let err = InvitationPayload::try_from(InvitationForm {
            email: "nobody".into(),
            role: Some("ADMIN".into()),
        })
        .unwrap_err();
        assert_eq!(
            err.field_errors().get("email"),
            Some(&vec!["a valid email address is required".to_string()])
        );
    }
}
