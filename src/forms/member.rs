use serde::Deserialize;

use crate::domain::member::MemberRole;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
pub struct MemberRoleForm {
    pub role: String,
}

impl TryFrom<MemberRoleForm> for MemberRole {
    type Error = FormError;

    fn try_from(form: MemberRoleForm) -> Result<Self, Self::Error> {
        form.role.parse().map_err(FormError::field("role"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_parsed_case_insensitively() {
        let role = MemberRole::try_from(MemberRoleForm {
            role: "admin".into(),
        })
        .unwrap();
        assert_eq!(role, MemberRole::Admin);

        let err = MemberRole::try_from(MemberRoleForm {
            role: "superuser".into(),
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("role"));
    }
}
