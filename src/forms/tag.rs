use serde::Deserialize;
use validator::Validate;

use crate::domain::tag::NewTag;
use crate::domain::types::{DisplayName, HexColor, OrganizationId, optional};
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TagForm {
    #[validate(length(min = 1, max = 50, message = "name must be 1 to 50 characters"))]
    pub name: String,
    pub color: Option<String>,
}

impl TagForm {
    pub fn into_new(self, organization_id: OrganizationId) -> Result<NewTag, FormError> {
        self.validate()?;
        Ok(NewTag {
            organization_id,
            name: DisplayName::new(self.name).map_err(FormError::field("name"))?,
            color: optional(self.color, HexColor::new)
                .map_err(FormError::field("color"))?
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_defaults_and_is_validated() {
        let org = OrganizationId::new(1).unwrap();
        let tag = TagForm {
            name: "VIP".into(),
            color: None,
        }
        .into_new(org)
        .unwrap();
        assert_eq!(tag.color.as_str(), HexColor::DEFAULT);

        let err = TagForm {
            name: "VIP".into(),
            color: Some("red".into()),
        }
        .into_new(org)
        .unwrap_err();
        assert!(err.field_errors().contains_key("color"));
    }
}
