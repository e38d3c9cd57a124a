use serde::Deserialize;
use validator::Validate;

use crate::domain::category::{NewProductCategory, UpdateProductCategory};
use crate::domain::types::{CategoryId, DisplayName, OrganizationId, SanitizedText, Slug, optional};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "slug is limited to 100 characters"))]
    pub slug: Option<String>,
    pub parent_id: Option<i32>,
    #[validate(length(max = 2000, message = "description is limited to 2000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryPayload {
    pub parent_id: Option<CategoryId>,
    pub name: DisplayName,
    pub slug: Slug,
    pub description: Option<SanitizedText>,
}

impl TryFrom<CategoryForm> for CategoryPayload {
    type Error = FormError;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let slug = match non_blank(form.slug) {
            Some(slug) => Slug::new(slug),
            None => Slug::from_name(&form.name),
        }
        .map_err(FormError::field("slug"))?;

        Ok(Self {
            parent_id: form
                .parent_id
                .map(CategoryId::new)
                .transpose()
                .map_err(FormError::field("parentId"))?,
            name: DisplayName::new(form.name).map_err(FormError::field("name"))?,
            slug,
            description: optional(form.description, SanitizedText::new)
                .map_err(FormError::field("description"))?,
        })
    }
}

impl CategoryPayload {
    pub fn into_new(self, organization_id: OrganizationId) -> NewProductCategory {
        NewProductCategory {
            organization_id,
            parent_id: self.parent_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
        }
    }

    pub fn into_update(self) -> UpdateProductCategory {
        UpdateProductCategory {
            parent_id: self.parent_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_derived_from_name() {
        let payload = CategoryPayload::try_from(CategoryForm {
            name: "Fruits & Légumes".into(),
            ..CategoryForm::default()
        })
        .unwrap();
        assert_eq!(payload.slug.as_str(), "fruits-legumes");
        assert!(payload.parent_id.is_none());
    }

    #[test]
    fn non_positive_parent_is_rejected() {
        let err = CategoryPayload::try_from(CategoryForm {
            name: "Fruit".into(),
            parent_id: Some(0),
            ..CategoryForm::default()
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("parentId"));
    }

    #[test]
    fn name_without_slug_characters_needs_explicit_slug() {
        let err = CategoryPayload::try_from(CategoryForm {
            name: "€€€".into(),
            ..CategoryForm::default()
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("slug"));
    }
}
