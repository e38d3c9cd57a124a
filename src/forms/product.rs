use serde::Deserialize;
use validator::Validate;

use crate::domain::product::{DEFAULT_VAT_RATE_BPS, MAX_VAT_RATE_BPS, NewProduct, UpdateProduct};
use crate::domain::types::{
    CategoryId, DisplayName, OrganizationId, RecordStatus, SanitizedText, TagId, optional,
};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(length(max = 50, message = "reference is limited to 50 characters"))]
    pub reference: Option<String>,
    #[validate(length(max = 5000, message = "description is limited to 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price_cents: i64,
    /// Basis points, 20 % when omitted.
    pub vat_rate_bps: Option<i32>,
    #[validate(length(max = 20, message = "unit is limited to 20 characters"))]
    pub unit: Option<String>,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProductPayload {
    pub category_id: Option<CategoryId>,
    pub name: DisplayName,
    pub reference: Option<String>,
    pub description: Option<SanitizedText>,
    pub price_cents: i64,
    pub vat_rate_bps: i32,
    pub unit: Option<String>,
    pub status: RecordStatus,
    /// Deduplicated, in submission order.
    pub tag_ids: Vec<TagId>,
}

impl TryFrom<ProductForm> for ProductPayload {
    type Error = FormError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = match form.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().map_err(FormError::field("status"))?,
            _ => RecordStatus::default(),
        };
        let vat_rate_bps = form.vat_rate_bps.unwrap_or(DEFAULT_VAT_RATE_BPS);
        if !(0..=MAX_VAT_RATE_BPS).contains(&vat_rate_bps) {
            return Err(FormError::rule(
                "vatRateBps",
                format!("VAT rate must be between 0 and {MAX_VAT_RATE_BPS} basis points"),
            ));
        }

        let mut tag_ids: Vec<TagId> = Vec::with_capacity(form.tag_ids.len());
        for raw in form.tag_ids {
            let id = TagId::new(raw).map_err(FormError::field("tagIds"))?;
            if !tag_ids.contains(&id) {
                tag_ids.push(id);
            }
        }

        Ok(Self {
            category_id: form
                .category_id
                .map(CategoryId::new)
                .transpose()
                .map_err(FormError::field("categoryId"))?,
            name: DisplayName::new(form.name).map_err(FormError::field("name"))?,
            reference: non_blank(form.reference),
            description: optional(form.description, SanitizedText::new)
                .map_err(FormError::field("description"))?,
            price_cents: form.price_cents,
            vat_rate_bps,
            unit: non_blank(form.unit),
            status,
            tag_ids,
        })
    }
}

impl ProductPayload {
    pub fn into_new(self, organization_id: OrganizationId) -> NewProduct {
        NewProduct {
            organization_id,
            category_id: self.category_id,
            name: self.name,
            reference: self.reference,
            description: self.description,
            price_cents: self.price_cents,
            vat_rate_bps: self.vat_rate_bps,
            unit: self.unit,
            tag_ids: self.tag_ids,
        }
    }

    pub fn into_update(self) -> UpdateProduct {
        UpdateProduct {
            category_id: self.category_id,
            name: self.name,
            reference: self.reference,
            description: self.description,
            price_cents: self.price_cents,
            vat_rate_bps: self.vat_rate_bps,
            unit: self.unit,
            status: self.status,
            tag_ids: self.tag_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Espresso".into(),
            price_cents: 250,
            ..ProductForm::default()
        }
    }

    #[test]
    fn vat_defaults_and_tags_are_deduplicated() {
        let payload = ProductPayload::try_from(ProductForm {
            tag_ids: vec![3, 1, 3],
            ..form()
        })
        .unwrap();
        assert_eq!(payload.vat_rate_bps, DEFAULT_VAT_RATE_BPS);
        let ids: Vec<i32> = payload.tag_ids.iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn price_and_vat_bounds_are_enforced() {
        let err = ProductPayload::try_from(ProductForm {
            price_cents: -1,
            ..form()
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("priceCents"));

        let err = ProductPayload::try_from(ProductForm {
            vat_rate_bps: Some(10_001),
            ..form()
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("vatRateBps"));
    }
}
