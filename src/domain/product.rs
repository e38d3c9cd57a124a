use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::tag::Tag;
use crate::domain::types::{
    CategoryId, DisplayName, OrganizationId, ProductId, RecordStatus, SanitizedText, TagId,
};

/// VAT rates are stored in basis points (`2000` = 20 %).
pub const MAX_VAT_RATE_BPS: i32 = 10_000;
pub const DEFAULT_VAT_RATE_BPS: i32 = 2_000;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub organization_id: OrganizationId,
    pub category_id: Option<CategoryId>,
    pub name: DisplayName,
    pub reference: Option<String>,
    pub description: Option<SanitizedText>,
    pub price_cents: i64,
    pub vat_rate_bps: i32,
    pub unit: Option<String>,
    pub status: RecordStatus,
    pub tags: Vec<Tag>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub organization_id: OrganizationId,
    pub category_id: Option<CategoryId>,
    pub name: DisplayName,
    pub reference: Option<String>,
    pub description: Option<SanitizedText>,
    pub price_cents: i64,
    pub vat_rate_bps: i32,
    pub unit: Option<String>,
    pub tag_ids: Vec<TagId>,
}

#[derive(Clone, Debug)]
pub struct UpdateProduct {
    pub category_id: Option<CategoryId>,
    pub name: DisplayName,
    pub reference: Option<String>,
    pub description: Option<SanitizedText>,
    pub price_cents: i64,
    pub vat_rate_bps: i32,
    pub unit: Option<String>,
    pub status: RecordStatus,
    pub tag_ids: Vec<TagId>,
}
