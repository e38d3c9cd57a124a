use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};
use crate::domain::tag::Tag as DomainTag;
use crate::domain::types::{
    CategoryId, DisplayName, OrganizationId, ProductId, RecordStatus, SanitizedText,
    TypeConstraintError, optional,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
/// Diesel model for [`crate::domain::product::Product`].
pub struct Product {
    pub id: i32,
    pub organization_id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    pub vat_rate_bps: i32,
    pub unit: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub organization_id: i32,
    pub category_id: Option<i32>,
    pub name: &'a str,
    pub reference: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub vat_rate_bps: i32,
    pub unit: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub category_id: Option<i32>,
    pub name: &'a str,
    pub reference: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub vat_rate_bps: i32,
    pub unit: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Converts the row into a domain product carrying the given tags.
    pub fn into_domain(self, tags: Vec<DomainTag>) -> Result<DomainProduct, TypeConstraintError> {
        Ok(DomainProduct {
            id: ProductId::try_from(self.id)?,
            organization_id: OrganizationId::try_from(self.organization_id)?,
            category_id: self.category_id.map(CategoryId::try_from).transpose()?,
            name: DisplayName::new(self.name)?,
            reference: self.reference.filter(|s| !s.trim().is_empty()),
            description: optional(self.description, SanitizedText::new)?,
            price_cents: self.price_cents,
            vat_rate_bps: self.vat_rate_bps,
            unit: self.unit.filter(|s| !s.trim().is_empty()),
            status: self.status.parse::<RecordStatus>()?,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        Self {
            organization_id: product.organization_id.get(),
            category_id: product.category_id.map(CategoryId::get),
            name: product.name.as_str(),
            reference: product.reference.as_deref(),
            description: product.description.as_ref().map(SanitizedText::as_str),
            price_cents: product.price_cents,
            vat_rate_bps: product.vat_rate_bps,
            unit: product.unit.as_deref(),
        }
    }
}

impl<'a> UpdateProduct<'a> {
    pub fn new(product: &'a DomainUpdateProduct, updated_at: NaiveDateTime) -> Self {
        Self {
            category_id: product.category_id.map(CategoryId::get),
            name: product.name.as_str(),
            reference: product.reference.as_deref(),
            description: product.description.as_ref().map(SanitizedText::as_str),
            price_cents: product.price_cents,
            vat_rate_bps: product.vat_rate_bps,
            unit: product.unit.as_deref(),
            status: product.status.as_str(),
            updated_at,
        }
    }
}
