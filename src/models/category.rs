use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    NewProductCategory as DomainNewCategory, ProductCategory as DomainCategory,
    UpdateProductCategory as DomainUpdateCategory,
};
use crate::domain::types::{
    CategoryId, DisplayName, OrganizationId, SanitizedText, Slug, TypeConstraintError, optional,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::product_categories)]
/// Diesel model for [`crate::domain::category::ProductCategory`].
pub struct ProductCategory {
    pub id: i32,
    pub organization_id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_categories)]
pub struct NewProductCategory<'a> {
    pub organization_id: i32,
    pub parent_id: Option<i32>,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::product_categories)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProductCategory<'a> {
    pub parent_id: Option<i32>,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ProductCategory> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: ProductCategory) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::try_from(category.id)?,
            organization_id: OrganizationId::try_from(category.organization_id)?,
            parent_id: category.parent_id.map(CategoryId::try_from).transpose()?,
            name: DisplayName::new(category.name)?,
            slug: Slug::new(category.slug)?,
            description: optional(category.description, SanitizedText::new)?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCategory> for NewProductCategory<'a> {
    fn from(category: &'a DomainNewCategory) -> Self {
        Self {
            organization_id: category.organization_id.get(),
            parent_id: category.parent_id.map(CategoryId::get),
            name: category.name.as_str(),
            slug: category.slug.as_str(),
            description: category.description.as_ref().map(SanitizedText::as_str),
        }
    }
}

impl<'a> UpdateProductCategory<'a> {
    pub fn new(category: &'a DomainUpdateCategory, updated_at: NaiveDateTime) -> Self {
        Self {
            parent_id: category.parent_id.map(CategoryId::get),
            name: category.name.as_str(),
            slug: category.slug.as_str(),
            description: category.description.as_ref().map(SanitizedText::as_str),
            updated_at,
        }
    }
}
