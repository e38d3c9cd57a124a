use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag};
use crate::domain::types::{DisplayName, HexColor, OrganizationId, TagId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::tags)]
/// Diesel model for [`crate::domain::tag::Tag`].
pub struct Tag {
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub color: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag<'a> {
    pub organization_id: i32,
    pub name: &'a str,
    pub color: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_tags)]
/// Row of the product/tag association table.
pub struct NewProductTag {
    pub product_id: i32,
    pub tag_id: i32,
}

impl TryFrom<Tag> for DomainTag {
    type Error = TypeConstraintError;

    fn try_from(tag: Tag) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TagId::try_from(tag.id)?,
            organization_id: OrganizationId::try_from(tag.organization_id)?,
            name: DisplayName::new(tag.name)?,
            color: HexColor::new(tag.color)?,
            created_at: tag.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewTag> for NewTag<'a> {
    fn from(tag: &'a DomainNewTag) -> Self {
        Self {
            organization_id: tag.organization_id.get(),
            name: tag.name.as_str(),
            color: tag.color.as_str(),
        }
    }
}
