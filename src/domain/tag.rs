use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{DisplayName, HexColor, OrganizationId, TagId};

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub organization_id: OrganizationId,
    pub name: DisplayName,
    pub color: HexColor,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewTag {
    pub organization_id: OrganizationId,
    pub name: DisplayName,
    pub color: HexColor,
}
