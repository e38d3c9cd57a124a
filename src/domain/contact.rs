use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::party::Party;
use crate::domain::types::{ContactId, DisplayName, Email, OrganizationId, PhoneNumber};

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub organization_id: OrganizationId,
    pub owner: Party,
    pub first_name: DisplayName,
    pub last_name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewContact {
    pub organization_id: OrganizationId,
    pub owner: Party,
    pub first_name: DisplayName,
    pub last_name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
    pub is_default: bool,
}

#[derive(Clone, Debug)]
pub struct UpdateContact {
    pub first_name: DisplayName,
    pub last_name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
}
