use serde::Serialize;

use crate::domain::member::{Member, MemberRole};
use crate::domain::organization::{Company, Organization};

/// Organization as seen by one of its members.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetails {
    #[serde(flatten)]
    pub organization: Organization,
    pub role: MemberRole,
    pub company: Option<Company>,
}

/// Organization created together with its owner membership.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrganization {
    pub organization: Organization,
    pub owner: Member,
}
