use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    DisplayName, Email, MemberId, OrganizationId, TypeConstraintError, UserId,
};

/// Role a user holds inside one organization.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl MemberRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            MemberRole::Owner => "OWNER",
            MemberRole::Admin => "ADMIN",
            MemberRole::Member => "MEMBER",
        }
    }

    /// Owners and admins manage the organization, its members and invitations.
    pub const fn can_manage(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }
}

impl Display for MemberRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(MemberRole::Owner),
            "ADMIN" => Ok(MemberRole::Admin),
            "MEMBER" => Ok(MemberRole::Member),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub email: Email,
    pub name: DisplayName,
    pub role: MemberRole,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Identity of the user joining an organization, taken from the bearer token.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberProfile {
    pub user_id: UserId,
    pub email: Email,
    pub name: DisplayName,
}

#[derive(Clone, Debug)]
pub struct NewMember {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub email: Email,
    pub name: DisplayName,
    pub role: MemberRole,
}

impl NewMember {
    pub fn new(organization_id: OrganizationId, profile: MemberProfile, role: MemberRole) -> Self {
        Self {
            organization_id,
            user_id: profile.user_id,
            email: profile.email,
            name: profile.name,
            role,
        }
    }
}
