use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::member::MemberRole;
use crate::domain::types::{
    Email, InvitationId, InvitationToken, OrganizationId, TypeConstraintError, UserId,
};

/// Days an invitation stays valid after it is sent.
pub const INVITATION_TTL_DAYS: i64 = 7;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl InvitationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            InvitationStatus::Pending => "PENDING",
            InvitationStatus::Accepted => "ACCEPTED",
            InvitationStatus::Rejected => "REJECTED",
            InvitationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Display for InvitationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(InvitationStatus::Pending),
            "ACCEPTED" => Ok(InvitationStatus::Accepted),
            "REJECTED" => Ok(InvitationStatus::Rejected),
            "CANCELLED" => Ok(InvitationStatus::Cancelled),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: InvitationId,
    pub organization_id: OrganizationId,
    pub email: Email,
    pub role: MemberRole,
    pub token: InvitationToken,
    pub status: InvitationStatus,
    pub invited_by: UserId,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Invitation {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at <= now
    }

    /// Pending and not yet expired.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired(now)
    }
}

#[derive(Clone, Debug)]
pub struct NewInvitation {
    pub organization_id: OrganizationId,
    pub email: Email,
    pub role: MemberRole,
    pub token: InvitationToken,
    pub invited_by: UserId,
    pub expires_at: NaiveDateTime,
}

impl NewInvitation {
    /// Builds a pending invitation with a fresh token expiring after
    /// [`INVITATION_TTL_DAYS`].
    pub fn new(
        organization_id: OrganizationId,
        email: Email,
        role: MemberRole,
        invited_by: UserId,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            organization_id,
            email,
            role,
            token: InvitationToken::generate(),
            invited_by,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn invitation(status: InvitationStatus, expires_at: NaiveDateTime) -> Invitation {
        Invitation {
            id: InvitationId::new(1).unwrap(),
            organization_id: OrganizationId::new(1).unwrap(),
            email: Email::new("guest@example.com").unwrap(),
            role: MemberRole::Member,
            token: InvitationToken::generate(),
            status,
            invited_by: UserId::new("owner").unwrap(),
            expires_at,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[test]
    fn new_invitation_expires_after_a_week() {
        let new = NewInvitation::new(
            OrganizationId::new(1).unwrap(),
            Email::new("guest@example.com").unwrap(),
            MemberRole::Admin,
            UserId::new("owner").unwrap(),
            at(1),
        );
        assert_eq!(new.expires_at, at(8));
    }

    #[test]
    fn open_requires_pending_and_unexpired() {
        assert!(invitation(InvitationStatus::Pending, at(8)).is_open(at(2)));
        assert!(!invitation(InvitationStatus::Pending, at(8)).is_open(at(8)));
        assert!(!invitation(InvitationStatus::Rejected, at(8)).is_open(at(2)));
    }
}
