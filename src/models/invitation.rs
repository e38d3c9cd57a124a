use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::invitation::{
    Invitation as DomainInvitation, InvitationStatus, NewInvitation as DomainNewInvitation,
};
use crate::domain::member::MemberRole;
use crate::domain::types::{Email, InvitationId, OrganizationId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::invitations)]
/// Diesel model for [`crate::domain::invitation::Invitation`].
pub struct Invitation {
    pub id: i32,
    pub organization_id: i32,
    pub email: String,
    pub role: String,
    pub token: String,
    pub status: String,
    pub invited_by: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invitations)]
/// Insertable form of [`Invitation`].
pub struct NewInvitation<'a> {
    pub organization_id: i32,
    pub email: &'a str,
    pub role: &'a str,
    pub token: String,
    pub status: &'a str,
    pub invited_by: &'a str,
    pub expires_at: NaiveDateTime,
}

impl TryFrom<Invitation> for DomainInvitation {
    type Error = TypeConstraintError;

    fn try_from(invitation: Invitation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InvitationId::try_from(invitation.id)?,
            organization_id: OrganizationId::try_from(invitation.organization_id)?,
            email: Email::new(invitation.email)?,
            role: invitation.role.parse::<MemberRole>()?,
            token: invitation.token.parse()?,
            status: invitation.status.parse::<InvitationStatus>()?,
            invited_by: UserId::new(invitation.invited_by)?,
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
            updated_at: invitation.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewInvitation> for NewInvitation<'a> {
    fn from(invitation: &'a DomainNewInvitation) -> Self {
        Self {
            organization_id: invitation.organization_id.get(),
            email: invitation.email.as_str(),
            role: invitation.role.as_str(),
            token: invitation.token.to_string(),
            status: InvitationStatus::Pending.as_str(),
            invited_by: invitation.invited_by.as_str(),
            expires_at: invitation.expires_at,
        }
    }
}
