use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::member::{Member as DomainMember, MemberRole, NewMember as DomainNewMember};
use crate::domain::types::{
    DisplayName, Email, MemberId, OrganizationId, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::members)]
/// Diesel model for [`crate::domain::member::Member`].
pub struct Member {
    pub id: i32,
    pub organization_id: i32,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::members)]
/// Insertable form of [`Member`].
pub struct NewMember<'a> {
    pub organization_id: i32,
    pub user_id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

impl TryFrom<Member> for DomainMember {
    type Error = TypeConstraintError;

    fn try_from(member: Member) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MemberId::try_from(member.id)?,
            organization_id: OrganizationId::try_from(member.organization_id)?,
            user_id: UserId::new(member.user_id)?,
            email: Email::new(member.email)?,
            name: DisplayName::new(member.name)?,
            role: member.role.parse::<MemberRole>()?,
            created_at: member.created_at,
            updated_at: member.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewMember> for NewMember<'a> {
    fn from(member: &'a DomainNewMember) -> Self {
        Self {
            organization_id: member.organization_id.get(),
            user_id: member.user_id.as_str(),
            email: member.email.as_str(),
            name: member.name.as_str(),
            role: member.role.as_str(),
        }
    }
}
