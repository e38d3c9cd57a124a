use chrono::Utc;
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        invitation::{Invitation, InvitationStatus, NewInvitation},
        member::{Member, MemberProfile, NewMember},
        types::{Email, InvitationId, InvitationToken, OrganizationId},
    },
    models::{
        invitation::{Invitation as DbInvitation, NewInvitation as DbNewInvitation},
        member::{Member as DbMember, NewMember as DbNewMember},
    },
    repository::{
        DieselRepository, InvitationReader, InvitationWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn into_domain(rows: Vec<DbInvitation>) -> RepositoryResult<Vec<Invitation>> {
    rows.into_iter()
        .map(Invitation::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(RepositoryError::from)
}

impl InvitationReader for DieselRepository {
    fn get_invitation_by_id(
        &self,
        id: InvitationId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Invitation>> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let invitation = invitations::table
            .filter(invitations::id.eq(id.get()))
            .filter(invitations::organization_id.eq(organization_id.get()))
            .first::<DbInvitation>(&mut conn)
            .optional()?;

        invitation
            .map(Invitation::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_invitation_by_token(
        &self,
        token: &InvitationToken,
    ) -> RepositoryResult<Option<Invitation>> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let invitation = invitations::table
            .filter(invitations::token.eq(token.to_string()))
            .first::<DbInvitation>(&mut conn)
            .optional()?;

        invitation
            .map(Invitation::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_invitations(
        &self,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Vec<Invitation>> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let rows = invitations::table
            .filter(invitations::organization_id.eq(organization_id.get()))
            .order(invitations::created_at.desc())
            .load::<DbInvitation>(&mut conn)?;

        into_domain(rows)
    }

    fn list_pending_invitations_for_email(
        &self,
        email: &Email,
    ) -> RepositoryResult<Vec<Invitation>> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let rows = invitations::table
            .filter(invitations::email.eq(email.as_str()))
            .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
            .filter(invitations::expires_at.gt(Utc::now().naive_utc()))
            .order(invitations::created_at.desc())
            .load::<DbInvitation>(&mut conn)?;

        into_domain(rows)
    }

    fn find_pending_invitation(
        &self,
        organization_id: OrganizationId,
        email: &Email,
    ) -> RepositoryResult<Option<Invitation>> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let invitation = invitations::table
            .filter(invitations::organization_id.eq(organization_id.get()))
            .filter(invitations::email.eq(email.as_str()))
            .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
            .filter(invitations::expires_at.gt(Utc::now().naive_utc()))
            .first::<DbInvitation>(&mut conn)
            .optional()?;

        invitation
            .map(Invitation::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}

impl InvitationWriter for DieselRepository {
    fn create_invitation(&self, invitation: &NewInvitation) -> RepositoryResult<Invitation> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let db_new_invitation: DbNewInvitation = invitation.into();

        let created = diesel::insert_into(invitations::table)
            .values(&db_new_invitation)
            .get_result::<DbInvitation>(&mut conn)?;

        Ok(Invitation::try_from(created)?)
    }

    fn set_invitation_status(
        &self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> RepositoryResult<Invitation> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let updated = diesel::update(invitations::table.find(id.get()))
            .set((
                invitations::status.eq(status.as_str()),
                invitations::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbInvitation>(&mut conn)?;

        Ok(Invitation::try_from(updated)?)
    }

    fn accept_invitation(
        &self,
        invitation: &Invitation,
        profile: &MemberProfile,
    ) -> RepositoryResult<Member> {
        use crate::schema::{invitations, members};

        let mut conn = self.conn()?;

        let new_member =
            NewMember::new(invitation.organization_id, profile.clone(), invitation.role);
        let db_new_member: DbNewMember = (&new_member).into();
        let now = Utc::now().naive_utc();

        let db_member = conn.transaction::<DbMember, diesel::result::Error, _>(|conn| {
            // Only a still-pending invitation may flip; a concurrent accept sees zero rows.
            let flipped = diesel::update(
                invitations::table
                    .filter(invitations::id.eq(invitation.id.get()))
                    .filter(invitations::status.eq(InvitationStatus::Pending.as_str())),
            )
            .set((
                invitations::status.eq(InvitationStatus::Accepted.as_str()),
                invitations::updated_at.eq(now),
            ))
            .execute(conn)?;

            if flipped == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            diesel::insert_into(members::table)
                .values(&db_new_member)
                .get_result::<DbMember>(conn)
        })?;

        Ok(Member::try_from(db_member)?)
    }

    fn delete_invitation(&self, id: InvitationId) -> RepositoryResult<()> {
        use crate::schema::invitations;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(invitations::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
