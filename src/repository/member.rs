//! Member rows. Role changes and removals re-check the owner count inside an
//! immediate transaction, so concurrent writers cannot both drop an owner.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::{
        member::{Member, MemberRole},
        types::{Email, MemberId, OrganizationId, UserId},
    },
    models::member::Member as DbMember,
    repository::{
        DieselRepository, MemberReader, MemberWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

const LAST_OWNER: &str = "an organization must keep at least one owner";

/// Fails when losing `row` as an owner would leave its organization ownerless.
fn guard_last_owner(conn: &mut SqliteConnection, row: &DbMember) -> RepositoryResult<()> {
    use crate::schema::members;

    if row.role != MemberRole::Owner.as_str() {
        return Ok(());
    }
    let owners: i64 = members::table
        .filter(members::organization_id.eq(row.organization_id))
        .filter(members::role.eq(MemberRole::Owner.as_str()))
        .count()
        .get_result(conn)?;
    if owners <= 1 {
        return Err(RepositoryError::ConstraintViolation(LAST_OWNER.to_string()));
    }
    Ok(())
}

impl MemberReader for DieselRepository {
    fn get_member_by_id(
        &self,
        id: MemberId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        let member = members::table
            .filter(members::id.eq(id.get()))
            .filter(members::organization_id.eq(organization_id.get()))
            .first::<DbMember>(&mut conn)
            .optional()?;

        member
            .map(Member::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_member_by_user(
        &self,
        organization_id: OrganizationId,
        user_id: &UserId,
    ) -> RepositoryResult<Option<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        let member = members::table
            .filter(members::organization_id.eq(organization_id.get()))
            .filter(members::user_id.eq(user_id.as_str()))
            .first::<DbMember>(&mut conn)
            .optional()?;

        member
            .map(Member::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_member_by_email(
        &self,
        organization_id: OrganizationId,
        email: &Email,
    ) -> RepositoryResult<Option<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        let member = members::table
            .filter(members::organization_id.eq(organization_id.get()))
            .filter(members::email.eq(email.as_str()))
            .first::<DbMember>(&mut conn)
            .optional()?;

        member
            .map(Member::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_members(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        let members = members::table
            .filter(members::organization_id.eq(organization_id.get()))
            .order((members::name.asc(), members::id.asc()))
            .load::<DbMember>(&mut conn)?;

        members
            .into_iter()
            .map(Member::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }

    fn count_owners(&self, organization_id: OrganizationId) -> RepositoryResult<usize> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        let owners: i64 = members::table
            .filter(members::organization_id.eq(organization_id.get()))
            .filter(members::role.eq(MemberRole::Owner.as_str()))
            .count()
            .get_result(&mut conn)?;

        Ok(owners as usize)
    }
}

impl MemberWriter for DieselRepository {
    fn update_member_role(&self, id: MemberId, role: MemberRole) -> RepositoryResult<Member> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        let updated = conn.immediate_transaction::<DbMember, RepositoryError, _>(|conn| {
            let row = members::table.find(id.get()).first::<DbMember>(conn)?;
            if role != MemberRole::Owner {
                guard_last_owner(conn, &row)?;
            }
            let updated = diesel::update(members::table.find(row.id))
                .set((
                    members::role.eq(role.as_str()),
                    members::updated_at.eq(Utc::now().naive_utc()),
                ))
                .get_result::<DbMember>(conn)?;
            Ok(updated)
        })?;

        Ok(Member::try_from(updated)?)
    }

    fn delete_member(&self, id: MemberId) -> RepositoryResult<()> {
        use crate::schema::members;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<(), RepositoryError, _>(|conn| {
            let row = members::table.find(id.get()).first::<DbMember>(conn)?;
            guard_last_owner(conn, &row)?;
            diesel::delete(members::table.find(row.id)).execute(conn)?;
            Ok(())
        })
    }
}
