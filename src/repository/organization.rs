//! Repository implementation for organizations and their company record.

use chrono::Utc;
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        member::{Member, MemberProfile, MemberRole, NewMember},
        organization::{
            Company, NewOrganization, Organization, OrganizationMembership, UpdateOrganization,
            UpsertCompany,
        },
        types::{OrganizationId, Slug, UserId},
    },
    models::{
        member::{Member as DbMember, NewMember as DbNewMember},
        organization::{
            Company as DbCompany, NewOrganization as DbNewOrganization,
            Organization as DbOrganization, UpdateOrganization as DbUpdateOrganization,
            UpsertCompany as DbUpsertCompany,
        },
    },
    repository::{
        DieselRepository, OrganizationReader, OrganizationWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl OrganizationReader for DieselRepository {
    fn get_organization_by_id(&self, id: OrganizationId) -> RepositoryResult<Option<Organization>> {
        use crate::schema::organizations;

        let mut conn = self.conn()?;

        let organization = organizations::table
            .find(id.get())
            .first::<DbOrganization>(&mut conn)
            .optional()?;

        organization
            .map(Organization::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_organization_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Organization>> {
        use crate::schema::organizations;

        let mut conn = self.conn()?;

        let organization = organizations::table
            .filter(organizations::slug.eq(slug.as_str()))
            .first::<DbOrganization>(&mut conn)
            .optional()?;

        organization
            .map(Organization::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_organizations_for_user(
        &self,
        user_id: &UserId,
    ) -> RepositoryResult<Vec<OrganizationMembership>> {
        use crate::schema::{members, organizations};

        let mut conn = self.conn()?;

        let rows = members::table
            .inner_join(organizations::table)
            .filter(members::user_id.eq(user_id.as_str()))
            .order(organizations::name.asc())
            .select((organizations::all_columns, members::role))
            .load::<(DbOrganization, String)>(&mut conn)?;

        rows.into_iter()
            .map(|(organization, role)| {
                Ok(OrganizationMembership {
                    organization: Organization::try_from(organization)?,
                    role: role.parse::<MemberRole>()?,
                })
            })
            .collect::<Result<Vec<_>, crate::domain::types::TypeConstraintError>>()
            .map_err(RepositoryError::from)
    }

    fn get_company(&self, organization_id: OrganizationId) -> RepositoryResult<Option<Company>> {
        use crate::schema::companies;

        let mut conn = self.conn()?;

        let company = companies::table
            .filter(companies::organization_id.eq(organization_id.get()))
            .first::<DbCompany>(&mut conn)
            .optional()?;

        company
            .map(Company::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}

impl OrganizationWriter for DieselRepository {
    fn create_organization_with_owner(
        &self,
        organization: &NewOrganization,
        owner: &MemberProfile,
    ) -> RepositoryResult<(Organization, Member)> {
        use crate::schema::{members, organizations};

        let mut conn = self.conn()?;

        let db_new_organization: DbNewOrganization = organization.into();

        let (db_organization, db_member) = conn
            .transaction::<(DbOrganization, DbMember), diesel::result::Error, _>(|conn| {
                let db_organization = diesel::insert_into(organizations::table)
                    .values(&db_new_organization)
                    .get_result::<DbOrganization>(conn)?;

                let organization_id = OrganizationId::new(db_organization.id)
                    .map_err(|_| diesel::result::Error::RollbackTransaction)?;
                let new_member = NewMember::new(organization_id, owner.clone(), MemberRole::Owner);
                let db_new_member: DbNewMember = (&new_member).into();

                let db_member = diesel::insert_into(members::table)
                    .values(&db_new_member)
                    .get_result::<DbMember>(conn)?;

                Ok((db_organization, db_member))
            })?;

        Ok((
            Organization::try_from(db_organization)?,
            Member::try_from(db_member)?,
        ))
    }

    fn update_organization(
        &self,
        id: OrganizationId,
        updates: &UpdateOrganization,
    ) -> RepositoryResult<Organization> {
        use crate::schema::organizations;

        let mut conn = self.conn()?;

        let db_updates = DbUpdateOrganization::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(organizations::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbOrganization>(&mut conn)?;

        Ok(Organization::try_from(updated)?)
    }

    fn delete_organization(&self, id: OrganizationId) -> RepositoryResult<()> {
        use crate::schema::organizations;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(organizations::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn upsert_company(&self, company: &UpsertCompany) -> RepositoryResult<Company> {
        use crate::schema::companies;

        let mut conn = self.conn()?;

        let values = DbUpsertCompany::new(company, Utc::now().naive_utc());

        let db_company = diesel::insert_into(companies::table)
            .values(&values)
            .on_conflict(companies::organization_id)
            .do_update()
            .set(&values)
            .get_result::<DbCompany>(&mut conn)?;

        Ok(Company::try_from(db_company)?)
    }
}
