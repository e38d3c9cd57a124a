use diesel::prelude::*;

use crate::{
    domain::{
        tag::{NewTag, Tag},
        types::{OrganizationId, TagId},
    },
    models::tag::{NewTag as DbNewTag, Tag as DbTag},
    repository::{
        DieselRepository, TagReader, TagWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::tags,
};

impl TagReader for DieselRepository {
    fn get_tag_by_id(
        &self,
        id: TagId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Tag>> {
        let mut conn = self.conn()?;

        let tag = tags::table
            .filter(tags::id.eq(id.get()))
            .filter(tags::organization_id.eq(organization_id.get()))
            .first::<DbTag>(&mut conn)
            .optional()?;

        tag.map(Tag::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_tags(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<Tag>> {
        let mut conn = self.conn()?;

        let rows = tags::table
            .filter(tags::organization_id.eq(organization_id.get()))
            .order(tags::name.asc())
            .load::<DbTag>(&mut conn)?;

        rows.into_iter()
            .map(Tag::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }

    fn list_tags_by_ids(
        &self,
        organization_id: OrganizationId,
        ids: &[TagId],
    ) -> RepositoryResult<Vec<Tag>> {
        let mut conn = self.conn()?;

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let rows = tags::table
            .filter(tags::organization_id.eq(organization_id.get()))
            .filter(tags::id.eq_any(raw_ids))
            .order(tags::name.asc())
            .load::<DbTag>(&mut conn)?;

        rows.into_iter()
            .map(Tag::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, tag: &NewTag) -> RepositoryResult<Tag> {
        let mut conn = self.conn()?;

        let db_new_tag: DbNewTag = tag.into();

        let created = diesel::insert_into(tags::table)
            .values(&db_new_tag)
            .get_result::<DbTag>(&mut conn)?;

        Ok(Tag::try_from(created)?)
    }

    fn delete_tag(&self, id: TagId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(tags::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
