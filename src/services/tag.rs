use crate::auth::AuthenticatedUser;
use crate::domain::tag::Tag;
use crate::domain::types::TagId;
use crate::forms::tag::TagForm;
use crate::repository::{MemberReader, TagReader, TagWriter};
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult, path_id};

pub fn list_tags<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Vec<Tag>>
where
    R: TagReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let tags = repo.list_tags(member.organization_id).map_err(|err| {
        log::error!("Failed to list tags: {err}");
        err
    })?;

    Ok(tags)
}

/// Creates a tag. Names are unique within an organization.
pub fn create_tag<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: TagForm,
) -> ServiceResult<Tag>
where
    R: TagReader + TagWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let new_tag = form.into_new(member.organization_id)?;

    let taken = repo
        .list_tags(member.organization_id)?
        .iter()
        .any(|tag| tag.name.as_str().eq_ignore_ascii_case(new_tag.name.as_str()));
    if taken {
        return Err(ServiceError::conflict(format!(
            "tag {} already exists",
            new_tag.name
        )));
    }

    let tag = repo.create_tag(&new_tag).map_err(|err| {
        log::error!("Failed to create tag: {err}");
        err
    })?;

    Ok(tag)
}

pub fn delete_tag<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    tag_id: i32,
) -> ServiceResult<()>
where
    R: TagReader + TagWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let tag_id = path_id(tag_id, TagId::new)?;

    let tag = repo
        .get_tag_by_id(tag_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.delete_tag(tag.id).map_err(|err| {
        log::error!("Failed to delete tag: {err}");
        err
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::MemberRole;
    use crate::domain::types::{DisplayName, HexColor, OrganizationId};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, now, user};

    fn tag(id: i32, name: &str) -> Tag {
        Tag {
            id: TagId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            name: DisplayName::new(name).unwrap(),
            color: HexColor::default(),
            created_at: now(),
        }
    }

    #[test]
    fn duplicate_name_is_a_conflict() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_tags().returning(|_| Ok(vec![tag(1, "VIP")]));
        repo.expect_create_tag().times(0);

        let form = TagForm {
            name: "vip".into(),
            color: None,
        };
        let result = create_tag(&repo, &user("bob"), ORG, form);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn new_tag_is_created() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_tags().returning(|_| Ok(vec![tag(1, "VIP")]));
        repo.expect_create_tag()
            .withf(|new| new.name.as_str() == "Wholesale" && new.color.as_str() == "#ff0000")
            .times(1)
            .returning(|new| Ok(tag(2, new.name.as_str())));

        let form = TagForm {
            name: "Wholesale".into(),
            color: Some("#FF0000".into()),
        };
        assert!(create_tag(&repo, &user("bob"), ORG, form).is_ok());
    }

    #[test]
    fn deleting_unknown_tag_is_not_found() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_tag_by_id().returning(|_, _| Ok(None));
        repo.expect_delete_tag().times(0);

        let result = delete_tag(&repo, &user("bob"), ORG, 4);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
