//! Product categories and their tree.

use crate::auth::AuthenticatedUser;
use crate::domain::category::{
    CategoryForest, CategoryNode, CategoryPath, CategoryPathError, MAX_CATEGORY_DEPTH,
    ProductCategory,
};
use crate::domain::types::{CategoryId, OrganizationId};
use crate::forms::category::{CategoryForm, CategoryPayload};
use crate::repository::{CategoryReader, CategoryWriter, MemberReader};
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult, path_id};

impl From<CategoryPathError> for ServiceError {
    fn from(err: CategoryPathError) -> Self {
        match err {
            CategoryPathError::NotFound(_) => ServiceError::NotFound,
            other => {
                log::error!("Corrupted category tree: {other}");
                ServiceError::Internal(other.to_string())
            }
        }
    }
}

fn load_forest<R>(repo: &R, organization_id: OrganizationId) -> ServiceResult<CategoryForest>
where
    R: CategoryReader + ?Sized,
{
    let categories = repo.list_categories(organization_id).map_err(|err| {
        log::error!("Failed to list categories: {err}");
        err
    })?;
    Ok(CategoryForest::new(categories))
}

pub fn list_categories<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Vec<ProductCategory>>
where
    R: CategoryReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let categories = repo.list_categories(member.organization_id).map_err(|err| {
        log::error!("Failed to list categories: {err}");
        err
    })?;

    Ok(categories)
}

/// Nested category tree, siblings sorted by name.
pub fn category_tree<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Vec<CategoryNode>>
where
    R: CategoryReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    Ok(load_forest(repo, member.organization_id)?.tree())
}

pub fn get_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    category_id: i32,
) -> ServiceResult<ProductCategory>
where
    R: CategoryReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let category_id = path_id(category_id, CategoryId::new)?;

    repo.get_category_by_id(category_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)
}

/// Ancestors, breadcrumbs and slug path of a category.
pub fn category_path<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    category_id: i32,
) -> ServiceResult<CategoryPath>
where
    R: CategoryReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let category_id = path_id(category_id, CategoryId::new)?;

    let forest = load_forest(repo, member.organization_id)?;
    Ok(forest.path(category_id)?)
}

/// Checks that `parent_id` exists and can take a subtree `height` levels tall.
fn check_parent(
    forest: &CategoryForest,
    parent_id: CategoryId,
    height: usize,
) -> ServiceResult<()> {
    if forest.get(parent_id).is_none() {
        return Err(ServiceError::invalid("parentId", "unknown parent category"));
    }
    if !forest.fits_under(parent_id, height)? {
        return Err(ServiceError::conflict(format!(
            "categories cannot be nested more than {MAX_CATEGORY_DEPTH} levels deep"
        )));
    }
    Ok(())
}

pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: CategoryForm,
) -> ServiceResult<ProductCategory>
where
    R: CategoryReader + CategoryWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = CategoryPayload::try_from(form)?;
    if let Some(parent_id) = payload.parent_id {
        let forest = load_forest(repo, member.organization_id)?;
        check_parent(&forest, parent_id, 0)?;
    }

    let category = repo
        .create_category(&payload.into_new(member.organization_id))
        .map_err(|err| {
            log::error!("Failed to create category: {err}");
            err
        })?;

    Ok(category)
}

/// Updates a category, refusing any re-parenting that would form a cycle.
pub fn update_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    category_id: i32,
    form: CategoryForm,
) -> ServiceResult<ProductCategory>
where
    R: CategoryReader + CategoryWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let category_id = path_id(category_id, CategoryId::new)?;
    let payload = CategoryPayload::try_from(form)?;

    let forest = load_forest(repo, member.organization_id)?;
    let existing = forest.get(category_id).ok_or(ServiceError::NotFound)?;

    if let Some(parent_id) = payload.parent_id {
        if forest.get(parent_id).is_some() && forest.would_create_cycle(existing.id, parent_id)? {
            return Err(ServiceError::conflict(
                "a category cannot be moved under itself or its descendants",
            ));
        }
        check_parent(&forest, parent_id, forest.height(existing.id))?;
    }

    let category = repo
        .update_category(existing.id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update category: {err}");
            err
        })?;

    Ok(category)
}

/// Deletes an empty leaf category.
pub fn delete_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    category_id: i32,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let category_id = path_id(category_id, CategoryId::new)?;

    let forest = load_forest(repo, member.organization_id)?;
    let existing = forest.get(category_id).ok_or(ServiceError::NotFound)?;

    if forest.children_of(existing.id) > 0 {
        return Err(ServiceError::conflict("category still has subcategories"));
    }
    if repo.count_products_in_category(existing.id)? > 0 {
        return Err(ServiceError::conflict("category still has products"));
    }

    repo.delete_category(existing.id).map_err(|err| {
        log::error!("Failed to delete category: {err}");
        err
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::MemberRole;
    use crate::domain::types::{DisplayName, Slug};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, now, user};

    fn category(id: i32, parent: Option<i32>, name: &str) -> ProductCategory {
        ProductCategory {
            id: CategoryId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            parent_id: parent.map(|p| CategoryId::new(p).unwrap()),
            name: DisplayName::new(name).unwrap(),
            slug: Slug::from_name(name).unwrap(),
            description: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn expect_categories(repo: &mut MockRepository) {
        repo.expect_list_categories().returning(|_| {
            Ok(vec![
                category(1, None, "Drinks"),
                category(2, Some(1), "Hot Drinks"),
                category(3, Some(2), "Coffee"),
            ])
        });
    }

    fn form(name: &str, parent_id: Option<i32>) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
            parent_id,
            ..CategoryForm::default()
        }
    }

    #[test]
    fn path_joins_slugs_root_first() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        expect_categories(&mut repo);

        let path = category_path(&repo, &user("bob"), ORG, 3).unwrap();

        assert_eq!(path.path, "drinks/hot-drinks/coffee");
        assert_eq!(path.ancestors[0].id.get(), 2);
    }

    #[test]
    fn path_of_unknown_category_is_not_found() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        expect_categories(&mut repo);

        let result = category_path(&repo, &user("bob"), ORG, 9);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn moving_under_a_descendant_is_a_conflict() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        expect_categories(&mut repo);
        repo.expect_update_category().times(0);

        let result = update_category(&repo, &user("bob"), ORG, 1, form("Drinks", Some(3)));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn moving_to_a_sibling_branch_is_allowed() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        expect_categories(&mut repo);
        repo.expect_update_category()
            .withf(|id, updates| id.get() == 3 && updates.parent_id.map(|p| p.get()) == Some(1))
            .times(1)
            .returning(|_, _| Ok(category(3, Some(1), "Coffee")));

        assert!(update_category(&repo, &user("bob"), ORG, 3, form("Coffee", Some(1))).is_ok());
    }

    #[test]
    fn category_with_children_or_products_cannot_be_deleted() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        expect_categories(&mut repo);
        repo.expect_delete_category().times(0);

        let result = delete_category(&repo, &user("bob"), ORG, 2);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        expect_categories(&mut repo);
        repo.expect_count_products_in_category().returning(|_| Ok(4));
        repo.expect_delete_category().times(0);

        let result = delete_category(&repo, &user("bob"), ORG, 3);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn create_checks_the_parent() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        expect_categories(&mut repo);
        repo.expect_create_category().times(0);

        let result = create_category(&repo, &user("bob"), ORG, form("Tea", Some(5)));

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    fn chain(len: i32) -> Vec<ProductCategory> {
        (1..=len)
            .map(|i| category(i, if i == 1 { None } else { Some(i - 1) }, &format!("c{i}")))
            .collect()
    }

    #[test]
    fn create_refuses_to_nest_past_the_depth_limit() {
        let deepest = MAX_CATEGORY_DEPTH as i32 + 1;
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_categories()
            .returning(move |_| Ok(chain(deepest)));
        repo.expect_create_category().times(0);

        let result = create_category(&repo, &user("bob"), ORG, form("Leaf", Some(deepest)));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn create_accepts_the_last_allowed_level() {
        let deepest = MAX_CATEGORY_DEPTH as i32;
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_categories()
            .returning(move |_| Ok(chain(deepest)));
        repo.expect_create_category()
            .times(1)
            .returning(move |_| Ok(category(500, Some(deepest), "Leaf")));

        assert!(create_category(&repo, &user("bob"), ORG, form("Leaf", Some(deepest))).is_ok());
    }

    #[test]
    fn moving_a_subtree_counts_its_height() {
        // Categories 1..=60 form one chain, 100 -> 101 -> ... -> 105 another.
        let mut categories = chain(60);
        categories.extend(
            (100..=105).map(|i| category(i, if i == 100 { None } else { Some(i - 1) }, "x")),
        );
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_categories()
            .returning(move |_| Ok(categories.clone()));
        repo.expect_update_category().times(0);

        let result = update_category(&repo, &user("bob"), ORG, 100, form("x", Some(60)));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }
}
