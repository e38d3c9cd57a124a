//! Product catalogue: listing, editing and tagging.

use crate::auth::AuthenticatedUser;
use crate::domain::product::Product;
use crate::domain::types::{CategoryId, OrganizationId, ProductId, RecordStatus, TagId};
use crate::forms::product::{ProductForm, ProductPayload};
use crate::list_state::ListState;
use crate::pagination::ListPage;
use crate::repository::{
    CategoryReader, MemberReader, ProductListQuery, ProductReader, ProductSort, ProductWriter,
    SortDirection, TagReader,
};
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult, path_id};

fn product_query(organization_id: OrganizationId, state: &ListState) -> ProductListQuery {
    let mut query = ProductListQuery::new(organization_id).paginate(state.page, state.per_page);

    if let Some(search) = &state.search {
        query = query.search(search.clone());
    }
    if let Some(status) = state.filter("status").and_then(|s| s.parse::<RecordStatus>().ok()) {
        query = query.status(status);
    }
    let id_filter = |key: &str| state.filter(key).and_then(|raw| raw.trim().parse::<i32>().ok());
    if let Some(category_id) = id_filter("category").and_then(|id| CategoryId::new(id).ok()) {
        query = query.category(category_id);
    }
    if let Some(tag_id) = id_filter("tag").and_then(|id| TagId::new(id).ok()) {
        query = query.tag(tag_id);
    }
    if let Some(sort) = &state.sort {
        let column = ProductSort::from_column(&sort.column).unwrap_or_default();
        query = query.sort(column, SortDirection::from_descending(sort.descending));
    }

    query
}

/// Checks that the referenced category and tags belong to the organization.
fn check_references<R>(
    repo: &R,
    organization_id: OrganizationId,
    payload: &ProductPayload,
) -> ServiceResult<()>
where
    R: CategoryReader + TagReader + ?Sized,
{
    if let Some(category_id) = payload.category_id {
        let category = repo.get_category_by_id(category_id, organization_id)?;
        if category.is_none() {
            return Err(ServiceError::invalid("categoryId", "unknown category"));
        }
    }

    if !payload.tag_ids.is_empty() {
        let found = repo.list_tags_by_ids(organization_id, &payload.tag_ids)?;
        if found.len() != payload.tag_ids.len() {
            return Err(ServiceError::invalid("tagIds", "unknown tag"));
        }
    }

    Ok(())
}

pub fn list_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    state: &ListState,
) -> ServiceResult<ListPage<Product>>
where
    R: ProductReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let state = state
        .clone()
        .with_known_sort(|column| ProductSort::from_column(column).is_some());

    let (total, products) = repo
        .list_products(product_query(member.organization_id, &state))
        .map_err(|err| {
            log::error!("Failed to list products: {err}");
            err
        })?;

    Ok(ListPage::new(products, total, &state))
}

pub fn get_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let product_id = path_id(product_id, ProductId::new)?;

    repo.get_product_by_id(product_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + CategoryReader + TagReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = ProductPayload::try_from(form)?;
    check_references(repo, member.organization_id, &payload)?;

    let product = repo
        .create_product(&payload.into_new(member.organization_id))
        .map_err(|err| {
            log::error!("Failed to create product: {err}");
            err
        })?;

    Ok(product)
}

pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    product_id: i32,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + CategoryReader + TagReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let product_id = path_id(product_id, ProductId::new)?;
    let payload = ProductPayload::try_from(form)?;

    let existing = repo
        .get_product_by_id(product_id, member.organization_id)?
        .ok_or(ServiceError::NotFound)?;
    check_references(repo, member.organization_id, &payload)?;

    let product = repo
        .update_product(existing.id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update product: {err}");
            err
        })?;

    Ok(product)
}

pub fn delete_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let product_id = path_id(product_id, ProductId::new)?;

    let deleted = repo
        .delete_products(member.organization_id, &[product_id])
        .map_err(|err| {
            log::error!("Failed to delete product: {err}");
            err
        })?;
    if deleted == 0 {
        return Err(ServiceError::NotFound);
    }

    Ok(())
}

pub fn delete_selected_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    selected: &[i32],
) -> ServiceResult<usize>
where
    R: ProductWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let ids: Vec<ProductId> = selected
        .iter()
        .filter_map(|id| ProductId::new(*id).ok())
        .collect();
    if ids.is_empty() {
        return Err(ServiceError::invalid("selected", "select at least one product"));
    }

    let deleted = repo
        .delete_products(member.organization_id, &ids)
        .map_err(|err| {
            log::error!("Failed to delete products: {err}");
            err
        })?;

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::MemberRole;
    use crate::domain::tag::Tag;
    use crate::domain::types::{DisplayName, HexColor};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, now, user};

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            category_id: None,
            name: DisplayName::new("Espresso").unwrap(),
            reference: None,
            description: None,
            price_cents: 250,
            vat_rate_bps: 550,
            unit: None,
            status: RecordStatus::Active,
            tags: Vec::new(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn tag(id: i32) -> Tag {
        Tag {
            id: TagId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            name: DisplayName::new(format!("tag {id}")).unwrap(),
            color: HexColor::default(),
            created_at: now(),
        }
    }

    fn form() -> ProductForm {
        ProductForm {
            name: "Espresso".into(),
            price_cents: 250,
            ..ProductForm::default()
        }
    }

    #[test]
    fn category_and_tag_filters_are_parsed() {
        let state = ListState::from_query("category=3&tag=x&sort=-price");
        let query = product_query(OrganizationId::new(ORG).unwrap(), &state);

        assert_eq!(query.category_id.map(|id| id.get()), Some(3));
        assert_eq!(query.tag_id, None);
        assert_eq!(query.sort, ProductSort::Price);
        assert_eq!(query.direction, SortDirection::Desc);
    }

    #[test]
    fn unknown_tag_is_a_validation_error() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_tags_by_ids()
            .returning(|_, _| Ok(vec![tag(1)]));
        repo.expect_create_product().times(0);

        let result = create_product(
            &repo,
            &user("bob"),
            ORG,
            ProductForm {
                tag_ids: vec![1, 2],
                ..form()
            },
        );

        match result {
            Err(ServiceError::Validation(errors)) => assert!(errors.contains_key("tagIds")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_category_by_id().returning(|_, _| Ok(None));
        repo.expect_create_product().times(0);

        let result = create_product(
            &repo,
            &user("bob"),
            ORG,
            ProductForm {
                category_id: Some(8),
                ..form()
            },
        );

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn product_is_created_with_its_tags() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_tags_by_ids()
            .returning(|_, ids| Ok(ids.iter().map(|id| tag(id.get())).collect()));
        repo.expect_create_product()
            .withf(|new| new.tag_ids.len() == 2 && new.vat_rate_bps == 2000)
            .times(1)
            .returning(|_| Ok(product(1)));

        let created = create_product(
            &repo,
            &user("bob"),
            ORG,
            ProductForm {
                tag_ids: vec![1, 2],
                ..form()
            },
        );

        assert!(created.is_ok());
    }
}
