//! Products and their tag associations.

use std::collections::HashMap;

use chrono::Utc;
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        product::{NewProduct, Product, UpdateProduct},
        tag::Tag,
        types::{OrganizationId, ProductId, TagId},
    },
    models::{
        product::{
            NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
        },
        tag::{NewProductTag, Tag as DbTag},
    },
    repository::{
        DieselRepository, ProductListQuery, ProductReader, ProductSort, ProductWriter,
        SortDirection,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{product_tags, products, tags},
};

fn filtered(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut items = products::table
        .filter(products::organization_id.eq(query.organization_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref() {
        let pattern = format!("%{term}%");
        items = items.filter(
            products::name
                .like(pattern.clone())
                .or(products::reference.like(pattern)),
        );
    }

    if let Some(status) = query.status {
        items = items.filter(products::status.eq(status.as_str()));
    }

    if let Some(category_id) = query.category_id {
        items = items.filter(products::category_id.eq(category_id.get()));
    }

    if let Some(tag_id) = query.tag_id {
        items = items.filter(
            products::id.eq_any(
                product_tags::table
                    .filter(product_tags::tag_id.eq(tag_id.get()))
                    .select(product_tags::product_id),
            ),
        );
    }

    items
}

fn sorted(
    items: products::BoxedQuery<'static, Sqlite>,
    sort: ProductSort,
    direction: SortDirection,
) -> products::BoxedQuery<'static, Sqlite> {
    let items = match (sort, direction) {
        (ProductSort::Name, SortDirection::Asc) => items.order(products::name.asc()),
        (ProductSort::Name, SortDirection::Desc) => items.order(products::name.desc()),
        (ProductSort::Reference, SortDirection::Asc) => items.order(products::reference.asc()),
        (ProductSort::Reference, SortDirection::Desc) => items.order(products::reference.desc()),
        (ProductSort::Price, SortDirection::Asc) => items.order(products::price_cents.asc()),
        (ProductSort::Price, SortDirection::Desc) => items.order(products::price_cents.desc()),
        (ProductSort::CreatedAt, SortDirection::Asc) => items.order(products::created_at.asc()),
        (ProductSort::CreatedAt, SortDirection::Desc) => items.order(products::created_at.desc()),
        (ProductSort::UpdatedAt, SortDirection::Asc) => items.order(products::updated_at.asc()),
        (ProductSort::UpdatedAt, SortDirection::Desc) => items.order(products::updated_at.desc()),
    };
    items.then_order_by(products::id.asc())
}

/// Loads the tags of every given product, grouped by product id.
fn tags_by_product(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<Tag>>> {
    let rows = product_tags::table
        .inner_join(tags::table)
        .filter(product_tags::product_id.eq_any(product_ids))
        .order(tags::name.asc())
        .select((product_tags::product_id, tags::all_columns))
        .load::<(i32, DbTag)>(conn)?;

    let mut grouped: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (product_id, tag) in rows {
        grouped
            .entry(product_id)
            .or_default()
            .push(Tag::try_from(tag)?);
    }
    Ok(grouped)
}

fn with_tags(conn: &mut SqliteConnection, rows: Vec<DbProduct>) -> RepositoryResult<Vec<Product>> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let mut tags = tags_by_product(conn, &ids)?;

    rows.into_iter()
        .map(|row| {
            let product_tags = tags.remove(&row.id).unwrap_or_default();
            row.into_domain(product_tags)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(RepositoryError::from)
}

fn replace_tags(
    conn: &mut SqliteConnection,
    product_id: i32,
    tag_ids: &[TagId],
) -> QueryResult<()> {
    diesel::delete(product_tags::table.filter(product_tags::product_id.eq(product_id)))
        .execute(conn)?;

    let mut links: Vec<NewProductTag> = tag_ids
        .iter()
        .map(|tag_id| NewProductTag {
            product_id,
            tag_id: tag_id.get(),
        })
        .collect();
    links.sort_by_key(|link| link.tag_id);
    links.dedup_by_key(|link| link.tag_id);

    if !links.is_empty() {
        diesel::insert_into(product_tags::table)
            .values(&links)
            .execute(conn)?;
    }
    Ok(())
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(
        &self,
        id: ProductId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .filter(products::organization_id.eq(organization_id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match product {
            Some(row) => Ok(with_tags(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = sorted(filtered(&query), query.sort, query.direction);
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let rows = items.load::<DbProduct>(&mut conn)?;
        let products = with_tags(&mut conn, rows)?;

        Ok((total as usize, products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        let db_new_product: DbNewProduct = product.into();

        let created = conn.transaction::<DbProduct, diesel::result::Error, _>(|conn| {
            let created = diesel::insert_into(products::table)
                .values(&db_new_product)
                .get_result::<DbProduct>(conn)?;
            replace_tags(conn, created.id, &product.tag_ids)?;
            Ok(created)
        })?;

        with_tags(&mut conn, vec![created])?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_product(&self, id: ProductId, updates: &UpdateProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateProduct::new(updates, Utc::now().naive_utc());

        let updated = conn.transaction::<DbProduct, diesel::result::Error, _>(|conn| {
            let updated = diesel::update(products::table.find(id.get()))
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;
            replace_tags(conn, updated.id, &updates.tag_ids)?;
            Ok(updated)
        })?;

        with_tags(&mut conn, vec![updated])?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    fn delete_products(
        &self,
        organization_id: OrganizationId,
        ids: &[ProductId],
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let deleted = diesel::delete(
            products::table
                .filter(products::organization_id.eq(organization_id.get()))
                .filter(products::id.eq_any(raw_ids)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}
