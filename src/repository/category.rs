use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        category::{NewProductCategory, ProductCategory, UpdateProductCategory},
        types::{CategoryId, OrganizationId},
    },
    models::category::{
        NewProductCategory as DbNewCategory, ProductCategory as DbCategory,
        UpdateProductCategory as DbUpdateCategory,
    },
    repository::{
        CategoryReader, CategoryWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::product_categories,
};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(
        &self,
        id: CategoryId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<ProductCategory>> {
        let mut conn = self.conn()?;

        let category = product_categories::table
            .filter(product_categories::id.eq(id.get()))
            .filter(product_categories::organization_id.eq(organization_id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        category
            .map(ProductCategory::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_categories(
        &self,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Vec<ProductCategory>> {
        let mut conn = self.conn()?;

        let rows = product_categories::table
            .filter(product_categories::organization_id.eq(organization_id.get()))
            .order((product_categories::name.asc(), product_categories::id.asc()))
            .load::<DbCategory>(&mut conn)?;

        rows.into_iter()
            .map(ProductCategory::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }

    fn count_products_in_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let count: i64 = products::table
            .filter(products::category_id.eq(id.get()))
            .count()
            .get_result(&mut conn)?;

        Ok(count as usize)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewProductCategory) -> RepositoryResult<ProductCategory> {
        let mut conn = self.conn()?;

        let db_new_category: DbNewCategory = category.into();

        let created = diesel::insert_into(product_categories::table)
            .values(&db_new_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(ProductCategory::try_from(created)?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        updates: &UpdateProductCategory,
    ) -> RepositoryResult<ProductCategory> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateCategory::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(product_categories::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(ProductCategory::try_from(updated)?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(product_categories::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
