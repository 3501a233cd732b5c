//! Product repository for database operations.
//!
//! Includes the published-product search used by the public listing
//! endpoint: dynamic filters are assembled with `sqlx::QueryBuilder`.

use sqlx::{PgPool, Postgres, QueryBuilder};

use bramble_core::{Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Product, ProductDraft};

const PRODUCT_COLUMNS: &str = "id, title, price, published, quantity, user_id, created_at, updated_at";

/// Optional filters for the published-product search.
#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    /// Case-insensitive substring match against the title.
    pub title: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<Price>,
    /// Inclusive upper price bound.
    pub price_max: Option<Price>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get several products by ID. Missing IDs are simply absent from the
    /// result; callers that care must check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// List all products owned by a user, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Create a new product after validating its fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when a field constraint fails.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        draft.validate()?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products (title, price, published, quantity, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.title)
        .bind(draft.price)
        .bind(draft.published)
        .bind(draft.quantity)
        .bind(draft.user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Persist changed fields of a product after validating them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when a field constraint fails.
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(&self, product: &Product) -> Result<Product, RepositoryError> {
        product.validate()?;

        let updated = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE products
            SET title = $1, price = $2, published = $3, quantity = $4
            WHERE id = $5
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.title)
        .bind(product.price)
        .bind(product.published)
        .bind(product.quantity)
        .bind(product.id)
        .fetch_optional(self.pool)
        .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count published products matching the filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_search(&self, filters: &SearchFilters) -> Result<i64, RepositoryError> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE published = TRUE");
        push_filters(&mut query, filters);

        let (count,): (i64,) = query.build_query_as().fetch_one(self.pool).await?;

        Ok(count)
    }

    /// One page of published products matching the filters, most recently
    /// updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        filters: &SearchFilters,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE published = TRUE"
        ));
        push_filters(&mut query, filters);
        query.push(" ORDER BY updated_at DESC OFFSET ");
        query.push_bind(offset);
        query.push(" LIMIT ");
        query.push_bind(limit);

        let products = query.build_query_as().fetch_all(self.pool).await?;

        Ok(products)
    }
}

/// Append the optional search predicates to a query.
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filters: &SearchFilters) {
    if let Some(title) = &filters.title {
        query.push(" AND lower(title) LIKE ");
        query.push_bind(format!("%{}%", title.to_lowercase()));
    }
    if let Some(price_min) = filters.price_min {
        query.push(" AND price >= ");
        query.push_bind(price_min);
    }
    if let Some(price_max) = filters.price_max {
        query.push(" AND price <= ");
        query.push_bind(price_max);
    }
}
