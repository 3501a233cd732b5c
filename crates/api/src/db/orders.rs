//! Order repository for database operations.
//!
//! Read side only: the write path (checkout, placement changes and the
//! stock/total bookkeeping they trigger) lives in
//! [`crate::services::orders`], which owns its transactions.

use sqlx::PgPool;

use bramble_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::{Order, Placement};

const ORDER_COLUMNS: &str = "id, user_id, total, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Count the orders owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_owner(&self, owner: UserId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(owner)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// One page of a user's orders, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn page_by_owner(
        &self,
        owner: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "
        ))
        .bind(owner)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// All placements attached to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn placements_for(&self, order: OrderId) -> Result<Vec<Placement>, RepositoryError> {
        let placements = sqlx::query_as::<_, Placement>(
            r"
            SELECT id, order_id, product_id, quantity
            FROM placements
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order)
        .fetch_all(self.pool)
        .await?;

        Ok(placements)
    }
}
