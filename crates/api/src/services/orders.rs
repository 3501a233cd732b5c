//! Checkout and placement bookkeeping.
//!
//! Creating or removing a placement must keep two derived values consistent:
//! the referenced product's stock counter and the owning order's total.
//! Every entry point here runs the whole sequence inside a single
//! transaction, so a failure partway through commits nothing.
//!
//! Concurrency caveat: stock adjustments are arithmetic updates without a row
//! lock, so two simultaneous checkouts of the same product can interleave.
//! The counter stays internally consistent but no reservation guarantee is
//! made, and there is no floor check: stock may go negative.

use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use bramble_core::{OrderId, PlacementId, Price, ProductId, UserId};

use crate::models::order::validate_items;
use crate::models::{Order, OrderItem, Placement};
use crate::validate::ValidationErrors;

const ORDER_COLUMNS: &str = "id, user_id, total, created_at, updated_at";

/// Errors that can occur during checkout or placement changes.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested items fail validation.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    /// A referenced product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The placement to remove does not exist.
    #[error("placement not found")]
    PlacementNotFound,

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Service owning the order/placement write path.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check out: create an order for `owner` with one placement per item.
    ///
    /// The order row, every placement, every stock decrement, and the final
    /// total are committed atomically; a missing product aborts the whole
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Invalid` when the item list is empty or any
    /// quantity is non-positive.
    /// Returns `OrderError::ProductNotFound` when a referenced product is
    /// absent.
    pub async fn create_order(
        &self,
        owner: UserId,
        items: &[OrderItem],
    ) -> Result<Order, OrderError> {
        validate_items(items)?;

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id) VALUES ($1) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            insert_placement(&mut tx, order.id, *item).await?;
        }

        // Re-read for the final total
        let order = fetch_order(&mut tx, order.id).await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Add one placement to an existing order, adjusting stock and total.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Invalid` for a non-positive quantity.
    /// Returns `OrderError::ProductNotFound` when the product is absent.
    pub async fn add_placement(
        &self,
        order_id: OrderId,
        item: OrderItem,
    ) -> Result<Placement, OrderError> {
        if item.quantity <= 0 {
            let mut errors = ValidationErrors::new();
            errors.add("quantity", "must be positive");
            return Err(errors.into());
        }

        let mut tx = self.pool.begin().await?;
        let placement = insert_placement(&mut tx, order_id, item).await?;
        tx.commit().await?;

        Ok(placement)
    }

    /// Remove a placement, restoring the product's stock and recomputing the
    /// order's total.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::PlacementNotFound` when the placement is absent.
    pub async fn remove_placement(&self, id: PlacementId) -> Result<(), OrderError> {
        let mut tx = self.pool.begin().await?;

        let placement = sqlx::query_as::<_, Placement>(
            "SELECT id, order_id, product_id, quantity FROM placements WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::PlacementNotFound)?;

        // Restore the reserved stock before the row goes away
        adjust_stock(&mut tx, placement.product_id, placement.quantity).await?;

        sqlx::query("DELETE FROM placements WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        recompute_total(&mut tx, placement.order_id).await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Insert a placement row, decrement the product's stock, and recompute the
/// owning order's total. Runs on the caller's transaction.
async fn insert_placement(
    tx: &mut Transaction<'_, Postgres>,
    order_id: OrderId,
    item: OrderItem,
) -> Result<Placement, OrderError> {
    let placement = sqlx::query_as::<_, Placement>(
        r"
        INSERT INTO placements (order_id, product_id, quantity)
        VALUES ($1, $2, $3)
        RETURNING id, order_id, product_id, quantity
        ",
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_foreign_key_violation()
        {
            return OrderError::ProductNotFound(item.product_id);
        }
        OrderError::Database(e)
    })?;

    adjust_stock(tx, item.product_id, -item.quantity).await?;
    recompute_total(tx, order_id).await?;

    Ok(placement)
}

/// Apply a delta to a product's stock counter. No floor check: the counter
/// may go negative.
async fn adjust_stock(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    delta: i32,
) -> Result<(), OrderError> {
    let result = sqlx::query("UPDATE products SET quantity = quantity + $1 WHERE id = $2")
        .bind(delta)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(OrderError::ProductNotFound(product_id));
    }

    Ok(())
}

/// Recompute an order's total as the sum of quantity times unit price over
/// its placements, in one aggregate query. An order with no placements has
/// total 0.
async fn recompute_total(
    tx: &mut Transaction<'_, Postgres>,
    order_id: OrderId,
) -> Result<Price, OrderError> {
    let (total,): (Price,) = sqlx::query_as(
        r"
        SELECT COALESCE(SUM(pl.quantity * p.price), 0)
        FROM placements pl
        JOIN products p ON p.id = pl.product_id
        WHERE pl.order_id = $1
        ",
    )
    .bind(order_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("UPDATE orders SET total = $1 WHERE id = $2")
        .bind(total)
        .bind(order_id)
        .execute(&mut **tx)
        .await?;

    Ok(total)
}

/// Re-read an order on the caller's transaction.
async fn fetch_order(
    tx: &mut Transaction<'_, Postgres>,
    id: OrderId,
) -> Result<Order, OrderError> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(order)
}
