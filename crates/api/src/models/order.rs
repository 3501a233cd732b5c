//! Order and placement domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bramble_core::{OrderId, Price, ProductId, UserId};

use crate::validate::ValidationErrors;

/// An order placed by a user.
///
/// `total` is derived: it always equals the sum over the order's placements
/// of quantity times product price, and is only ever written by the order
/// service when a placement changes.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Derived sum of the order's lines.
    pub total: Price,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One order line: links an order to a product with a quantity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Placement {
    /// Unique placement ID.
    pub id: bramble_core::PlacementId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units reserved from the product's stock.
    pub quantity: i32,
}

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy)]
pub struct OrderItem {
    /// Product to reserve.
    pub product_id: ProductId,
    /// Units to reserve; must be positive.
    pub quantity: i32,
}

/// Check the items of a checkout: the list must be non-empty and every
/// quantity positive.
///
/// # Errors
///
/// Returns field-level messages when any constraint is violated.
pub fn validate_items(items: &[OrderItem]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if items.is_empty() {
        errors.add("products", "should be a non-empty array of products");
    }
    for item in items {
        if item.quantity <= 0 {
            errors.add("products", format!("quantity for product {} must be positive", item.product_id));
        }
    }

    errors.into_result()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_items_rejected() {
        let errors = validate_items(&[]).unwrap_err();
        assert!(errors.field("products").is_some());
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let items = [OrderItem {
            product_id: ProductId::new(1),
            quantity: 0,
        }];
        assert!(validate_items(&items).is_err());
    }

    #[test]
    fn test_valid_items() {
        let items = [
            OrderItem {
                product_id: ProductId::new(1),
                quantity: 2,
            },
            OrderItem {
                product_id: ProductId::new(2),
                quantity: 1,
            },
        ];
        assert!(validate_items(&items).is_ok());
    }
}
