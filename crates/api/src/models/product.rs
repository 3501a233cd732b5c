//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bramble_core::{Price, ProductId, UserId};

use crate::validate::ValidationErrors;

/// A product listed by a user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Whether the product appears in public search results.
    pub published: bool,
    /// Stock counter. Also decremented/restored by the order service as
    /// placements are created and removed.
    pub quantity: i32,
    /// Owning user.
    pub user_id: UserId,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Check field constraints ahead of an update write.
    ///
    /// # Errors
    ///
    /// Returns field-level messages when any constraint is violated.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(&self.title, self.price, self.quantity)
    }
}

/// Fields for a product that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Whether the product appears in public search results.
    pub published: bool,
    /// Initial stock.
    pub quantity: i32,
    /// Owning user.
    pub user_id: UserId,
}

impl ProductDraft {
    /// Check field constraints ahead of the insert.
    ///
    /// # Errors
    ///
    /// Returns field-level messages when any constraint is violated.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(&self.title, self.price, self.quantity)
    }
}

/// Shared constraints: title present, price positive, quantity non-negative.
///
/// The quantity floor applies to direct product writes only; the order
/// service adjusts stock with arithmetic updates that bypass this check and
/// may drive the counter negative.
fn validate_fields(title: &str, price: Price, quantity: i32) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if title.trim().is_empty() {
        errors.add("title", "is required");
    }
    if !price.is_positive() {
        errors.add("price", "must be positive");
    }
    if quantity < 0 {
        errors.add("quantity", "must not be negative");
    }

    errors.into_result()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            title: "TV".to_string(),
            price: "100".parse().unwrap(),
            published: true,
            quantity: 5,
            user_id: UserId::new(1),
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut product = draft();
        product.title = "   ".to_string();
        let errors = product.validate().unwrap_err();
        assert!(errors.field("title").is_some());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut product = draft();
        product.price = Price::ZERO;
        let errors = product.validate().unwrap_err();
        assert!(errors.field("price").is_some());

        product.price = "-1".parse().unwrap();
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut product = draft();
        product.quantity = -1;
        let errors = product.validate().unwrap_err();
        assert!(errors.field("quantity").is_some());
    }
}
