//! Field-level validation, checked before every entity write.
//!
//! Constraints live next to the draft types in [`crate::models`] and are
//! enforced by the repositories, so programmatic callers get the same
//! guarantee as HTTP callers.

use std::collections::BTreeMap;

use serde::Serialize;

/// Accumulated field-level validation messages.
///
/// Serializes as a map of field name to messages, e.g.
/// `{"price": ["must be positive"]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty set of validation errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Whether any message has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded against a field, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Convert into a `Result`: `Ok(())` when no message was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one message was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        write!(f, "validation failed on: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_accumulates_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("price", "must be positive");
        errors.add("price", "is required");
        errors.add("title", "is required");

        let errors = errors.into_result().unwrap_err();
        assert_eq!(errors.field("price").unwrap().len(), 2);
        assert_eq!(errors.field("title").unwrap().len(), 1);
        assert!(errors.field("quantity").is_none());
    }

    #[test]
    fn test_serializes_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "is invalid");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["email"][0], "is invalid");
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "is required");
        errors.add("price", "must be positive");
        assert_eq!(errors.to_string(), "validation failed on: price, title");
    }
}
