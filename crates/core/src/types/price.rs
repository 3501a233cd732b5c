//! Type-safe monetary amounts using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is not a valid decimal number.
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),
}

/// A monetary amount.
///
/// Wraps [`Decimal`] so product prices and order totals are never stored as
/// binary floats. Serializes as a JSON string (e.g. `"19.99"`).
///
/// ## Examples
///
/// ```
/// use bramble_core::Price;
/// use rust_decimal::Decimal;
///
/// let price: Price = "19.99".parse().unwrap();
/// assert!(price.is_positive());
/// assert_eq!(price.times(2).amount(), Decimal::new(3998, 2));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Whether the amount is greater than or equal to zero.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.0 >= Decimal::ZERO
    }

    /// Multiply the amount by an integer quantity.
    #[must_use]
    pub fn times(&self, quantity: i32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map(Self)
            .map_err(|e| PriceError::InvalidDecimal(e.to_string()))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

// SQLx support (with postgres feature) - maps to NUMERIC
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let price: Price = "5".parse().unwrap();
        assert_eq!(price.amount(), Decimal::from(5));
        assert!("not-a-number".parse::<Price>().is_err());
    }

    #[test]
    fn test_positivity() {
        let positive: Price = "0.01".parse().unwrap();
        let negative: Price = "-1".parse().unwrap();
        assert!(positive.is_positive());
        assert!(!Price::ZERO.is_positive());
        assert!(Price::ZERO.is_non_negative());
        assert!(!negative.is_non_negative());
    }

    #[test]
    fn test_times_and_sum() {
        let price: Price = "5".parse().unwrap();
        assert_eq!(price.times(2).amount(), Decimal::from(10));

        let total: Price = [price.times(2), price.times(1)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::from(15));
    }

    #[test]
    fn test_serde_as_string() {
        let price: Price = "19.99".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
