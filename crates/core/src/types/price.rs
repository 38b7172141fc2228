//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers and cart totals are sums of frozen
//! unit prices, so amounts are held as [`Decimal`] to keep totals exact while
//! still serializing as plain numbers on the wire and in persisted carts.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency shown next to every amount.
pub const CURRENCY_LABEL: &str = "EUR";

/// A price in the storefront's single currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero amount; the total of an empty cart.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {CURRENCY_LABEL}", self.0.normalize())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_appends_currency() {
        assert_eq!(Price::from_units(999).to_string(), "999 EUR");
        assert_eq!(Price::new(Decimal::new(120_050, 2)).to_string(), "1200.5 EUR");
    }

    #[test]
    fn test_sum_is_exact() {
        let prices = [
            Price::new(Decimal::new(10, 1)),
            Price::new(Decimal::new(20, 1)),
            Price::from_units(3),
        ];
        let total: Price = prices.iter().sum();
        assert_eq!(total, Price::from_units(6));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = std::iter::empty::<Price>().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("1099").unwrap();
        assert_eq!(price, Price::from_units(1099));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_value(Price::from_units(799)).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(799.0));
    }
}
