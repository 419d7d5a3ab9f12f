//! Non-negative prices using decimal arithmetic.
//!
//! The kitchen API sends prices either as JSON numbers (`12.5`) or as decimal
//! strings (`"12.50"`). Both deserialize into a [`Price`]; negative amounts
//! are rejected.

use core::fmt;
use core::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A price in the restaurant's currency.
///
/// Always non-negative. Displays as `$12.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a quantity.
    ///
    /// Saturates at `Decimal::MAX` rather than overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Format for display with two decimal places (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "${:.2}",
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(Decimal::ZERO, |acc, price| {
            acc.checked_add(price.0).unwrap_or(Decimal::MAX)
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::from_cents(1999).display(), "$19.99");
        assert_eq!(Price::new(Decimal::new(5, 0)).unwrap().display(), "$5.00");
        assert_eq!(Price::new(Decimal::new(12345, 3)).unwrap().to_string(), "$12.35");
    }

    #[test]
    fn test_display_rounds_half_cents_up() {
        assert_eq!(Price::new(Decimal::new(125, 3)).unwrap().display(), "$0.13");
        assert_eq!(Price::new(Decimal::new(2005, 3)).unwrap().display(), "$2.01");
        assert_eq!(Price::new(Decimal::new(2004, 3)).unwrap().display(), "$2.00");
    }

    #[test]
    fn test_deserializes_number_and_string() {
        let from_number: Price = serde_json::from_str("12.5").unwrap();
        let from_string: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    #[test]
    fn test_times_and_sum() {
        let lines = [Price::from_cents(500).times(2), Price::from_cents(300).times(1)];
        let total: Price = lines.into_iter().sum();
        assert_eq!(total, Price::from_cents(1300));
    }
}
