//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog API reports prices as plain JSON numbers (`"price": 179.9`),
//! so [`Price`] serializes as a number too. Arithmetic happens on
//! [`Decimal`] to keep cart totals exact.

use std::fmt;
use std::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the store currency (Brazilian real).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at the representable range.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.0)))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

/// Formats as `R$ 1.234,50` (pt-BR grouping, two decimal places).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = format!("{:.2}", self.0.abs().round_dp(2));
        let (units, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{sign}R$ {grouped},{cents}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_deserializes_from_integer_and_float() {
        let whole: Price = serde_json::from_str("10").unwrap();
        assert_eq!(whole, Price::from(10));

        let fractional: Price = serde_json::from_str("179.9").unwrap();
        assert_eq!(fractional, Price::from_cents(17990));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_value(Price::from_cents(1050)).unwrap();
        assert!(json.is_number());
        assert!((json.as_f64().unwrap() - 10.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_times() {
        assert_eq!(Price::from_cents(1999).times(3), Price::from_cents(5997));
        assert_eq!(Price::from(10).times(0), Price::ZERO);
    }

    #[test]
    fn test_price_times_saturates() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(Price::new(Decimal::MIN).times(u32::MAX), Price::new(Decimal::MIN));
    }

    #[test]
    fn test_price_sum_saturates() {
        let max = Price::new(Decimal::MAX);
        let total: Price = [max, Price::from(1)].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from(10), Price::from_cents(550)].into_iter().sum();
        assert_eq!(total, Price::from_cents(1550));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from(10).to_string(), "R$ 10,00");
        assert_eq!(Price::from_cents(17990).to_string(), "R$ 179,90");
        assert_eq!(Price::from_cents(123_456_789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Price::from_cents(-500).to_string(), "-R$ 5,00");
        assert_eq!(Price::ZERO.to_string(), "R$ 0,00");
    }
}
