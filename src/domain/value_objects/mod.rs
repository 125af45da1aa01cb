//! Value objects shared across the domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Exact decimal amount of money.
///
/// The shop is single-currency, so this is a thin wrapper over [`Decimal`]
/// that keeps arithmetic exact and serializes as a decimal string
/// (`"19.99"`) rather than a float.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Mul<u32> for Money {
    type Output = Money;
    fn mul(self, qty: u32) -> Money {
        Money(self.0 * Decimal::from(qty))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative stock count with checked arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn add(&self, other: u32) -> Self {
        Self(self.0.saturating_add(other))
    }

    /// Returns `None` when `other` exceeds the current count; stock can
    /// never go negative.
    pub fn subtract(&self, other: u32) -> Option<Self> {
        if other > self.0 {
            None
        } else {
            Some(Self(self.0 - other))
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(Decimal::new(1999, 2));
        let b = Money::new(Decimal::new(500, 2));
        assert_eq!((a + b).amount(), Decimal::new(2499, 2));
        assert_eq!((a * 2).amount(), Decimal::new(3998, 2));
        assert_eq!(Money::ZERO + a, a);
    }

    #[test]
    fn test_money_display_is_exact() {
        let price = Money::new(Decimal::new(4498, 2));
        assert_eq!(price.to_string(), "44.98");
    }

    #[test]
    fn test_money_serializes_as_string() {
        let price = Money::new(Decimal::new(1999, 2));
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"19.99\"");
    }

    #[test]
    fn test_quantity_checked_subtract() {
        let q = Quantity::new(5);
        assert_eq!(q.subtract(3), Some(Quantity::new(2)));
        assert_eq!(q.subtract(5), Some(Quantity::new(0)));
        assert_eq!(q.subtract(6), None);
        assert!(q.subtract(5).unwrap().is_zero());
    }

    #[test]
    fn test_quantity_saturating_add() {
        assert_eq!(Quantity::new(u32::MAX).add(1).value(), u32::MAX);
    }
}
