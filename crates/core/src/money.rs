use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoneyError {
    #[error("Amount must be a finite number, got {0}")]
    NonFinite(f64),
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Rounds to whole cents, half-up (away from zero on the midpoint).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a boundary-supplied float, rejecting NaN and infinities.
pub fn decimal_from_f64(value: f64) -> Result<Decimal, MoneyError> {
    if !value.is_finite() {
        return Err(MoneyError::NonFinite(value));
    }
    Decimal::from_f64(value).ok_or(MoneyError::NonFinite(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn to_cents(self) -> Result<i64, MoneyError> {
        (self.0 * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .ok_or(MoneyError::OutOfRange(self.0))
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(round2(decimal))
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-${:.2}", self.0.abs())
        } else {
            write!(f, "${:.2}", self.0)
        }
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn round2_is_half_up_on_cents() {
        assert_eq!(round2(dec("0.125")), dec("0.13"));
        assert_eq!(round2(dec("0.124")), dec("0.12"));
        assert_eq!(round2(dec("9.0909")), dec("9.09"));
        assert_eq!(round2(dec("2.675")), dec("2.68"));
    }

    #[test]
    fn cents_round_trip() {
        let m = Money::from_cents(849_002);
        assert_eq!(m.as_decimal(), dec("8490.02"));
        assert_eq!(m.to_cents().unwrap(), 849_002);
        assert_eq!(Money::from_cents(-1250).to_cents().unwrap(), -1250);
    }

    #[test]
    fn from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(dec("10.005")).to_cents().unwrap(), 1001);
    }

    #[test]
    fn display_formats_sign_before_symbol() {
        assert_eq!(Money::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Money::from_cents(-500).to_string(), "-$5.00");
    }

    #[test]
    fn decimal_from_f64_rejects_non_finite() {
        assert!(matches!(decimal_from_f64(f64::NAN), Err(MoneyError::NonFinite(_))));
        assert!(matches!(
            decimal_from_f64(f64::INFINITY),
            Err(MoneyError::NonFinite(_))
        ));
        assert_eq!(decimal_from_f64(110.0).unwrap(), dec("110"));
        assert_eq!(decimal_from_f64(12.5).unwrap(), dec("12.5"));
    }

    #[test]
    fn sum_and_negation() {
        let total: Money = [100, 250, -50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.to_cents().unwrap(), 300);
        assert_eq!((-Money::from_cents(300)).to_cents().unwrap(), -300);
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::zero().is_negative());
    }
}
