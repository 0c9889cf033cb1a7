//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All arithmetic happens on integer cents. The backend REST API, however,
//! speaks JSON decimals (`1200.5` meaning $1200.50), so `Money` carries
//! custom serde implementations that convert between the two at the wire
//! boundary. Inside this workspace a price is never a float.
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(total.cents(), 1599);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values represent refunds and balance credits
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: serializes as a 2-decimal JSON number for the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// let price = Money::from_pesos(1200); // $1200.00
    /// assert_eq!(price.cents(), 120_000);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cent portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// This is for debugging and logs. UI display goes through
/// `ClientConfig::format_currency` which handles the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summing an iterator of Money values (used for draft totals).
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Parses a user-entered amount string ("1200", "1200.5", "1200.50").
///
/// At most two decimal places are accepted; anything finer cannot be
/// represented as cents and is rejected rather than silently rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (raw, negative) = match s.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let (whole, frac) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };

        if frac.len() > 2 {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "at most 2 decimal places".to_string(),
            });
        }

        let invalid = |_| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "must be a number".to_string(),
        };

        let whole: i64 = whole.parse().map_err(invalid)?;
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            let parsed: i64 = frac.parse().map_err(invalid)?;
            if frac.len() == 1 {
                parsed * 10
            } else {
                parsed
            }
        };

        // User-typed digits can exceed what i64 cents hold; reject instead
        // of overflowing.
        let cents = whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac))
            .and_then(|cents| if negative { cents.checked_neg() } else { Some(cents) })
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "too large".to_string(),
            })?;
        Ok(Money(cents))
    }
}

// =============================================================================
// Wire Format
// =============================================================================
// The backend exchanges monetary values as plain JSON numbers with up to two
// decimal places. Serialization divides out the cents; deserialization
// multiplies back and rounds to the nearest cent.

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Money::from_cents((value * 100.0).round() as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.pesos(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_pesos() {
        assert_eq!(Money::from_pesos(1200).cents(), 120_000);
        assert_eq!(Money::from_pesos(-5).cents(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);
        c -= b;
        assert_eq!(c.cents(), 1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 50].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 400);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert_eq!(empty, Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_parse() {
        assert_eq!("1200".parse::<Money>().unwrap().cents(), 120_000);
        assert_eq!("1200.5".parse::<Money>().unwrap().cents(), 120_050);
        assert_eq!("1200.50".parse::<Money>().unwrap().cents(), 120_050);
        assert_eq!("0.07".parse::<Money>().unwrap().cents(), 7);
        assert_eq!("-5.50".parse::<Money>().unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Money>().is_err());
        assert!("   ".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err()); // 3 decimals
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        // 17 digits of pesos do not fit in i64 cents.
        assert!("99999999999999999.99".parse::<Money>().is_err());
        assert!("-99999999999999999.99".parse::<Money>().is_err());

        // The largest representable amount still parses...
        let max = "92233720368547758.07".parse::<Money>().unwrap();
        assert_eq!(max.cents(), i64::MAX);
        // ...and one cent past it is rejected.
        assert!("92233720368547758.08".parse::<Money>().is_err());
    }

    #[test]
    fn test_wire_serialization() {
        // $1200.50 travels as the JSON number 1200.5
        let json = serde_json::to_string(&Money::from_cents(120_050)).unwrap();
        assert_eq!(json, "1200.5");

        let json = serde_json::to_string(&Money::from_cents(30_000)).unwrap();
        assert_eq!(json, "300.0");
    }

    #[test]
    fn test_wire_deserialization() {
        let money: Money = serde_json::from_str("1200.5").unwrap();
        assert_eq!(money.cents(), 120_050);

        // Integers are accepted too
        let money: Money = serde_json::from_str("300").unwrap();
        assert_eq!(money.cents(), 30_000);

        // Float noise rounds to the nearest cent
        let money: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(money.cents(), 10);
    }
}
