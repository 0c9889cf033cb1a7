//! # Quantity Module
//!
//! Provides the `Quantity` type and the unit-type rules that govern it.
//!
//! Products are sold either by weight (`kg`, fractional quantities up to two
//! decimal places) or by count (`unidades`, whole numbers only). Quantities
//! are stored as integer hundredths, mirroring how [`Money`](crate::money)
//! stores cents, so the two-decimal granularity rule holds structurally: a
//! quantity with three decimal places simply cannot be represented.
//!
//! ## Dual entry
//! For weight-based products the counter staff can type either a weight or a
//! currency amount, and the other value is derived:
//!
//! ```rust
//! use mostrador_core::money::Money;
//! use mostrador_core::quantity::Quantity;
//!
//! let per_kg = Money::from_pesos(1200);
//!
//! // "$300 of cheese, please"
//! let qty = Quantity::from_amount(Money::from_pesos(300), per_kg);
//! assert_eq!(qty.hundredths(), 25); // 0.25 kg
//!
//! // and back again, to the cent
//! assert_eq!(qty.amount_at(per_kg), Money::from_pesos(300));
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Quantity Type
// =============================================================================

/// A product quantity in hundredths of a unit.
///
/// `Quantity(150)` means 1.50 kg for weight-based products or would be an
/// invalid fractional count for unit-based ones; the granularity check lives
/// in [`UnitType::validate_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from hundredths of a unit.
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Quantity(hundredths)
    }

    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 100)
    }

    /// Returns the quantity in hundredths of a unit.
    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional portion in hundredths (always 0-99).
    #[inline]
    pub const fn hundredths_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Checks if the quantity is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the quantity is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the quantity is an exact number of whole units.
    #[inline]
    pub const fn is_whole_units(&self) -> bool {
        self.0 % 100 == 0
    }

    /// Derives the quantity that a currency amount buys at a unit price.
    ///
    /// Used by the amount-entry mode of the quantity modal: the staff types
    /// "$300" and the scale weight is derived. Rounds half-up to the nearest
    /// hundredth. A zero or negative unit price yields a zero quantity.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use mostrador_core::quantity::Quantity;
    ///
    /// let qty = Quantity::from_amount(Money::from_pesos(1500), Money::from_pesos(1000));
    /// assert_eq!(qty.hundredths(), 150); // 1.50 kg
    /// ```
    pub fn from_amount(amount: Money, unit_price: Money) -> Self {
        if !unit_price.is_positive() {
            return Quantity::zero();
        }
        let price = unit_price.cents() as i128;
        let hundredths = (amount.cents() as i128 * 100 + price / 2) / price;
        Quantity(hundredths as i64)
    }

    /// Computes the currency amount this quantity costs at a unit price.
    ///
    /// This is the single line-total formula: every draft line's `total` is
    /// produced here. Rounds half-up to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use mostrador_core::quantity::Quantity;
    ///
    /// let half_kilo = Quantity::from_hundredths(50);
    /// assert_eq!(half_kilo.amount_at(Money::from_pesos(1200)).cents(), 60_000);
    /// ```
    pub fn amount_at(&self, unit_price: Money) -> Money {
        let cents = (unit_price.cents() as i128 * self.0 as i128 + 50) / 100;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays the quantity with the fewest decimals that preserve it
/// ("3", "1.5", "0.25").
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = (self.0 / 100).abs();
        let frac = (self.0 % 100).abs();
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else if frac % 10 == 0 {
            write!(f, "{}{}.{}", sign, whole, frac / 10)
        } else {
            write!(f, "{}{}.{:02}", sign, whole, frac)
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Parses a user-entered quantity string ("3", "1.5", "0.25").
///
/// Negative quantities and more than two decimal places are rejected.
impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "quantity".to_string(),
            });
        }
        if s.starts_with('-') {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if frac.len() > 2 {
            return Err(ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: "at most 2 decimal places".to_string(),
            });
        }

        let invalid = |_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
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

        // User-typed digits can exceed what i64 hundredths hold; reject
        // instead of overflowing.
        let hundredths = whole
            .checked_mul(100)
            .and_then(|hundredths| hundredths.checked_add(frac))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: "too large".to_string(),
            })?;
        Ok(Quantity(hundredths))
    }
}

// =============================================================================
// Wire Format
// =============================================================================
// Like Money, quantities travel as plain JSON numbers ("1.5" kg).

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Quantity::from_hundredths((value * 100.0).round() as i64))
    }
}

// =============================================================================
// Unit Type
// =============================================================================

/// How a product is measured and sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// Sold by weight; quantities accept up to two decimal places.
    Kg,
    /// Sold by discrete count; quantities must be whole numbers.
    #[default]
    Unidades,
}

impl UnitType {
    /// Checks a quantity against this unit type's granularity rules.
    ///
    /// ## Rules
    /// - Must be positive for both unit types
    /// - `Unidades` additionally requires a whole number of units
    ///
    /// The two-decimal ceiling for `Kg` needs no check here: `Quantity`
    /// cannot hold anything finer than a hundredth.
    pub fn validate_quantity(&self, qty: Quantity) -> Result<(), ValidationError> {
        if !qty.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        if matches!(self, UnitType::Unidades) && !qty.is_whole_units() {
            return Err(ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: "must be a whole number of units".to_string(),
            });
        }
        Ok(())
    }

    /// Formats a stock or quantity value for display.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::quantity::{Quantity, UnitType};
    ///
    /// assert_eq!(UnitType::Kg.format_quantity(Quantity::from_hundredths(150)), "1.50 kg");
    /// assert_eq!(UnitType::Unidades.format_quantity(Quantity::from_units(3)), "3 un.");
    /// ```
    pub fn format_quantity(&self, qty: Quantity) -> String {
        match self {
            UnitType::Kg => {
                let sign = if qty.hundredths() < 0 { "-" } else { "" };
                format!("{}{}.{:02} kg", sign, qty.units().abs(), qty.hundredths_part())
            }
            UnitType::Unidades => format!("{} un.", qty),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units_and_hundredths() {
        assert_eq!(Quantity::from_units(3).hundredths(), 300);
        assert_eq!(Quantity::from_hundredths(150).units(), 1);
        assert_eq!(Quantity::from_hundredths(150).hundredths_part(), 50);
        assert!(Quantity::from_units(3).is_whole_units());
        assert!(!Quantity::from_hundredths(150).is_whole_units());
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::from_units(3).to_string(), "3");
        assert_eq!(Quantity::from_hundredths(150).to_string(), "1.5");
        assert_eq!(Quantity::from_hundredths(25).to_string(), "0.25");
        assert_eq!(Quantity::from_hundredths(-150).to_string(), "-1.5");
    }

    #[test]
    fn test_parse() {
        assert_eq!("3".parse::<Quantity>().unwrap().hundredths(), 300);
        assert_eq!("1.5".parse::<Quantity>().unwrap().hundredths(), 150);
        assert_eq!("0.25".parse::<Quantity>().unwrap().hundredths(), 25);
        assert_eq!("1.05".parse::<Quantity>().unwrap().hundredths(), 105);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Quantity>().is_err());
        assert!("-1".parse::<Quantity>().is_err());
        assert!("1.555".parse::<Quantity>().is_err()); // 3 decimals
        assert!("abc".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        // 17 digits of units do not fit in i64 hundredths.
        assert!("99999999999999999.99".parse::<Quantity>().is_err());

        // The largest representable quantity still parses...
        let max = "92233720368547758.07".parse::<Quantity>().unwrap();
        assert_eq!(max.hundredths(), i64::MAX);
        // ...and one hundredth past it is rejected.
        assert!("92233720368547758.08".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_amount_at() {
        // 0.25 kg at $1200.00/kg = $300.00
        let qty = Quantity::from_hundredths(25);
        assert_eq!(qty.amount_at(Money::from_pesos(1200)).cents(), 30_000);

        // 3 units at $2.99 = $8.97
        let qty = Quantity::from_units(3);
        assert_eq!(qty.amount_at(Money::from_cents(299)).cents(), 897);
    }

    #[test]
    fn test_from_amount() {
        // $300 at $1200/kg buys 0.25 kg
        let qty = Quantity::from_amount(Money::from_pesos(300), Money::from_pesos(1200));
        assert_eq!(qty.hundredths(), 25);

        // $1500 at $1000/kg buys 1.50 kg
        let qty = Quantity::from_amount(Money::from_pesos(1500), Money::from_pesos(1000));
        assert_eq!(qty.hundredths(), 150);

        // A free product derives nothing rather than dividing by zero
        let qty = Quantity::from_amount(Money::from_pesos(300), Money::zero());
        assert!(qty.is_zero());
    }

    #[test]
    fn test_amount_round_trip_within_one_cent() {
        // An awkward price: $3.33/kg. $10.00 buys 3.00 kg (rounded down from
        // 3.003), which recomputes to $9.99. Off by at most one cent.
        let price = Money::from_cents(333);
        let amount = Money::from_pesos(10);

        let qty = Quantity::from_amount(amount, price);
        let recomputed = qty.amount_at(price);

        let diff = (recomputed - amount).abs();
        assert!(diff.cents() <= 1, "diff was {}", diff);
    }

    #[test]
    fn test_unidades_requires_whole_units() {
        assert!(UnitType::Unidades.validate_quantity(Quantity::from_units(3)).is_ok());
        assert!(UnitType::Unidades
            .validate_quantity(Quantity::from_hundredths(150))
            .is_err());
    }

    #[test]
    fn test_kg_allows_fractions_but_not_zero() {
        assert!(UnitType::Kg.validate_quantity(Quantity::from_hundredths(25)).is_ok());
        assert!(UnitType::Kg.validate_quantity(Quantity::zero()).is_err());
        assert!(UnitType::Kg.validate_quantity(Quantity::from_hundredths(-50)).is_err());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(
            UnitType::Kg.format_quantity(Quantity::from_hundredths(150)),
            "1.50 kg"
        );
        assert_eq!(
            UnitType::Kg.format_quantity(Quantity::from_hundredths(5)),
            "0.05 kg"
        );
        assert_eq!(UnitType::Unidades.format_quantity(Quantity::from_units(12)), "12 un.");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&Quantity::from_hundredths(150)).unwrap();
        assert_eq!(json, "1.5");

        let qty: Quantity = serde_json::from_str("2.5").unwrap();
        assert_eq!(qty.hundredths(), 250);

        let qty: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(qty.hundredths(), 300);
    }

    #[test]
    fn test_unit_type_wire_names() {
        assert_eq!(serde_json::to_string(&UnitType::Kg).unwrap(), "\"kg\"");
        assert_eq!(serde_json::to_string(&UnitType::Unidades).unwrap(), "\"unidades\"");
    }
}
