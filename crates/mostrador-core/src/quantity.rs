//! # Quantity Module
//!
//! Stock levels and line quantities, stored as integer hundredths.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UnitOfMeasure::Unit          UnitOfMeasure::Kg                         │
//! │  ───────────────────          ─────────────────                         │
//! │  3 units  → 300               0.25 kg → 25                              │
//! │  step: 100 (whole units)      step: 1 (0.01 kg)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Same reasoning as [`Money`](crate::money::Money): the UI sends numbers,
//! the engine keeps integers, so stock arithmetic is exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

/// Hundredths per whole unit.
pub const HUNDREDTHS_PER_UNIT: i64 = 100;

const MAX_INPUT: f64 = 1e12;

/// A quantity of product in hundredths of its unit of measure.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Quantity(hundredths)
    }

    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * HUNDREDTHS_PER_UNIT)
    }

    /// Converts a UI number (e.g. `0.35` kg) into hundredths.
    ///
    /// Rejects NaN/infinite values and anything finer than 0.01.
    ///
    /// ```rust
    /// use mostrador_core::quantity::Quantity;
    ///
    /// assert_eq!(Quantity::try_from_f64(0.35, "quantity").unwrap().hundredths(), 35);
    /// assert!(Quantity::try_from_f64(0.355, "quantity").is_err());
    /// ```
    pub fn try_from_f64(value: f64, field: &str) -> Result<Quantity, ValidationError> {
        if !value.is_finite() || value.abs() > MAX_INPUT {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let scaled = value * HUNDREDTHS_PER_UNIT as f64;
        let rounded = scaled.round();
        // tolerate float noise like 0.1 * 100 = 10.000000000000002
        if (scaled - rounded).abs() > 1e-6 {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "must have at most two decimals".to_string(),
            });
        }

        Ok(Quantity(rounded as i64))
    }

    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// True when the quantity is a whole number of units.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % HUNDREDTHS_PER_UNIT == 0
    }

    /// Value as a float, for display only.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / HUNDREDTHS_PER_UNIT as f64
    }
}

/// Whole quantities print without decimals ("3"), fractional ones with
/// two ("0.35").
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / HUNDREDTHS_PER_UNIT;
        let frac = abs % HUNDREDTHS_PER_UNIT;
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            write!(f, "{}{}.{:02}", sign, whole, frac)
        }
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Quantity::from_units(3).to_string(), "3");
        assert_eq!(Quantity::from_hundredths(35).to_string(), "0.35");
        assert_eq!(Quantity::from_hundredths(250).to_string(), "2.50");
        assert_eq!(Quantity::from_hundredths(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_try_from_f64() {
        assert_eq!(Quantity::try_from_f64(2.0, "q").unwrap(), Quantity::from_units(2));
        assert_eq!(Quantity::try_from_f64(0.1, "q").unwrap().hundredths(), 10);
        assert_eq!(Quantity::try_from_f64(1.15, "q").unwrap().hundredths(), 115);
        assert!(Quantity::try_from_f64(0.001, "q").is_err());
        assert!(Quantity::try_from_f64(f64::NAN, "q").is_err());
        assert!(Quantity::try_from_f64(f64::NEG_INFINITY, "q").is_err());
    }

    #[test]
    fn test_is_whole() {
        assert!(Quantity::from_units(4).is_whole());
        assert!(!Quantity::from_hundredths(150).is_whole());
        assert!(Quantity::zero().is_whole());
    }
}
