//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The UI sends prices as JS numbers:                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An arqueo that is off by a fraction of a cent never balances.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Floats are converted ONCE at the command boundary                   │
//! │    (Money::try_from_major) and never seen again.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::Money;
//! use mostrador_core::quantity::Quantity;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(total.cents(), 1599);
//!
//! // 0.25 kg at $10.99/kg
//! let line = price.times(Quantity::from_hundredths(25));
//! assert_eq!(line.cents(), 275);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::quantity::Quantity;

/// Largest absolute major-unit amount accepted from the UI.
const MAX_MAJOR: f64 = 1e13;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed: expense aggregates, net results and arqueo discrepancies can all
/// be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a major-unit number coming from the UI into cents.
    ///
    /// Rounds to the nearest cent. Rejects NaN, infinities and absurdly
    /// large magnitudes.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// assert_eq!(Money::try_from_major(12.5, "amount").unwrap().cents(), 1250);
    /// assert!(Money::try_from_major(f64::NAN, "amount").is_err());
    /// ```
    pub fn try_from_major(value: f64, field: &str) -> Result<Money, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        if value.abs() > MAX_MAJOR {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                min: -(MAX_MAJOR as i64),
                max: MAX_MAJOR as i64,
            });
        }

        Ok(Money((value * 100.0).round() as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies a unit price by a quantity expressed in hundredths.
    ///
    /// ## Rounding
    /// `price × hundredths / 100`, rounded half away from zero to the cent.
    /// This is THE line-total formula: order running totals, sale totals and
    /// the commit total check all go through it, so they always agree.
    ///
    /// ```text
    /// 0.37 kg × $10.99 = 406.63 cents → 407 cents
    /// 3 units × $2.99  = 897 cents    → 897 cents (exact)
    /// ```
    pub fn times(&self, quantity: Quantity) -> Money {
        let raw = self.0 as i128 * quantity.hundredths() as i128;
        let rounded = if raw >= 0 {
            (raw + 50) / 100
        } else {
            (raw - 50) / 100
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display. The UI formats with the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
