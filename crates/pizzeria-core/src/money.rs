//! # Money Module
//!
//! Provides the `Money` type for every price, total and cash amount in the
//! register.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A day of caja math in f64:                                             │
//! │    89.1 + 0.2 = 89.30000000000001  ❌ WRONG on the cash report          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    8910 + 20 = 8930 centavos, printed as $89.30                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pizzeria_core::money::Money;
//!
//! let grande = Money::from_units(150);
//! let total = grande * 2 + Money::from_cents(3000);
//! assert_eq!(total.to_string(), "$330.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Percentage;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: cash expenses and reconciliation deltas go negative
/// - **Single field tuple struct**: serializes as a plain JSON number
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use pizzeria_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(8910).to_string(), "$89.10");
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units (pesos).
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion, truncated toward zero.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
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

    /// Multiplies money by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }

    /// Applies a percentage and rounds the result to a whole currency unit,
    /// half-up.
    ///
    /// ## Rounding Policy
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP (not bankers rounding)                               │
    /// │                                                                     │
    /// │    $99.00  × 90% = $89.10 → remainder .10 < .50 → $89.00            │
    /// │    $101.00 × 90% = $90.90 → remainder .90 ≥ .50 → $91.00            │
    /// │    $105.00 × 90% = $94.50 → remainder .50 ≥ .50 → $95.00            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ```rust
    /// use pizzeria_core::money::Money;
    /// use pizzeria_core::types::Percentage;
    ///
    /// let payable = Money::from_units(101).percent_rounded_to_unit(Percentage::from_bps(9000));
    /// assert_eq!(payable, Money::from_units(91));
    /// ```
    pub fn percent_rounded_to_unit(&self, rate: Percentage) -> Money {
        // centavos × bps is in units of 1/1_000_000 of a peso
        const SCALE: i128 = 100 * 10_000;
        let scaled = self.0 as i128 * rate.bps() as i128;
        let units = (scaled + SCALE / 2).div_euclid(SCALE);
        Money::from_cents((units * 100) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money with two decimals, the format used on every ticket.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.units().abs(), self.cents_part())
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

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
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
