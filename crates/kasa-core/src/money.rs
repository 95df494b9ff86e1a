//! # Money Type
//!
//! Integer-backed monetary values in the smallest currency unit.
//!
//! ## Why Integers?
//! Floating point cannot represent most decimal fractions exactly, and
//! rounding drift in a ledger is unacceptable. All amounts are stored and
//! computed as `i64` subunits; conversion to a display string happens only
//! at the very edge.
//!
//! ## Usage
//! ```rust
//! use kasa_core::money::Money;
//!
//! let price = Money::from_cents(1000);
//! let subtotal = price.checked_mul(3).unwrap();
//! assert_eq!(subtotal.cents(), 3000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A monetary amount in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from subunits. Never construct from floats.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the amount in subunits.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the amount is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Overflow-checked addition.
    pub fn checked_add(self, other: Money) -> CoreResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }

    /// Overflow-checked multiplication by a quantity.
    ///
    /// This is the line-subtotal operation: unit price x quantity.
    pub fn checked_mul(self, quantity: i64) -> CoreResult<Money> {
        self.0
            .checked_mul(quantity)
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }
}

impl fmt::Display for Money {
    /// Formats as major.minor assuming 100 subunits per major unit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
