//! # Money Module
//!
//! Display-side money: euro amounts rounded to the cent.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compute_quote ──► CostBreakdown (f64, unrounded)                       │
//! │                          │                                              │
//! │                          ├──► Quote.price_ht  (stored unrounded)        │
//! │                          │                                              │
//! │                          └──► Money::from_amount ──► "31.60 €"          │
//! │                                (display only)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine works in `f64` so that re-pricing a stored
//! configuration reproduces the stored price bit for bit. `Money` is never
//! fed back into a calculation.
//!
//! ## Usage
//! ```rust
//! use devis_core::money::Money;
//!
//! let ht = Money::from_amount(31.60390485);
//! assert_eq!(ht.cents(), 3160);
//! assert_eq!(ht.to_string(), "31.60 €");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A euro amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a computed euro amount to the nearest cent, halves away from
    /// zero.
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(6.32078097).cents(), 632);
    /// assert_eq!(Money::from_amount(-0.125).cents(), -13);
    /// ```
    ///
    /// Non-finite amounts (a zero machine cadence yields infinity) display
    /// as zero.
    ///
    /// The web app rounds the binary value itself, so on an amount that sits
    /// exactly on a half cent the two displays can differ by one cent.
    pub fn from_amount(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole euros portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
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
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// French-style amount with a dot separator: `"1234.50 €"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} €",
            sign,
            self.euros().abs(),
            self.cents_part()
        )
    }
}

/// Formats a computed amount for display.
pub fn format_eur(amount: f64) -> String {
    Money::from_amount(amount).to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_amount_rounds_to_cent() {
        assert_eq!(Money::from_amount(2.3856525).cents(), 239);
        assert_eq!(Money::from_amount(15.0).cents(), 1500);
        assert_eq!(Money::from_amount(37.92468582).cents(), 3792);
        assert_eq!(Money::from_amount(0.0).cents(), 0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert!(Money::from_amount(f64::INFINITY).is_zero());
        assert!(Money::from_amount(f64::NAN).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(3160).to_string(), "31.60 €");
        assert_eq!(Money::from_cents(5).to_string(), "0.05 €");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50 €");
        assert_eq!(format_eur(125.5), "125.50 €");
    }

    #[test]
    fn test_exact_half_cent_rounds_away_from_zero() {
        // 0.125 and 0.375 are exact in binary
        assert_eq!(Money::from_amount(0.125).cents(), 13);
        assert_eq!(Money::from_amount(-0.125).cents(), -13);
        assert_eq!(format_eur(0.375), "0.38 €");
    }
}
