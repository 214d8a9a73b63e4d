//! # Money Module
//!
//! Provides the `Money` type: a monetary value **as displayed**.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  COMPUTATION vs PRESENTATION                                            │
//! │                                                                         │
//! │  Engine (Decimal, unrounded):                                           │
//! │    1300 / 1.18 = 1101.694915254237288135593220                          │
//! │                                                                         │
//! │  Display (Money, paise, half-up):                                       │
//! │    Money::from_decimal(...) = 110169 paise → "₹1101.69"                 │
//! │                                                                         │
//! │  Rounding happens ONCE, here. Recomputations never see a rounded        │
//! │  value, so repeated recalculation cannot compound rounding error.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_core::money::Money;
//!
//! let price = Money::from_paise(123450);
//! assert_eq!(price.to_string(), "₹1234.50");
//!
//! let tax = Money::from_decimal(Decimal::new(991525, 4)); // 99.1525
//! assert_eq!(tax.paise(), 9915);
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::CURRENCY_SYMBOL;

/// Decimal places shown to the customer.
const DISPLAY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A display amount in paise (1/100 rupee).
///
/// ## Where Money is Used
/// ```text
/// PricingBreakdown (Decimal) ──► display() ──► DisplayBreakdown (Money)
///                                                   │
///                                                   ▼
///                                        "₹1234.50" in every screen
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Rounds an engine amount to 2 decimals, half-up, for display.
    ///
    /// ## Half-Up (midpoint away from zero)
    /// ```text
    /// 99.1525  → 99.15
    /// 0.125    → 0.13
    /// -0.125   → -0.13
    /// 449.9999999999999999999999999 → 450.00
    /// ```
    ///
    /// Amounts beyond the `i64` paise range saturate.
    pub fn from_decimal(amount: Decimal) -> Self {
        let mut rounded = amount
            .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(DISPLAY_DECIMAL_PLACES);
        let paise = rounded.mantissa();
        Money(paise.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Returns the exact decimal value of this display amount.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, DISPLAY_DECIMAL_PLACES)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(1099).rupees(), 10);
    /// assert_eq!(Money::from_paise(-550).rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    /// Formats with an arbitrary currency symbol.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(-550).format_with_symbol("Rs. "), "-Rs. 5.50");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.rupees().abs(),
            self.paise_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `₹1234.50`, or `-₹5.50` for negative amounts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(CURRENCY_SYMBOL))
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

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
