//! # Money Module
//!
//! Provides the `Money` and `TaxRate` types used by the cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers:                              │
//! │    unitListPrice = 0.1, quantity = 3 → 0.30000000000000004  ❌          │
//! │                                                                         │
//! │  OUR SOLUTION: convert ONCE at the boundary, then integer minor units   │
//! │    Money::from_decimal(0.1) = 10 paise, × 3 = 30 paise   ✅             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::{Money, TaxRate};
//!
//! let price = Money::from_decimal(1099.50);
//! assert_eq!(price.minor(), 109950);
//!
//! let tax = price.calculate_tax(TaxRate::from_percentage(18.0));
//! assert_eq!(tax.to_decimal(), 197.91);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

/// Minor units per major unit (paise per rupee, cents per dollar).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Arithmetic saturates at the `i64` bounds instead of overflowing.
///
/// ## Where Money is Used
/// ```text
/// CartLine.unitListPrice (f64) ──► Money::from_decimal ──► line total
///                                                            │
///                              CartValue.* (f64) ◄── to_decimal ◄── sums
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Converts a decimal amount from the backend into minor units.
    ///
    /// Rounds half away from zero to the nearest minor unit. Non-finite
    /// input is treated as zero.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.995).minor(), 1100);
    /// assert_eq!(Money::from_decimal(-5.5).minor(), -550);
    /// assert_eq!(Money::from_decimal(f64::NAN).minor(), 0);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // Nudge by a tiny epsilon so 10.995 (stored as 10.99499..) rounds up
        let scaled = amount * MINOR_PER_MAJOR as f64;
        Money((scaled + scaled.signum() * 1e-6).round() as i64)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal amount for the wire format.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Returns the whole major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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

    /// Calculates tax at the given rate, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::{Money, TaxRate};
    ///
    /// let taxable = Money::from_minor(1000); // 10.00
    /// let tax = taxable.calculate_tax(TaxRate::from_bps(825)); // 8.25%
    /// assert_eq!(tax.minor(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large B2B order values from overflowing
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000).div_euclid(10000);
        Money::from_wide(tax)
    }

    /// Multiplies money by a (possibly fractional) quantity.
    ///
    /// B2B lines are sold in units like kilograms or metres, so quantities
    /// are not always whole.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3.0).minor(), 897);
    /// assert_eq!(unit_price.multiply_quantity(0.5).minor(), 150);
    /// ```
    pub fn multiply_quantity(&self, qty: f64) -> Self {
        if !qty.is_finite() {
            return Money::zero();
        }
        Money((self.0 as f64 * qty).round() as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (1000 = 10%)
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let list = Money::from_minor(10000);
    /// assert_eq!(list.apply_percentage_discount(1000).minor(), 9000);
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        let discount_amount = (self.0 as i128 * discount_bps as i128 + 5000).div_euclid(10000);
        Money::from_wide(self.0 as i128 - discount_amount)
    }

    /// Clamps an `i128` intermediate into range.
    fn from_wide(value: i128) -> Money {
        Money(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Rounds to the nearest whole major unit, halves rounding up.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(123450).round_to_major().minor(), 123500);
    /// assert_eq!(Money::from_minor(123449).round_to_major().minor(), 123400);
    /// ```
    pub fn round_to_major(&self) -> Money {
        let half = MINOR_PER_MAJOR / 2;
        let rem = self.0.rem_euclid(MINOR_PER_MAJOR);
        let floor = self.0 - rem;
        if rem >= half {
            Money(floor.saturating_add(MINOR_PER_MAJOR))
        } else {
            Money(floor)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering for logs; currency symbols belong to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax or discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. GST slabs such as 0.25%, 2.5% and 9% are all
/// exact in bps, so rates never pick up float noise inside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a rate from a percentage as sent by the backend.
    ///
    /// Negative and non-finite percentages collapse to zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_rounds_to_minor_units() {
        assert_eq!(Money::from_decimal(10.99).minor(), 1099);
        assert_eq!(Money::from_decimal(0.1 + 0.2).minor(), 30);
        assert_eq!(Money::from_decimal(-5.5).minor(), -550);
        assert_eq!(Money::from_decimal(f64::INFINITY).minor(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "10.99");
        assert_eq!(Money::from_minor(500).to_string(), "5.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);

        let mut total = a;
        total += b;
        assert_eq!(total.minor(), 1500);
    }

    #[test]
    fn test_arithmetic_saturates_at_bounds() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!((max + Money::from_minor(1)).minor(), i64::MAX);
        assert_eq!((Money::from_minor(i64::MIN) - Money::from_minor(1)).minor(), i64::MIN);
        assert_eq!(max.round_to_major().minor(), i64::MAX - 7);
        assert_eq!(max.calculate_tax(TaxRate::from_percentage(200.0)).minor(), i64::MAX);
        assert_eq!(Money::from_minor(1).multiply_quantity(1.0e30).minor(), i64::MAX);
    }

    #[test]
    fn test_tax_calculation_gst_slab() {
        // 1,000.00 at 18% = 180.00
        let amount = Money::from_decimal(1000.0);
        let tax = amount.calculate_tax(TaxRate::from_percentage(18.0));
        assert_eq!(tax.minor(), 18000);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let tax = Money::from_minor(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.minor(), 83);
    }

    #[test]
    fn test_percentage_discount() {
        let list = Money::from_minor(10000);
        assert_eq!(list.apply_percentage_discount(1250).minor(), 8750);
    }

    #[test]
    fn test_round_to_major_negative_values() {
        assert_eq!(Money::from_minor(-150).round_to_major().minor(), -100);
        assert_eq!(Money::from_minor(-151).round_to_major().minor(), -200);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(9.0).bps(), 900);
        assert_eq!(TaxRate::from_percentage(0.25).bps(), 25);
        assert_eq!(TaxRate::from_percentage(-3.0).bps(), 0);
        assert_eq!(TaxRate::from_percentage(f64::NAN).bps(), 0);
    }
}
