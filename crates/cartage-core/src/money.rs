//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Freight bands compare at exact boundaries:                             │
//! │    5.00 kg → no charge,  5.01 kg → 5.01 × 2.00 + 12.00                  │
//! │  A float that lands on 5.0000000001 bills the customer $22.00 extra.    │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 decimals (rust_decimal)                         │
//! │    Intermediate values keep full precision                              │
//! │    Rounding happens ONCE, explicitly, half-up to 2 places               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartage_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let price = Money::new(dec!(10.99));
//! let line = price.checked_multiply_quantity(3); // 32.97
//! assert_eq!(line.map(|m| m.amount()), Some(dec!(32.97)));
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::types::Percentage;

/// Number of decimal places a charged amount carries.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount backed by an exact decimal.
///
/// ## Design Decisions
/// - **Unrounded by default**: arithmetic keeps every digit; callers decide
///   when to round with [`Money::round_half_up`]
/// - **Signed**: discounts are computed as amounts and subtracted
/// - **Serialized as a string**: `"10.00"` survives JSON round trips exactly
///
/// ## Where Money is Used
/// ```text
/// Product.unit_price ──► line total ──► category subtotal ──► cart subtotal
///                                                                  │
/// weight charge + fragile charge ──► region ──► loyalty ──► freight│
///                                                                  ▼
///                                                   total (rounded, charged)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    ///
    /// `const` so pricing tables can be declared with `dec!` literals.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use cartage_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::from_cents(1099).amount(), dec!(10.99));
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_SCALE))
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds to two decimal places, ties away from zero (half-up).
    ///
    /// ## Why Half-Up and not Bankers Rounding?
    /// The charged total must match what the storefront has always shown;
    /// that contract is "round half up". 0.005 → 0.01, 0.015 → 0.02.
    ///
    /// ## Example
    /// ```rust
    /// use cartage_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::new(dec!(10.005)).round_half_up().amount(), dec!(10.01));
    /// assert_eq!(Money::new(dec!(10.004)).round_half_up().amount(), dec!(10.00));
    /// ```
    pub fn round_half_up(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies money by a quantity, or `None` if the product overflows.
    ///
    /// ## Example
    /// ```rust
    /// use cartage_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Multiplies money by a decimal factor (rates, multipliers), unrounded.
    ///
    /// Returns `None` on overflow.
    #[inline]
    pub fn checked_scale(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sums amounts, stopping at the first overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Returns the discount amount for a percentage, unrounded.
    ///
    /// Rates are at most 100%, so the result never exceeds `self`.
    #[inline]
    pub fn discount_for(&self, rate: Percentage) -> Money {
        Money(self.0 * rate.as_fraction())
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// Computed as `amount - amount × rate`, never rounded.
    ///
    /// ## Example
    /// ```rust
    /// use cartage_core::money::Money;
    /// use cartage_core::types::Percentage;
    ///
    /// let subtotal = Money::from_cents(10000); // 100.00
    /// let discounted = subtotal.apply_discount(Percentage::from_bps(1000)); // 10% off
    /// assert_eq!(discounted, Money::from_cents(9000));
    /// ```
    pub fn apply_discount(&self, rate: Percentage) -> Money {
        *self - self.discount_for(rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded half-up to two places, e.g. `$10.00`.
///
/// ## Note
/// This is for logs and the quote tool. Client code formats from the
/// serialized string.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_half_up().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
