//! # Pricing Engine
//!
//! Pure functions from (cart, region, loyalty tier) to the amount charged.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Cart ──► validate_cart() ──► ValidatedCart                            │
//! │                                   │                                     │
//! │                  ┌────────────────┴────────────────┐                    │
//! │                  ▼                                 ▼                    │
//! │          subtotal::calculate              freight::calculate            │
//! │          (category, cart tiers)           (weight, fragile,             │
//! │                  │                          region, loyalty)            │
//! │                  └────────────────┬────────────────┘                    │
//! │                                   ▼                                     │
//! │                  total = (subtotal + freight).round_half_up()           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation always runs first: a cart that fails it never reaches the
//! calculators, so no partial price is ever produced. Arithmetic is checked;
//! a valid cart whose amounts overflow fails with
//! [`ValidationError::AmountOutOfRange`] instead of panicking.
//!
//! ## Usage
//! ```rust
//! use cartage_core::pricing::compute_total;
//! use cartage_core::{Cart, CartId, Category, CustomerId, LoyaltyTier, Money, Product, ProductId, Region};
//! use rust_decimal_macros::dec;
//!
//! let mouse = Product {
//!     id: ProductId(1),
//!     name: "Mouse".into(),
//!     description: Some("Optical mouse".into()),
//!     category: Some(Category::Electronics),
//!     unit_price: Money::new(dec!(10.00)),
//!     weight: dec!(0.2),
//!     height: dec!(10),
//!     width: dec!(5),
//!     length: dec!(5),
//!     fragile: false,
//! };
//! let cart = Cart::new(CartId(1), CustomerId(1)).with_line(mouse, 1);
//!
//! let total = compute_total(&cart, Region::Southeast, LoyaltyTier::Bronze).unwrap();
//! assert_eq!(total.amount(), dec!(10.00));
//! ```

pub mod freight;
pub mod policy;
pub mod subtotal;

use serde::Serialize;
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{Cart, LoyaltyTier, Percentage, Region};
use crate::validation::validate_cart;

pub use freight::FreightBreakdown;
pub use policy::{
    CartDiscountTier, FreightPolicy, LineCountTier, LoyaltyDiscounts, PricingPolicy,
    RegionMultipliers, SubtotalPolicy, WeightBand,
};
pub use subtotal::{CategorySubtotal, SubtotalBreakdown};

// =============================================================================
// Pricing Result
// =============================================================================

/// A priced cart.
///
/// `subtotal` and `freight` keep full precision; only `total` is rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PricingResult {
    pub categories: Vec<CategorySubtotal>,
    pub cart_discount: Percentage,
    /// Merchandise value after both discount stages.
    pub subtotal: Money,
    pub freight_breakdown: FreightBreakdown,
    /// Freight after region and loyalty.
    pub freight: Money,
    /// `subtotal + freight`, rounded half-up to 2 dp. This is what is charged.
    pub total: Money,
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Prices carts against an immutable [`PricingPolicy`].
#[derive(Debug, Clone)]
pub struct PricingEngine {
    policy: PricingPolicy,
}

impl PricingEngine {
    /// Creates an engine for a policy. The policy should already have passed
    /// [`PricingPolicy::validate`].
    pub fn new(policy: PricingPolicy) -> Self {
        PricingEngine { policy }
    }

    /// Creates an engine with the standard tables.
    pub fn standard() -> Self {
        Self::new(PricingPolicy::STANDARD)
    }

    /// Validates and prices a cart, returning every intermediate.
    pub fn price(
        &self,
        cart: &Cart,
        region: Region,
        tier: LoyaltyTier,
    ) -> ValidationResult<PricingResult> {
        let validated = validate_cart(cart)?;
        let lines = validated.lines();

        let subtotal = subtotal::calculate(&self.policy.subtotal, lines)?;
        let freight_breakdown = freight::calculate(
            &self.policy.freight,
            &self.policy.regions,
            &self.policy.loyalty,
            lines,
            region,
            tier,
        )?;
        let freight = freight_breakdown.freight;
        let total = subtotal
            .subtotal
            .checked_add(freight)
            .ok_or(ValidationError::AmountOutOfRange)?
            .round_half_up();

        Ok(PricingResult {
            categories: subtotal.categories,
            cart_discount: subtotal.cart_discount,
            subtotal: subtotal.subtotal,
            freight_breakdown,
            freight,
            total,
        })
    }

    /// Validates and prices a cart, returning only the amount to charge.
    pub fn compute_total(
        &self,
        cart: &Cart,
        region: Region,
        tier: LoyaltyTier,
    ) -> ValidationResult<Money> {
        self.price(cart, region, tier).map(|result| result.total)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Prices a cart with the standard tables.
pub fn compute_total(cart: &Cart, region: Region, tier: LoyaltyTier) -> ValidationResult<Money> {
    PricingEngine::standard().compute_total(cart, region, tier)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductDefect;
    use crate::types::{CartId, Category, CustomerId, Product, ProductId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn product(price: Decimal, weight: Decimal, fragile: bool) -> Product {
        Product {
            id: ProductId(1),
            name: "Widget".to_string(),
            description: Some("A widget".to_string()),
            category: Some(Category::Electronics),
            unit_price: Money::new(price),
            weight,
            height: dec!(10),
            width: dec!(5),
            length: dec!(5),
            fragile,
        }
    }

    fn cart(product: Product, quantity: i64) -> Cart {
        Cart::new(CartId(1), CustomerId(1)).with_line(product, quantity)
    }

    fn total(cart: &Cart) -> Decimal {
        compute_total(cart, Region::Southeast, LoyaltyTier::Bronze)
            .unwrap()
            .amount()
    }

    #[test]
    fn test_plain_item_no_discount_no_freight() {
        assert_eq!(total(&cart(product(dec!(10.00), dec!(0.2), false), 1)), dec!(10.00));
    }

    #[test]
    fn test_cart_discount_scenario() {
        assert_eq!(total(&cart(product(dec!(600.00), dec!(0.2), false), 1)), dec!(540.00));
    }

    #[test]
    fn test_weight_charge_scenario() {
        assert_eq!(total(&cart(product(dec!(0.01), dec!(6.00), false), 1)), dec!(24.01));
    }

    #[test]
    fn test_fragile_scenario() {
        assert_eq!(total(&cart(product(dec!(0.01), dec!(0.001), true), 3)), dec!(15.03));
    }

    #[test]
    fn test_total_is_rounded_half_up() {
        // 0.01 + 15.225 freight (SOUTH, SILVER, 6 kg + 1 fragile) = 15.235 → 15.24
        let mut tiny = product(dec!(0.00001), dec!(0.01), true);
        tiny.height = dec!(1);
        tiny.width = dec!(1);
        tiny.length = dec!(1);
        let c = Cart::new(CartId(1), CustomerId(1))
            .with_line(product(dec!(0.01), dec!(5.99), false), 1)
            .with_line(tiny, 1);

        let result = PricingEngine::standard()
            .price(&c, Region::South, LoyaltyTier::Silver)
            .unwrap();

        assert_eq!(result.freight.amount(), dec!(15.225));
        assert_eq!(result.total.amount(), dec!(15.24));
    }

    #[test]
    fn test_breakdown_adds_up() {
        let c = cart(product(dec!(600.00), dec!(6.00), true), 1);
        let result = PricingEngine::standard()
            .price(&c, Region::North, LoyaltyTier::Bronze)
            .unwrap();

        assert_eq!(result.categories.len(), 1);
        assert_eq!(result.cart_discount.bps(), 1000);
        assert_eq!(result.subtotal.amount(), dec!(540.00));
        // (24.00 + 5.00) × 1.30
        assert_eq!(result.freight.amount(), dec!(37.70));
        assert_eq!(result.total.amount(), dec!(577.70));
    }

    #[test]
    fn test_gold_pays_no_freight() {
        let c = cart(product(dec!(10.00), dec!(60.00), true), 2);
        let gold = compute_total(&c, Region::North, LoyaltyTier::Gold).unwrap();
        assert_eq!(gold.amount(), dec!(20.00));
    }

    #[test]
    fn test_invalid_cart_is_never_priced() {
        let mut broken = product(dec!(10.00), dec!(1), false);
        broken.height = dec!(0);

        assert_eq!(
            compute_total(&cart(broken, 1), Region::North, LoyaltyTier::Bronze),
            Err(ValidationError::InvalidProduct {
                product_id: ProductId(1),
                defect: ProductDefect::Dimensions
            })
        );
        assert_eq!(
            compute_total(&Cart::new(CartId(1), CustomerId(1)), Region::North, LoyaltyTier::Bronze),
            Err(ValidationError::InvalidCart)
        );
    }

    #[test]
    fn test_pricing_is_pure() {
        let c = cart(product(dec!(133.33), dec!(7.77), true), 3);
        let engine = PricingEngine::standard();

        let first = engine.price(&c, Region::Midwest, LoyaltyTier::Silver).unwrap();
        for _ in 0..10 {
            assert_eq!(
                engine.price(&c, Region::Midwest, LoyaltyTier::Silver).unwrap(),
                first
            );
        }
    }

    #[test]
    fn test_custom_policy() {
        let mut policy = PricingPolicy::STANDARD;
        policy.freight.fragile_fee_per_unit = Money::new(dec!(1.00));
        let engine = PricingEngine::new(policy);

        let c = cart(product(dec!(0.01), dec!(0.001), true), 3);
        let total = engine
            .compute_total(&c, Region::Southeast, LoyaltyTier::Bronze)
            .unwrap();
        assert_eq!(total.amount(), dec!(3.03));
    }

    #[test]
    fn test_oversized_cart_is_rejected_not_panicking() {
        let mut giant = product(dec!(10.00), dec!(1), false);
        giant.height = dec!(10000000000);
        giant.width = dec!(10000000000);
        giant.length = dec!(10000000000);
        assert_eq!(
            compute_total(&cart(giant, 1), Region::North, LoyaltyTier::Bronze),
            Err(ValidationError::AmountOutOfRange)
        );

        let pricey = product(dec!(100000000000), dec!(0.2), false);
        assert_eq!(
            compute_total(&cart(pricey, i64::MAX), Region::North, LoyaltyTier::Bronze),
            Err(ValidationError::AmountOutOfRange)
        );
        assert_eq!(
            ValidationError::AmountOutOfRange.code(),
            "cart.amount.out_of_range"
        );
    }
}
