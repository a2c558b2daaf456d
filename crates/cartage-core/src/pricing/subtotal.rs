//! # Subtotal Calculator
//!
//! Two-stage discounting of the merchandise value.
//!
//! ```text
//! lines ──► group by category ──► raw Σ(price × qty)
//!                                   │
//!                 line-count tier ──┤  raw − raw × rate, rounded 2 dp
//!                                   ▼
//!                        Σ category subtotals = cart sum
//!                                   │
//!                   cart-level tier ┤  sum − sum × rate, unrounded
//!                                   ▼
//!                                subtotal
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use super::policy::SubtotalPolicy;
use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{Category, Percentage};
use crate::validation::ValidatedLine;

/// Discounted value of one category's lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CategorySubtotal {
    pub category: Category,
    /// Number of cart lines in the category (not units).
    pub line_count: usize,
    /// Σ(unit price × quantity) before any discount.
    pub raw: Money,
    pub discount: Percentage,
    /// `raw − raw × discount`, rounded half-up to 2 dp.
    pub subtotal: Money,
}

/// Result of the subtotal stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SubtotalBreakdown {
    /// One entry per category present in the cart, in category order.
    pub categories: Vec<CategorySubtotal>,
    /// Σ category subtotals; the base for the cart-level tier.
    pub cart_sum: Money,
    pub cart_discount: Percentage,
    /// Final subtotal, unrounded.
    pub subtotal: Money,
}

#[derive(Default)]
struct Group {
    line_count: usize,
    raw: Money,
}

/// Applies category and cart-level discounts to validated lines.
///
/// Fails with [`ValidationError::AmountOutOfRange`] if a line total or a sum
/// overflows.
pub fn calculate(
    policy: &SubtotalPolicy,
    lines: &[ValidatedLine<'_>],
) -> ValidationResult<SubtotalBreakdown> {
    let mut groups: BTreeMap<Category, Group> = BTreeMap::new();
    for line in lines {
        let line_total = line
            .product
            .unit_price
            .checked_multiply_quantity(line.quantity)
            .ok_or(ValidationError::AmountOutOfRange)?;
        let group = groups.entry(line.category).or_default();
        group.line_count += 1;
        group.raw = group
            .raw
            .checked_add(line_total)
            .ok_or(ValidationError::AmountOutOfRange)?;
    }

    let categories: Vec<CategorySubtotal> = groups
        .into_iter()
        .map(|(category, group)| {
            let discount = policy.line_count_discount(group.line_count);
            CategorySubtotal {
                category,
                line_count: group.line_count,
                raw: group.raw,
                discount,
                subtotal: group.raw.apply_discount(discount).round_half_up(),
            }
        })
        .collect();

    let cart_sum = Money::checked_sum(categories.iter().map(|c| c.subtotal))
        .ok_or(ValidationError::AmountOutOfRange)?;
    let cart_discount = policy.cart_discount(cart_sum);

    Ok(SubtotalBreakdown {
        categories,
        cart_sum,
        cart_discount,
        subtotal: cart_sum.apply_discount(cart_discount),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cart, CartId, CustomerId, Product, ProductId};
    use crate::validation::validate_cart;
    use rust_decimal_macros::dec;

    fn product(category: Category, cents: i64) -> Product {
        Product {
            id: ProductId(cents),
            name: "Item".to_string(),
            description: Some("An item".to_string()),
            category: Some(category),
            unit_price: Money::from_cents(cents),
            weight: dec!(0.1),
            height: dec!(1),
            width: dec!(1),
            length: dec!(1),
            fragile: false,
        }
    }

    fn subtotal_of(cart: &Cart) -> SubtotalBreakdown {
        let validated = validate_cart(cart).unwrap();
        calculate(&SubtotalPolicy::STANDARD, validated.lines()).unwrap()
    }

    fn cart_of(lines: &[(Category, i64, i64)]) -> Cart {
        lines
            .iter()
            .fold(Cart::new(CartId(1), CustomerId(1)), |cart, (c, cents, qty)| {
                cart.with_line(product(*c, *cents), *qty)
            })
    }

    #[test]
    fn test_no_discount_below_thresholds() {
        let result = subtotal_of(&cart_of(&[(Category::Books, 1000, 1)]));

        assert_eq!(result.categories.len(), 1);
        assert!(result.categories[0].discount.is_zero());
        assert!(result.cart_discount.is_zero());
        assert_eq!(result.subtotal.amount(), dec!(10.00));
    }

    #[test]
    fn test_cart_discount_boundaries() {
        let at_500 = subtotal_of(&cart_of(&[(Category::Books, 50000, 1)]));
        assert_eq!(at_500.subtotal.amount(), dec!(500.00));

        let above_500 = subtotal_of(&cart_of(&[(Category::Books, 50001, 1)]));
        assert_eq!(above_500.cart_discount.bps(), 1000);
        assert_eq!(above_500.subtotal.amount(), dec!(450.009));

        let at_1000 = subtotal_of(&cart_of(&[(Category::Books, 100000, 1)]));
        assert_eq!(at_1000.subtotal.amount(), dec!(900.00));

        let above_1000 = subtotal_of(&cart_of(&[(Category::Books, 100001, 1)]));
        assert_eq!(above_1000.cart_discount.bps(), 2000);
        assert_eq!(above_1000.subtotal.amount(), dec!(800.008));
    }

    /// Quantity does not count towards the line-count tier.
    #[test]
    fn test_line_count_ignores_quantity() {
        let result = subtotal_of(&cart_of(&[(Category::Food, 100, 50)]));
        assert!(result.categories[0].discount.is_zero());
        assert_eq!(result.subtotal.amount(), dec!(50.00));
    }

    #[test]
    fn test_line_count_tiers() {
        for (lines, bps) in [(2, 0), (3, 500), (4, 500), (5, 1000), (7, 1000), (8, 1500)] {
            let rows: Vec<(Category, i64, i64)> =
                (0..lines).map(|_| (Category::Toys, 1000, 1)).collect();
            let result = subtotal_of(&cart_of(&rows));
            let group = &result.categories[0];

            assert_eq!(group.line_count, lines);
            assert_eq!(group.discount.bps(), bps, "lines={lines}");
        }
    }

    #[test]
    fn test_categories_are_discounted_independently() {
        // Three apparel lines (5% off) next to two food lines (no discount).
        let cart = cart_of(&[
            (Category::Apparel, 2000, 1),
            (Category::Food, 500, 2),
            (Category::Apparel, 2000, 1),
            (Category::Food, 500, 1),
            (Category::Apparel, 2000, 1),
        ]);
        let result = subtotal_of(&cart);

        let apparel = &result.categories[0];
        assert_eq!(apparel.category, Category::Apparel);
        assert_eq!(apparel.raw.amount(), dec!(60.00));
        assert_eq!(apparel.subtotal.amount(), dec!(57.00));

        let food = &result.categories[1];
        assert_eq!(food.category, Category::Food);
        assert_eq!(food.subtotal.amount(), dec!(15.00));

        assert_eq!(result.cart_sum.amount(), dec!(72.00));
        assert_eq!(result.subtotal.amount(), dec!(72.00));
    }

    /// Six lines of 133.33 in one category: 799.98 raw, 10% off → 719.982,
    /// rounded to 719.98, then 10% off the cart.
    #[test]
    fn test_both_stages_apply() {
        let rows: Vec<(Category, i64, i64)> =
            (0..6).map(|_| (Category::Home, 13333, 1)).collect();
        let result = subtotal_of(&cart_of(&rows));

        assert_eq!(result.categories[0].subtotal.amount(), dec!(719.98));
        assert_eq!(result.cart_discount.bps(), 1000);
        assert_eq!(result.subtotal.amount(), dec!(647.982));
    }

    #[test]
    fn test_cart_tier_uses_discounted_category_sum() {
        // 8 lines × 70.00 = 560.00 raw, 15% off → 476.00: below the 500 tier.
        let rows: Vec<(Category, i64, i64)> =
            (0..8).map(|_| (Category::Electronics, 7000, 1)).collect();
        let result = subtotal_of(&cart_of(&rows));

        assert_eq!(result.cart_sum.amount(), dec!(476.00));
        assert!(result.cart_discount.is_zero());
    }

    #[test]
    fn test_line_total_overflow_is_out_of_range() {
        let mut expensive = product(Category::Electronics, 100);
        expensive.unit_price = Money::new(dec!(100000000000));
        let cart = Cart::new(CartId(1), CustomerId(1)).with_line(expensive, i64::MAX);
        let validated = validate_cart(&cart).unwrap();

        assert_eq!(
            calculate(&SubtotalPolicy::STANDARD, validated.lines()),
            Err(ValidationError::AmountOutOfRange)
        );
    }
}
