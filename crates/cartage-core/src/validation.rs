//! # Validation Module
//!
//! Structural checks on carts, lines, products and customers. Pricing only
//! ever sees the output of [`validate_cart`], so no money is computed for a
//! cart that would fail here.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Order                                   │
//! │                                                                         │
//! │  1. Cart        empty? ─────────────────────────────► InvalidCart       │
//! │                                                                         │
//! │  2. For each line, in cart order:                                       │
//! │     a. product present? ────────────────────────────► InvalidItem       │
//! │     b. quantity > 0? ───────────────────────────────► InvalidItem       │
//! │     c. product:                                                         │
//! │        dimensions → weight → price → category → name → description      │
//! │                                         └───────────► InvalidProduct    │
//! │                                                                         │
//! │  The FIRST violation wins. A cart with several problems always reports  │
//! │  the same one.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartage_core::validation::validate_cart;
//! use cartage_core::{Cart, CartId, CustomerId, ValidationError};
//!
//! let cart = Cart::new(CartId(1), CustomerId(1));
//! assert_eq!(validate_cart(&cart).unwrap_err(), ValidationError::InvalidCart);
//! ```

use rust_decimal::Decimal;

use crate::error::{CustomerDefect, ItemDefect, ProductDefect, ValidationError, ValidationResult};
use crate::types::{Cart, CartLine, Category, Customer, Product};

// =============================================================================
// Validated View
// =============================================================================

/// A cart line that passed validation.
///
/// Holds the resolved product and its category so the calculators never
/// have to deal with absent values.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedLine<'a> {
    pub product: &'a Product,
    pub category: Category,
    pub quantity: i64,
}

impl ValidatedLine<'_> {
    /// Quantity as a decimal, for weight and volume math.
    #[inline]
    pub fn quantity_decimal(&self) -> Decimal {
        Decimal::from(self.quantity)
    }
}

/// A cart whose every line passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedCart<'a> {
    lines: Vec<ValidatedLine<'a>>,
}

impl<'a> ValidatedCart<'a> {
    /// Lines in cart order.
    pub fn lines(&self) -> &[ValidatedLine<'a>] {
        &self.lines
    }
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a whole cart and returns its validated view.
///
/// ## Rules
/// - The cart must have at least one line
/// - Every line must pass [`validate_line`], checked in cart order
pub fn validate_cart(cart: &Cart) -> ValidationResult<ValidatedCart<'_>> {
    if cart.lines.is_empty() {
        return Err(ValidationError::InvalidCart);
    }

    let lines = cart
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| validate_line(index, line))
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(ValidatedCart { lines })
}

/// Validates a single cart line. `index` is only used for error context.
pub fn validate_line(index: usize, line: &CartLine) -> ValidationResult<ValidatedLine<'_>> {
    let product = line.product.as_ref().ok_or(ValidationError::InvalidItem {
        line: index,
        defect: ItemDefect::MissingProduct,
    })?;

    if line.quantity <= 0 {
        return Err(ValidationError::InvalidItem {
            line: index,
            defect: ItemDefect::Quantity,
        });
    }

    let category = validate_product(product)?;

    Ok(ValidatedLine {
        product,
        category,
        quantity: line.quantity,
    })
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product and returns its category.
///
/// ## Rules (checked in this order)
/// - height, width and length must all be positive
/// - weight must be positive
/// - unit price must be positive
/// - category must be set
/// - name must not be blank
/// - description must be set and not blank
pub fn validate_product(product: &Product) -> ValidationResult<Category> {
    let reject = |defect| ValidationError::InvalidProduct {
        product_id: product.id,
        defect,
    };

    if !is_positive(product.height) || !is_positive(product.width) || !is_positive(product.length)
    {
        return Err(reject(ProductDefect::Dimensions));
    }

    if !is_positive(product.weight) {
        return Err(reject(ProductDefect::Weight));
    }

    if !product.unit_price.is_positive() {
        return Err(reject(ProductDefect::Price));
    }

    let category = product
        .category
        .ok_or_else(|| reject(ProductDefect::Category))?;

    if is_blank(&product.name) {
        return Err(reject(ProductDefect::Name));
    }

    match product.description.as_deref() {
        Some(description) if !is_blank(description) => Ok(category),
        _ => Err(reject(ProductDefect::Description)),
    }
}

// =============================================================================
// Customer Validators
// =============================================================================

/// Validates the purchasing customer.
///
/// Region and tier are total by construction; only the name can be wrong.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    if is_blank(&customer.name) {
        return Err(ValidationError::InvalidCustomer {
            defect: CustomerDefect::Name,
        });
    }

    Ok(())
}

#[inline]
fn is_positive(value: Decimal) -> bool {
    value > Decimal::ZERO
}

#[inline]
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{CartId, CustomerId, LoyaltyTier, ProductId, Region};
    use rust_decimal_macros::dec;

    fn mouse() -> Product {
        Product {
            id: ProductId(1),
            name: "Mouse".to_string(),
            description: Some("Optical mouse".to_string()),
            category: Some(Category::Electronics),
            unit_price: Money::from_cents(1000),
            weight: dec!(0.20),
            height: dec!(10),
            width: dec!(5),
            length: dec!(5),
            fragile: false,
        }
    }

    fn cart_with(product: Product, quantity: i64) -> Cart {
        Cart::new(CartId(1), CustomerId(1)).with_line(product, quantity)
    }

    fn product_defect(product: Product) -> ProductDefect {
        match validate_cart(&cart_with(product, 1)).unwrap_err() {
            ValidationError::InvalidProduct { defect, .. } => defect,
            other => panic!("expected product defect, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_cart_passes() {
        let cart = cart_with(mouse(), 2);
        let validated = validate_cart(&cart).unwrap();

        assert_eq!(validated.lines().len(), 1);
        assert_eq!(validated.lines()[0].category, Category::Electronics);
        assert_eq!(validated.lines()[0].quantity_decimal(), dec!(2));
    }

    #[test]
    fn test_empty_cart_is_invalid() {
        let cart = Cart::new(CartId(1), CustomerId(1));
        assert_eq!(validate_cart(&cart).unwrap_err(), ValidationError::InvalidCart);
    }

    #[test]
    fn test_missing_product() {
        let mut cart = cart_with(mouse(), 1);
        cart.lines.push(CartLine {
            product: None,
            quantity: 1,
        });

        assert_eq!(
            validate_cart(&cart).unwrap_err(),
            ValidationError::InvalidItem {
                line: 1,
                defect: ItemDefect::MissingProduct
            }
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        for qty in [0, -1] {
            assert_eq!(
                validate_cart(&cart_with(mouse(), qty)).unwrap_err(),
                ValidationError::InvalidItem {
                    line: 0,
                    defect: ItemDefect::Quantity
                }
            );
        }
    }

    #[test]
    fn test_quantity_checked_before_product() {
        let mut broken = mouse();
        broken.weight = dec!(0);

        assert_eq!(
            validate_cart(&cart_with(broken, 0)).unwrap_err().code(),
            "item.quantity.invalid"
        );
    }

    #[test]
    fn test_each_dimension_is_checked() {
        for field in 0..3 {
            let mut p = mouse();
            match field {
                0 => p.height = dec!(0),
                1 => p.width = dec!(-1),
                _ => p.length = dec!(0),
            }
            assert_eq!(product_defect(p), ProductDefect::Dimensions);
        }
    }

    #[test]
    fn test_single_product_defects() {
        let mut p = mouse();
        p.weight = dec!(0);
        assert_eq!(product_defect(p), ProductDefect::Weight);

        let mut p = mouse();
        p.unit_price = Money::zero();
        assert_eq!(product_defect(p), ProductDefect::Price);

        let mut p = mouse();
        p.category = None;
        assert_eq!(product_defect(p), ProductDefect::Category);

        let mut p = mouse();
        p.name = "   ".to_string();
        assert_eq!(product_defect(p), ProductDefect::Name);

        let mut p = mouse();
        p.description = None;
        assert_eq!(product_defect(p), ProductDefect::Description);

        let mut p = mouse();
        p.description = Some("\t".to_string());
        assert_eq!(product_defect(p), ProductDefect::Description);
    }

    /// With every field broken, each fix reveals the next defect in order.
    #[test]
    fn test_first_violation_wins() {
        let mut p = Product {
            id: ProductId(9),
            name: String::new(),
            description: None,
            category: None,
            unit_price: Money::from_cents(-1),
            weight: dec!(-1),
            height: dec!(0),
            width: dec!(0),
            length: dec!(0),
            fragile: true,
        };

        assert_eq!(product_defect(p.clone()), ProductDefect::Dimensions);
        p.height = dec!(1);
        p.width = dec!(1);
        p.length = dec!(1);
        assert_eq!(product_defect(p.clone()), ProductDefect::Weight);
        p.weight = dec!(1);
        assert_eq!(product_defect(p.clone()), ProductDefect::Price);
        p.unit_price = Money::from_cents(1);
        assert_eq!(product_defect(p.clone()), ProductDefect::Category);
        p.category = Some(Category::Toys);
        assert_eq!(product_defect(p.clone()), ProductDefect::Name);
        p.name = "Kite".to_string();
        assert_eq!(product_defect(p.clone()), ProductDefect::Description);
        p.description = Some("Paper kite".to_string());
        assert!(validate_cart(&cart_with(p, 1)).is_ok());
    }

    #[test]
    fn test_lines_checked_in_order() {
        let mut bad_price = mouse();
        bad_price.unit_price = Money::zero();
        let mut cart = cart_with(bad_price, 1);
        cart.lines.push(CartLine {
            product: None,
            quantity: 1,
        });

        assert_eq!(
            validate_cart(&cart).unwrap_err().code(),
            "product.price.invalid"
        );
    }

    #[test]
    fn test_validate_customer() {
        let mut customer = Customer {
            id: CustomerId(1),
            name: "Ana".to_string(),
            region: Region::South,
            tier: LoyaltyTier::Silver,
        };
        assert!(validate_customer(&customer).is_ok());

        customer.name = " ".to_string();
        assert_eq!(
            validate_customer(&customer).unwrap_err().code(),
            "customer.name.invalid"
        );
    }
}
