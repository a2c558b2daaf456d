//! # Error Types
//!
//! Domain-specific error types for cartage-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartage-core errors (this file)                                       │
//! │  ├── ValidationError  - Cart / item / product / customer defects       │
//! │  ├── PolicyError      - Malformed pricing tables                       │
//! │  └── UnknownVariant   - Unparseable region / tier names                │
//! │                                                                         │
//! │  cartage-checkout errors (separate crate)                              │
//! │  ├── CheckoutError    - OutOfStock, PaymentDenied, ...                 │
//! │  └── ConfigError      - checkout.toml problems                         │
//! │                                                                         │
//! │  Flow: ValidationError → CheckoutError → caller                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every validation failure has a fixed message and a stable reason code
//! 3. Errors are enum variants, never String
//! 4. The reason code is what callers match on and log; messages may be shown

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Validation Error
// =============================================================================

/// Why a cart line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDefect {
    /// The line does not reference a product.
    MissingProduct,
    /// Quantity is zero or negative.
    Quantity,
}

impl ItemDefect {
    fn code(&self) -> &'static str {
        match self {
            ItemDefect::MissingProduct => "item.product.invalid",
            ItemDefect::Quantity => "item.quantity.invalid",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ItemDefect::MissingProduct => "Cart item has an invalid product",
            ItemDefect::Quantity => "Cart item has an invalid quantity",
        }
    }
}

/// Why a product was rejected.
///
/// Variants are listed in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductDefect {
    /// Height, width or length is zero or negative.
    Dimensions,
    /// Physical weight is zero or negative.
    Weight,
    /// Unit price is zero or negative.
    Price,
    /// No category assigned.
    Category,
    /// Name is blank.
    Name,
    /// Description is missing or blank.
    Description,
}

impl ProductDefect {
    fn code(&self) -> &'static str {
        match self {
            ProductDefect::Dimensions => "product.dimensions.invalid",
            ProductDefect::Weight => "product.weight.invalid",
            ProductDefect::Price => "product.price.invalid",
            ProductDefect::Category => "product.category.invalid",
            ProductDefect::Name => "product.name.invalid",
            ProductDefect::Description => "product.description.invalid",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ProductDefect::Dimensions => "Product has invalid dimensions",
            ProductDefect::Weight => "Product has an invalid weight",
            ProductDefect::Price => "Product has an invalid price",
            ProductDefect::Category => "Product has an invalid category",
            ProductDefect::Name => "Product has an invalid name",
            ProductDefect::Description => "Product has an invalid description",
        }
    }
}

/// Why a customer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerDefect {
    /// Name is blank.
    Name,
}

/// Structural violations found before any money is computed.
///
/// ## User Workflow
/// ```text
/// Cart loaded ──► validate_cart() ──► InvalidProduct { Weight }
///                                          │
///                                          ▼
///                     "Product has an invalid weight" (product.weight.invalid)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Cart has no lines.
    #[error("Cart is invalid for purchase")]
    InvalidCart,

    /// A cart line is malformed. `line` is the zero-based line index.
    #[error("{}", .defect.message())]
    InvalidItem { line: usize, defect: ItemDefect },

    /// A product referenced by the cart is malformed.
    #[error("{}", .defect.message())]
    InvalidProduct {
        product_id: ProductId,
        defect: ProductDefect,
    },

    /// The purchasing customer is malformed.
    #[error("Customer has an invalid name")]
    InvalidCustomer { defect: CustomerDefect },

    /// Prices, quantities or dimensions are individually valid but their
    /// products exceed the decimal range.
    #[error("Cart amounts are too large to price")]
    AmountOutOfRange,
}

impl ValidationError {
    /// Stable reason code, suitable for logs and client-side lookups.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidCart => "cart.invalid",
            ValidationError::InvalidItem { defect, .. } => defect.code(),
            ValidationError::InvalidProduct { defect, .. } => defect.code(),
            ValidationError::InvalidCustomer {
                defect: CustomerDefect::Name,
            } => "customer.name.invalid",
            ValidationError::AmountOutOfRange => "cart.amount.out_of_range",
        }
    }
}

// =============================================================================
// Policy Error
// =============================================================================

/// A pricing policy that cannot be applied consistently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Tiers must be listed from the highest threshold down, strictly.
    #[error("{table} tiers must be in strictly descending order")]
    UnorderedTiers { table: &'static str },

    /// A discount above 100% would produce negative prices.
    #[error("{field} must be between 0% and 100%, got {bps} bps")]
    PercentageOutOfRange { field: &'static str, bps: u32 },

    /// Divisors and multipliers must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Fees, rates and limits where zero is meaningful.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: &'static str },

    /// Weight bands must rise from the free-weight limit upward.
    #[error("weight bands must be ascending and above the free weight limit")]
    UnorderedBands,
}

// =============================================================================
// Parse Error
// =============================================================================

/// A region or tier name that does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: '{value}'. Valid options: {expected}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
