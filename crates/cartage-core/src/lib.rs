//! # cartage-core: Pure Pricing Logic for Cartage
//!
//! This crate is the **heart** of Cartage. It decides whether a cart can be
//! purchased and exactly how much it costs, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartage Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               cartage-checkout (async orchestration)            │   │
//! │  │   resolve ──► availability ──► price ──► pay ──► decrement     │   │
//! │  │        (compensates payment when the decrement fails)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ cartage-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation│  │  pricing  │  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │  │ subtotal  │  │   │
//! │  │   │   Cart    │  │  rounding │  │   order   │  │  freight  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Cart, Customer, Region, etc.)
//! - [`money`] - Exact decimal Money with explicit half-up rounding
//! - [`error`] - Validation and policy error types
//! - [`validation`] - Structural checks run before any money is computed
//! - [`pricing`] - Subtotal and freight calculators, pricing tables
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same cart, region and tier always give the same total
//! 2. **No I/O**: stores, inventory and payment live in `cartage-checkout`
//! 3. **Exact Money**: decimals, never floats; round once at the end
//! 4. **Explicit Errors**: every rejection has a stable reason code
//!
//! ## Example Usage
//!
//! ```rust
//! use cartage_core::money::Money;
//! use cartage_core::types::Percentage;
//!
//! // 600.00 is above the 500.00 cart tier: 10% off.
//! let subtotal = Money::from_cents(60000);
//! let discounted = subtotal.apply_discount(Percentage::from_bps(1000));
//!
//! assert_eq!(discounted, Money::from_cents(54000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cartage_core::Money` instead of
// `use cartage_core::money::Money`

pub use error::{PolicyError, ValidationError, ValidationResult};
pub use money::Money;
pub use pricing::{compute_total, PricingEngine, PricingPolicy, PricingResult};
pub use types::*;
