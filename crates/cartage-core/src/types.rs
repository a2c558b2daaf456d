//! # Domain Types
//!
//! Core domain types used throughout Cartage.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Cart       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  customer_id    │   │  id             │       │
//! │  │  name           │   │  lines ─────────┼──►│  category       │       │
//! │  │  region         │   │   (CartLine)    │   │  unit_price     │       │
//! │  │  tier           │   └─────────────────┘   │  weight / dims  │       │
//! │  └─────────────────┘                         │  fragile        │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Percentage    │   │     Region      │   │  LoyaltyTier    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  NORTH ...      │   │  BRONZE         │       │
//! │  │  1500 = 15%     │   │  MIDWEST        │   │  SILVER, GOLD   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Loaded, not trusted
//! Carts and products arrive from external stores. Fields that those stores
//! may leave empty (`product`, `category`, `description`, `quantity`) are
//! modelled so that a missing value deserializes instead of failing, and
//! [`crate::validation`] reports it with a precise reason.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::UnknownVariant;
use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (the largest line-count discount)
///
/// Integers keep the pricing tables readable in TOML and exact in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// 100%, in basis points.
    pub const FULL_BPS: u32 = 10_000;

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    /// One hundred percent.
    #[inline]
    pub const fn full() -> Self {
        Percentage(Self::FULL_BPS)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the rate as an exact fraction: 1500 bps → 0.1500.
    #[inline]
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Returns `1 - rate`, the factor left after the discount.
    #[inline]
    pub fn remaining_fraction(&self) -> Decimal {
        Decimal::ONE - self.as_fraction()
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", Decimal::new(i64::from(self.0), 2).normalize())
    }
}

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

numeric_id!(
    /// Product identifier, as issued by the catalog store.
    ProductId
);
numeric_id!(
    /// Cart identifier.
    CartId
);
numeric_id!(
    /// Customer identifier.
    CustomerId
);
numeric_id!(
    /// Payment transaction identifier, as issued by the payment gateway.
    TransactionId
);

// =============================================================================
// Category
// =============================================================================

/// Product classification used to group cart lines for tiered discounting.
///
/// The declaration order is only used to make grouping deterministic; it
/// carries no pricing meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Category {
    Electronics,
    Apparel,
    Food,
    Books,
    Furniture,
    Home,
    Toys,
}

// =============================================================================
// Region
// =============================================================================

/// Delivery region of a customer. Drives the freight multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Region {
    North,
    Northeast,
    South,
    Southeast,
    Midwest,
}

impl Region {
    /// All regions, in declaration order.
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::Northeast,
        Region::South,
        Region::Southeast,
        Region::Midwest,
    ];
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::North => write!(f, "NORTH"),
            Region::Northeast => write!(f, "NORTHEAST"),
            Region::South => write!(f, "SOUTH"),
            Region::Southeast => write!(f, "SOUTHEAST"),
            Region::Midwest => write!(f, "MIDWEST"),
        }
    }
}

impl FromStr for Region {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .replace(|c: char| c == '_' || c == '-', "");

        match normalized.as_str() {
            "north" => Ok(Region::North),
            "northeast" => Ok(Region::Northeast),
            "south" => Ok(Region::South),
            "southeast" => Ok(Region::Southeast),
            "midwest" => Ok(Region::Midwest),
            _ => Err(UnknownVariant {
                kind: "region",
                value: s.to_string(),
                expected: "north, northeast, south, southeast, midwest",
            }),
        }
    }
}

// =============================================================================
// Loyalty Tier
// =============================================================================

/// Customer classification. Drives the freight discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
}

impl Default for LoyaltyTier {
    fn default() -> Self {
        LoyaltyTier::Bronze
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoyaltyTier::Bronze => write!(f, "BRONZE"),
            LoyaltyTier::Silver => write!(f, "SILVER"),
            LoyaltyTier::Gold => write!(f, "GOLD"),
        }
    }
}

impl FromStr for LoyaltyTier {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bronze" => Ok(LoyaltyTier::Bronze),
            "silver" => Ok(LoyaltyTier::Silver),
            "gold" => Ok(LoyaltyTier::Gold),
            _ => Err(UnknownVariant {
                kind: "loyalty tier",
                value: s.to_string(),
                expected: "bronze, silver, gold",
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as stored in the catalog.
///
/// Dimensions are in centimetres, weight in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name. Must not be blank.
    #[serde(default)]
    pub name: String,

    /// Description. Must be present and not blank.
    #[serde(default)]
    pub description: Option<String>,

    /// Classification used for line-count discounts.
    #[serde(default)]
    pub category: Option<Category>,

    /// Price of one unit.
    pub unit_price: Money,

    /// Physical weight of one unit (kg).
    #[ts(type = "string")]
    pub weight: Decimal,

    /// Height of one unit (cm).
    #[ts(type = "string")]
    pub height: Decimal,

    /// Width of one unit (cm).
    #[ts(type = "string")]
    pub width: Decimal,

    /// Length of one unit (cm).
    #[ts(type = "string")]
    pub length: Decimal,

    /// Fragile items pay a per-unit handling surcharge.
    #[serde(default)]
    pub fragile: bool,
}

impl Product {
    /// Returns height × width × length (cm³), or `None` if it overflows.
    #[inline]
    pub fn volume(&self) -> Option<Decimal> {
        self.height
            .checked_mul(self.width)?
            .checked_mul(self.length)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A line in a cart: one product and how many units of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// The product, if the store could resolve it.
    #[serde(default)]
    pub product: Option<Product>,

    /// Units ordered. A missing quantity deserializes as 0 and fails
    /// validation.
    #[serde(default)]
    pub quantity: i64,
}

impl CartLine {
    /// Creates a line for a resolved product.
    pub fn new(product: Product, quantity: i64) -> Self {
        CartLine {
            product: Some(product),
            quantity,
        }
    }
}

/// A shopping cart owned by one customer.
///
/// Line order is preserved when talking to inventory; it has no effect on
/// the price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub id: CartId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new(id: CartId, customer_id: CustomerId) -> Self {
        Cart {
            id,
            customer_id,
            lines: Vec::new(),
        }
    }

    /// Appends a line and returns the cart (builder style).
    pub fn with_line(mut self, product: Product, quantity: i64) -> Self {
        self.lines.push(CartLine::new(product, quantity));
        self
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer as stored in the customer directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default)]
    pub name: String,
    pub region: Region,
    #[serde(default)]
    pub tier: LoyaltyTier,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_from_bps() {
        let rate = Percentage::from_bps(1500);
        assert_eq!(rate.bps(), 1500);
        assert_eq!(rate.as_fraction(), dec!(0.15));
        assert_eq!(rate.remaining_fraction(), dec!(0.85));
        assert_eq!(rate.to_string(), "15%");
        assert_eq!(Percentage::from_bps(550).to_string(), "5.5%");
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("north".parse::<Region>().unwrap(), Region::North);
        assert_eq!("NORTHEAST".parse::<Region>().unwrap(), Region::Northeast);
        assert_eq!("south_east".parse::<Region>().unwrap(), Region::Southeast);
        assert_eq!(" Midwest ".parse::<Region>().unwrap(), Region::Midwest);
        assert!("atlantis".parse::<Region>().is_err());
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("gold".parse::<LoyaltyTier>().unwrap(), LoyaltyTier::Gold);
        assert_eq!("Silver".parse::<LoyaltyTier>().unwrap(), LoyaltyTier::Silver);
        assert!("platinum".parse::<LoyaltyTier>().is_err());
        assert_eq!(LoyaltyTier::default(), LoyaltyTier::Bronze);
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for region in Region::ALL {
            assert_eq!(region.to_string().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn test_cart_line_missing_fields_deserialize() {
        let line: CartLine = serde_json::from_str("{}").unwrap();
        assert!(line.product.is_none());
        assert_eq!(line.quantity, 0);

        let cart: Cart = serde_json::from_str(r#"{"id": 1, "customer_id": 7}"#).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.customer_id, CustomerId(7));
    }

    #[test]
    fn test_product_json_shape() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Mouse",
                "description": "Optical mouse",
                "category": "ELECTRONICS",
                "unit_price": "10.00",
                "weight": "0.20",
                "height": "10",
                "width": "5",
                "length": "5"
            }"#,
        )
        .unwrap();

        assert_eq!(product.category, Some(Category::Electronics));
        assert_eq!(product.unit_price, Money::from_cents(1000));
        assert_eq!(product.volume(), Some(dec!(250)));
        assert!(!product.fragile);
    }

    #[test]
    fn test_volume_overflow_is_none() {
        let mut product: Product = serde_json::from_str(
            r#"{"id": 1, "unit_price": "1.00", "weight": "1", "height": "1", "width": "1", "length": "1"}"#,
        )
        .unwrap();
        product.height = dec!(10000000000);
        product.width = dec!(10000000000);
        product.length = dec!(10000000000);

        assert_eq!(product.volume(), None);
    }
}
