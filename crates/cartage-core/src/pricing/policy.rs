//! # Pricing Policy
//!
//! Every rate, threshold and fee the calculators use, in one immutable value.
//!
//! ## Standard Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SUBTOTAL                                                               │
//! │    Lines per category   ≥ 8 → 15%   ≥ 5 → 10%   ≥ 3 → 5%               │
//! │    Cart sum             > 1000.00 → 20%   > 500.00 → 10%               │
//! │                                                                         │
//! │  FREIGHT                                                                │
//! │    Cubic weight         h × w × l / 6000                                │
//! │    Taxable weight       ≤ 5 kg free                                     │
//! │                         ≤ 10 kg → 2.00/kg   ≤ 50 kg → 4.00/kg           │
//! │                         > 50 kg → 7.00/kg   (+ 12.00 minimum fee)       │
//! │    Fragile              5.00 per unit                                   │
//! │                                                                         │
//! │  REGION                 SE 1.00  S 1.05  NE 1.10  MW 1.20  N 1.30       │
//! │  LOYALTY (freight)      BRONZE 0%   SILVER 50%   GOLD 100%              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`PricingPolicy::STANDARD`] is a `const`; deployments that tune the tables
//! load a policy once at start-up and never mutate it afterwards.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::money::Money;
use crate::types::{LoyaltyTier, Percentage, Region};

// =============================================================================
// Subtotal Policy
// =============================================================================

/// Cart-level discount applied when the cart sum is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDiscountTier {
    pub above: Money,
    pub discount: Percentage,
}

/// Category discount applied when a category has at least `min_lines` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCountTier {
    pub min_lines: usize,
    pub discount: Percentage,
}

/// Discount tables for the subtotal. Tiers are listed highest first and
/// the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtotalPolicy {
    pub cart_tiers: [CartDiscountTier; 2],
    pub line_count_tiers: [LineCountTier; 3],
}

impl SubtotalPolicy {
    pub const STANDARD: SubtotalPolicy = SubtotalPolicy {
        cart_tiers: [
            CartDiscountTier {
                above: Money::new(dec!(1000.00)),
                discount: Percentage::from_bps(2000),
            },
            CartDiscountTier {
                above: Money::new(dec!(500.00)),
                discount: Percentage::from_bps(1000),
            },
        ],
        line_count_tiers: [
            LineCountTier {
                min_lines: 8,
                discount: Percentage::from_bps(1500),
            },
            LineCountTier {
                min_lines: 5,
                discount: Percentage::from_bps(1000),
            },
            LineCountTier {
                min_lines: 3,
                discount: Percentage::from_bps(500),
            },
        ],
    };

    /// Cart-level discount for a cart sum. Thresholds are strict (`>`).
    pub fn cart_discount(&self, cart_sum: Money) -> Percentage {
        self.cart_tiers
            .iter()
            .find(|tier| cart_sum > tier.above)
            .map_or(Percentage::zero(), |tier| tier.discount)
    }

    /// Category discount for a number of lines. Thresholds are inclusive (`≥`).
    pub fn line_count_discount(&self, lines: usize) -> Percentage {
        self.line_count_tiers
            .iter()
            .find(|tier| lines >= tier.min_lines)
            .map_or(Percentage::zero(), |tier| tier.discount)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if !self.cart_tiers.windows(2).all(|w| w[0].above > w[1].above) {
            return Err(PolicyError::UnorderedTiers { table: "cart" });
        }
        if !self
            .line_count_tiers
            .windows(2)
            .all(|w| w[0].min_lines > w[1].min_lines)
        {
            return Err(PolicyError::UnorderedTiers {
                table: "line count",
            });
        }

        let discounts = self
            .cart_tiers
            .iter()
            .map(|t| t.discount)
            .chain(self.line_count_tiers.iter().map(|t| t.discount));
        for discount in discounts {
            check_percentage("subtotal discount", discount)?;
        }
        Ok(())
    }
}

impl Default for SubtotalPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

// =============================================================================
// Freight Policy
// =============================================================================

/// A weight band: weights up to and including `up_to` pay `rate_per_kg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightBand {
    pub up_to: Decimal,
    pub rate_per_kg: Money,
}

/// Weight-based freight tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreightPolicy {
    /// cm³ per kg of cubic weight.
    pub volumetric_divisor: Decimal,
    /// Taxable weights up to and including this value ship free.
    pub free_weight_limit: Decimal,
    /// Bands above the free limit, ascending.
    pub bands: [WeightBand; 2],
    /// Rate for weights above the last band.
    pub heavy_rate_per_kg: Money,
    /// Flat fee added once whenever a weight charge applies.
    pub minimum_fee: Money,
    /// Surcharge per fragile unit.
    pub fragile_fee_per_unit: Money,
}

impl FreightPolicy {
    pub const STANDARD: FreightPolicy = FreightPolicy {
        volumetric_divisor: dec!(6000),
        free_weight_limit: dec!(5.00),
        bands: [
            WeightBand {
                up_to: dec!(10.00),
                rate_per_kg: Money::new(dec!(2.00)),
            },
            WeightBand {
                up_to: dec!(50.00),
                rate_per_kg: Money::new(dec!(4.00)),
            },
        ],
        heavy_rate_per_kg: Money::new(dec!(7.00)),
        minimum_fee: Money::new(dec!(12.00)),
        fragile_fee_per_unit: Money::new(dec!(5.00)),
    };

    /// Per-kg rate for a taxable weight above the free limit.
    pub fn rate_for(&self, weight: Decimal) -> Money {
        self.bands
            .iter()
            .find(|band| weight <= band.up_to)
            .map_or(self.heavy_rate_per_kg, |band| band.rate_per_kg)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.volumetric_divisor <= Decimal::ZERO {
            return Err(PolicyError::MustBePositive {
                field: "volumetric_divisor",
            });
        }
        check_non_negative("free_weight_limit", self.free_weight_limit)?;
        check_non_negative("heavy_rate_per_kg", self.heavy_rate_per_kg.amount())?;
        check_non_negative("minimum_fee", self.minimum_fee.amount())?;
        check_non_negative("fragile_fee_per_unit", self.fragile_fee_per_unit.amount())?;

        let mut floor = self.free_weight_limit;
        for band in &self.bands {
            if band.up_to <= floor {
                return Err(PolicyError::UnorderedBands);
            }
            check_non_negative("band rate_per_kg", band.rate_per_kg.amount())?;
            floor = band.up_to;
        }
        Ok(())
    }
}

impl Default for FreightPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

// =============================================================================
// Region Multipliers
// =============================================================================

/// Freight multiplier per delivery region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionMultipliers {
    pub north: Decimal,
    pub northeast: Decimal,
    pub south: Decimal,
    pub southeast: Decimal,
    pub midwest: Decimal,
}

impl RegionMultipliers {
    pub const STANDARD: RegionMultipliers = RegionMultipliers {
        north: dec!(1.30),
        northeast: dec!(1.10),
        south: dec!(1.05),
        southeast: dec!(1.00),
        midwest: dec!(1.20),
    };

    pub fn for_region(&self, region: Region) -> Decimal {
        match region {
            Region::North => self.north,
            Region::Northeast => self.northeast,
            Region::South => self.south,
            Region::Southeast => self.southeast,
            Region::Midwest => self.midwest,
        }
    }
}

impl Default for RegionMultipliers {
    fn default() -> Self {
        Self::STANDARD
    }
}

// =============================================================================
// Loyalty Discounts
// =============================================================================

/// Freight discount per loyalty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoyaltyDiscounts {
    pub bronze: Percentage,
    pub silver: Percentage,
    pub gold: Percentage,
}

impl LoyaltyDiscounts {
    pub const STANDARD: LoyaltyDiscounts = LoyaltyDiscounts {
        bronze: Percentage::zero(),
        silver: Percentage::from_bps(5000),
        gold: Percentage::full(),
    };

    pub fn for_tier(&self, tier: LoyaltyTier) -> Percentage {
        match tier {
            LoyaltyTier::Bronze => self.bronze,
            LoyaltyTier::Silver => self.silver,
            LoyaltyTier::Gold => self.gold,
        }
    }
}

impl Default for LoyaltyDiscounts {
    fn default() -> Self {
        Self::STANDARD
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// The complete set of pricing tables.
///
/// ## Example Config Section
/// ```toml
/// [pricing.subtotal]
/// cart_tiers = [
///     { above = "1000.00", discount = 2000 },
///     { above = "500.00", discount = 1000 },
/// ]
///
/// [pricing.regions]
/// north = "1.30"
///
/// [pricing.loyalty]
/// silver = 5000   # basis points
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub subtotal: SubtotalPolicy,
    pub freight: FreightPolicy,
    pub regions: RegionMultipliers,
    pub loyalty: LoyaltyDiscounts,
}

impl PricingPolicy {
    /// The tables every storefront starts from.
    pub const STANDARD: PricingPolicy = PricingPolicy {
        subtotal: SubtotalPolicy::STANDARD,
        freight: FreightPolicy::STANDARD,
        regions: RegionMultipliers::STANDARD,
        loyalty: LoyaltyDiscounts::STANDARD,
    };

    /// Checks that the tables can be applied consistently.
    ///
    /// ## Rules
    /// - Tiers strictly descending (first match must be the best match)
    /// - Every percentage within 0%..=100%
    /// - Divisor and region multipliers strictly positive
    /// - Free weight limit, rates and fees zero or more
    /// - Weight bands ascending above the free limit
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.subtotal.validate()?;
        self.freight.validate()?;

        for region in Region::ALL {
            if self.regions.for_region(region) <= Decimal::ZERO {
                return Err(PolicyError::MustBePositive {
                    field: "region multiplier",
                });
            }
        }

        for tier in [LoyaltyTier::Bronze, LoyaltyTier::Silver, LoyaltyTier::Gold] {
            check_percentage("loyalty discount", self.loyalty.for_tier(tier))?;
        }

        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: Decimal) -> Result<(), PolicyError> {
    if value < Decimal::ZERO {
        return Err(PolicyError::MustBeNonNegative { field });
    }
    Ok(())
}

fn check_percentage(field: &'static str, rate: Percentage) -> Result<(), PolicyError> {
    if rate.bps() > Percentage::FULL_BPS {
        return Err(PolicyError::PercentageOutOfRange {
            field,
            bps: rate.bps(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
