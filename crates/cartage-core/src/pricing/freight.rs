//! # Freight Calculator
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. taxable weight = Σ max(weight × qty, (h × w × l / 6000) × qty)     │
//! │  2. weight charge  = 0                         if taxable ≤ 5 kg        │
//! │                      taxable × band rate + 12  otherwise                │
//! │  3. fragile charge = 5.00 × Σ fragile qty                               │
//! │  4. × region multiplier                                                 │
//! │  5. × (1 − loyalty discount)                                            │
//! │                                                                         │
//! │  The order is fixed. Weight values are never rounded before the band   │
//! │  comparison.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use super::policy::{FreightPolicy, LoyaltyDiscounts, RegionMultipliers};
use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{LoyaltyTier, Percentage, Region};
use crate::validation::ValidatedLine;

/// Every intermediate of the freight computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FreightBreakdown {
    /// Chargeable weight of the whole cart (kg).
    #[ts(type = "string")]
    pub taxable_weight: Decimal,
    pub weight_charge: Money,
    pub fragile_units: i64,
    pub fragile_charge: Money,
    pub region: Region,
    #[ts(type = "string")]
    pub region_multiplier: Decimal,
    pub tier: LoyaltyTier,
    pub loyalty_discount: Percentage,
    /// Freight after region and loyalty, unrounded.
    pub freight: Money,
}

/// Chargeable weight of one line: the greater of physical and cubic weight.
///
/// Returns `None` if the weight does not fit in a decimal.
pub fn line_taxable_weight(policy: &FreightPolicy, line: &ValidatedLine<'_>) -> Option<Decimal> {
    let quantity = line.quantity_decimal();
    let physical = line.product.weight.checked_mul(quantity)?;
    let cubic = line
        .product
        .volume()?
        .checked_div(policy.volumetric_divisor)?
        .checked_mul(quantity)?;
    Some(physical.max(cubic))
}

/// Chargeable weight of a whole cart.
pub fn taxable_weight(policy: &FreightPolicy, lines: &[ValidatedLine<'_>]) -> Option<Decimal> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        total.checked_add(line_taxable_weight(policy, line)?)
    })
}

/// Banded weight charge. Free up to the limit, then `weight × rate + fee`.
///
/// ## Example
/// ```rust
/// use cartage_core::pricing::freight::weight_charge;
/// use cartage_core::pricing::FreightPolicy;
/// use rust_decimal_macros::dec;
///
/// let policy = FreightPolicy::STANDARD;
/// assert!(weight_charge(&policy, dec!(5.00)).unwrap().is_zero());
/// assert_eq!(weight_charge(&policy, dec!(6.00)).unwrap().amount(), dec!(24.00));
/// ```
pub fn weight_charge(policy: &FreightPolicy, weight: Decimal) -> Option<Money> {
    if weight <= policy.free_weight_limit {
        return Some(Money::zero());
    }
    policy
        .rate_for(weight)
        .checked_scale(weight)?
        .checked_add(policy.minimum_fee)
}

/// Runs the full freight pipeline for validated lines.
///
/// Fails with [`ValidationError::AmountOutOfRange`] if any intermediate
/// overflows.
pub fn calculate(
    policy: &FreightPolicy,
    regions: &RegionMultipliers,
    loyalty: &LoyaltyDiscounts,
    lines: &[ValidatedLine<'_>],
    region: Region,
    tier: LoyaltyTier,
) -> ValidationResult<FreightBreakdown> {
    let out_of_range = || ValidationError::AmountOutOfRange;

    let taxable_weight = taxable_weight(policy, lines).ok_or_else(out_of_range)?;
    let weight_charge = weight_charge(policy, taxable_weight).ok_or_else(out_of_range)?;

    let fragile_units = lines
        .iter()
        .filter(|line| line.product.fragile)
        .try_fold(0i64, |units, line| units.checked_add(line.quantity))
        .ok_or_else(out_of_range)?;
    let fragile_charge = policy
        .fragile_fee_per_unit
        .checked_multiply_quantity(fragile_units)
        .ok_or_else(out_of_range)?;

    let region_multiplier = regions.for_region(region);
    let loyalty_discount = loyalty.for_tier(tier);

    let freight = weight_charge
        .checked_add(fragile_charge)
        .and_then(|base| base.checked_scale(region_multiplier))
        .and_then(|regional| regional.checked_scale(loyalty_discount.remaining_fraction()))
        .ok_or_else(out_of_range)?;

    Ok(FreightBreakdown {
        taxable_weight,
        weight_charge,
        fragile_units,
        fragile_charge,
        region,
        region_multiplier,
        tier,
        loyalty_discount,
        freight,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
