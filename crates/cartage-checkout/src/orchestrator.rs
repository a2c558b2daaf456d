//! Purchase orchestrator: sequences the external calls that finalize a cart.
//!
//! # Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  START                                                                  │
//! │    │ resolve customer, resolve cart, build stock request                │
//! │    ▼                                                                    │
//! │  check_availability ── unavailable ──────────────► OutOfStock           │
//! │    ▼ AVAILABILITY_CHECKED                                               │
//! │  validate + price ──── invalid ──────────────────► Validation           │
//! │    ▼ PRICED                                                             │
//! │  authorize_payment ─── denied ───────────────────► PaymentDenied        │
//! │    ▼ PAYMENT_AUTHORIZED                                                 │
//! │  decrement_stock ───── failed ──► cancel_payment ─► StockDecrementFailed│
//! │    │                                    └─ fails ─► CompensationFailed  │
//! │    ▼ STOCK_DECREMENTED                                                  │
//! │  PurchaseOutcome                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is awaited before the next one starts and none is retried.
//! The payment cancellation is the only compensating action.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use cartage_core::error::ItemDefect;
use cartage_core::validation::validate_customer;
use cartage_core::{
    Cart, CartId, CustomerId, Money, PricingEngine, TransactionId, ValidationError,
};

use crate::error::{CheckoutError, CheckoutResult};
use crate::ports::{CartStore, CustomerDirectory, InventoryService, PaymentGateway, StockRequest};

/// Message carried by every successful outcome.
pub const CONFIRMATION_MESSAGE: &str = "Purchase completed successfully.";

// =============================================================================
// Stage
// =============================================================================

/// Furthest point a purchase attempt reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStage {
    Start,
    AvailabilityChecked,
    Priced,
    PaymentAuthorized,
    StockDecremented,
}

impl fmt::Display for PurchaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PurchaseStage::Start => "START",
            PurchaseStage::AvailabilityChecked => "AVAILABILITY_CHECKED",
            PurchaseStage::Priced => "PRICED",
            PurchaseStage::PaymentAuthorized => "PAYMENT_AUTHORIZED",
            PurchaseStage::StockDecremented => "STOCK_DECREMENTED",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOutcome {
    pub success: bool,
    pub transaction_id: TransactionId,
    pub message: String,
    /// Amount authorized, rounded to 2 dp.
    pub total: Money,
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// The external systems a purchase touches.
#[derive(Clone)]
pub struct Collaborators {
    pub customers: Arc<dyn CustomerDirectory>,
    pub carts: Arc<dyn CartStore>,
    pub inventory: Arc<dyn InventoryService>,
    pub payments: Arc<dyn PaymentGateway>,
}

/// Finalizes purchases against [`Collaborators`].
///
/// Holds no per-purchase state, so one orchestrator can serve concurrent
/// attempts. Two attempts on the same cart are not serialized here; that is
/// left to the inventory and payment systems.
pub struct PurchaseOrchestrator {
    collaborators: Collaborators,
    engine: PricingEngine,
}

impl PurchaseOrchestrator {
    pub fn new(collaborators: Collaborators, engine: PricingEngine) -> Self {
        Self {
            collaborators,
            engine,
        }
    }

    /// Orchestrator using the standard pricing tables.
    pub fn with_standard_pricing(collaborators: Collaborators) -> Self {
        Self::new(collaborators, PricingEngine::standard())
    }

    /// Runs the full purchase flow for a cart owned by `customer_id`.
    pub async fn finalize_purchase(
        &self,
        cart_id: CartId,
        customer_id: CustomerId,
    ) -> CheckoutResult<PurchaseOutcome> {
        let c = &self.collaborators;
        debug!(%cart_id, %customer_id, stage = %PurchaseStage::Start, "Finalizing purchase");

        // 1. Resolve
        let customer = c.customers.resolve_customer(customer_id).await?;
        let cart = c.carts.resolve_cart(cart_id, &customer).await?;
        let request = stock_request(&cart)?;

        // 2. Availability
        let availability = c.inventory.check_availability(&request).await?;
        if !availability.available {
            warn!(
                %cart_id,
                unavailable = ?availability.unavailable_ids,
                stage = %PurchaseStage::Start,
                "Purchase rejected: out of stock"
            );
            return Err(CheckoutError::OutOfStock {
                unavailable: availability.unavailable_ids,
            });
        }
        debug!(%cart_id, stage = %PurchaseStage::AvailabilityChecked, "Stock available");

        // 3. Validate cart, then customer, and price
        let total = self
            .engine
            .compute_total(&cart, customer.region, customer.tier)
            .and_then(|total| validate_customer(&customer).map(|()| total))
            .map_err(|e| {
                warn!(
                    %cart_id,
                    code = e.code(),
                    stage = %PurchaseStage::AvailabilityChecked,
                    "Purchase rejected: validation failed"
                );
                CheckoutError::from(e)
            })?;
        debug!(%cart_id, %total, stage = %PurchaseStage::Priced, "Cart priced");

        // 4. Payment
        let authorization = c.payments.authorize_payment(customer.id, total).await?;
        if !authorization.authorized {
            warn!(%cart_id, %total, stage = %PurchaseStage::Priced, "Purchase rejected: payment denied");
            return Err(CheckoutError::PaymentDenied);
        }
        let transaction_id = authorization.transaction_id;
        debug!(%cart_id, %transaction_id, stage = %PurchaseStage::PaymentAuthorized, "Payment authorized");

        // 5. Stock decrement, compensating on failure
        let decremented = match c.inventory.decrement_stock(&request).await {
            Ok(result) => result.success,
            Err(e) => {
                warn!(%cart_id, %transaction_id, error = %e, "Stock decrement call failed");
                false
            }
        };
        if !decremented {
            return Err(self.compensate(cart_id, customer.id, transaction_id).await);
        }

        info!(
            %cart_id,
            %customer_id,
            %transaction_id,
            %total,
            stage = %PurchaseStage::StockDecremented,
            "Purchase completed"
        );

        Ok(PurchaseOutcome {
            success: true,
            transaction_id,
            message: CONFIRMATION_MESSAGE.to_string(),
            total,
            completed_at: Utc::now(),
        })
    }

    /// Cancels an authorized payment after the stock decrement failed.
    ///
    /// Called at most once per attempt. Returns the error to surface.
    async fn compensate(
        &self,
        cart_id: CartId,
        customer_id: CustomerId,
        transaction_id: TransactionId,
    ) -> CheckoutError {
        warn!(
            %cart_id,
            %transaction_id,
            stage = %PurchaseStage::PaymentAuthorized,
            "Stock decrement failed, cancelling payment"
        );

        match self
            .collaborators
            .payments
            .cancel_payment(customer_id, transaction_id)
            .await
        {
            Ok(()) => CheckoutError::StockDecrementFailed { transaction_id },
            Err(e) => {
                error!(
                    %cart_id,
                    %customer_id,
                    %transaction_id,
                    error = %e,
                    "Payment cancellation failed; manual reconciliation required"
                );
                CheckoutError::CompensationFailed {
                    transaction_id,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Builds the parallel id / quantity lists in line order.
///
/// A line without a product cannot be sent to inventory, so it is rejected
/// here with the same error validation would report.
fn stock_request(cart: &Cart) -> CheckoutResult<StockRequest> {
    let mut request = StockRequest::default();
    for (index, line) in cart.lines.iter().enumerate() {
        let product = line
            .product
            .as_ref()
            .ok_or(ValidationError::InvalidItem {
                line: index,
                defect: ItemDefect::MissingProduct,
            })?;
        request.push(product.id, line.quantity);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartage_core::CartLine;

    #[test]
    fn test_stage_order_and_names() {
        assert!(PurchaseStage::Start < PurchaseStage::Priced);
        assert!(PurchaseStage::PaymentAuthorized < PurchaseStage::StockDecremented);
        assert_eq!(PurchaseStage::AvailabilityChecked.to_string(), "AVAILABILITY_CHECKED");
    }

    #[test]
    fn test_stock_request_rejects_missing_product() {
        let mut cart = Cart::new(CartId(1), CustomerId(1));
        cart.lines.push(CartLine {
            product: None,
            quantity: 1,
        });

        let err = stock_request(&cart).unwrap_err();
        assert_eq!(err.code(), "item.product.invalid");
    }
}
