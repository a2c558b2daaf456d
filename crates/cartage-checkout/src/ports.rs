//! Collaborator port definitions.
//!
//! The orchestrator owns no data. Customers, carts, stock and payments live
//! in external systems reached through these traits; adapters implement them
//! for a concrete backend (see [`crate::memory`] for the in-process ones).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cartage_core::{Cart, CartId, Customer, CustomerId, Money, ProductId, TransactionId};

use crate::error::CheckoutResult;

// =============================================================================
// Payloads
// =============================================================================

/// Parallel product-id / quantity lists, in cart line order.
///
/// Used for both the availability check and the decrement, so both calls
/// see exactly the same request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRequest {
    pub product_ids: Vec<ProductId>,
    pub quantities: Vec<i64>,
}

impl StockRequest {
    pub fn push(&mut self, product_id: ProductId, quantity: i64) {
        self.product_ids.push(product_id);
        self.quantities.push(quantity);
    }

    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    /// Iterates `(product, quantity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, i64)> + '_ {
        self.product_ids
            .iter()
            .copied()
            .zip(self.quantities.iter().copied())
    }
}

/// Inventory's answer to an availability check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    #[serde(default)]
    pub unavailable_ids: Vec<ProductId>,
}

impl Availability {
    pub fn in_stock() -> Self {
        Availability {
            available: true,
            unavailable_ids: Vec::new(),
        }
    }

    pub fn missing(unavailable_ids: Vec<ProductId>) -> Self {
        Availability {
            available: false,
            unavailable_ids,
        }
    }
}

/// The payment gateway's answer to an authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    pub authorized: bool,
    pub transaction_id: TransactionId,
}

/// Inventory's answer to a decrement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDecrement {
    pub success: bool,
}

// =============================================================================
// Store Ports
// =============================================================================

/// Port for customer lookups.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Returns the customer, or `NotFound`.
    async fn resolve_customer(&self, customer_id: CustomerId) -> CheckoutResult<Customer>;
}

/// Port for cart lookups.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Returns the cart only if it exists and belongs to `customer`;
    /// `NotFound` otherwise.
    async fn resolve_cart(&self, cart_id: CartId, customer: &Customer) -> CheckoutResult<Cart>;
}

// =============================================================================
// Service Ports
// =============================================================================

/// Port for the stock service.
///
/// Both calls are made at most once per purchase attempt.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn check_availability(&self, request: &StockRequest) -> CheckoutResult<Availability>;

    async fn decrement_stock(&self, request: &StockRequest) -> CheckoutResult<StockDecrement>;
}

/// Port for the payment service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Requests authorization of `amount`, already rounded to 2 dp.
    async fn authorize_payment(
        &self,
        customer_id: CustomerId,
        amount: Money,
    ) -> CheckoutResult<PaymentAuthorization>;

    /// Reverses a previous authorization. Used only as compensation.
    async fn cancel_payment(
        &self,
        customer_id: CustomerId,
        transaction_id: TransactionId,
    ) -> CheckoutResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_request_keeps_order() {
        let mut request = StockRequest::default();
        assert!(request.is_empty());
        request.push(ProductId(3), 2);
        request.push(ProductId(1), 5);

        assert!(!request.is_empty());
        assert_eq!(request.len(), 2);
        assert_eq!(
            request.iter().collect::<Vec<_>>(),
            vec![(ProductId(3), 2), (ProductId(1), 5)]
        );
    }

    #[test]
    fn test_availability_json() {
        let parsed: Availability = serde_json::from_str(r#"{"available": true}"#).unwrap();
        assert_eq!(parsed, Availability::in_stock());

        let json = serde_json::to_string(&Availability::missing(vec![ProductId(7)])).unwrap();
        assert_eq!(json, r#"{"available":false,"unavailable_ids":[7]}"#);
    }
}
