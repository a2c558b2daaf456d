//! In-process implementations of the collaborator ports.
//!
//! Stores are plain maps; the inventory and payment adapters answer with a
//! scripted response and record every call, so tests can assert exactly
//! which external effects a purchase attempt produced.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use cartage_core::{Cart, CartId, Customer, CustomerId, Money, ProductId, TransactionId};

use crate::error::{CheckoutError, CheckoutResult};
use crate::ports::{
    Availability, CartStore, CustomerDirectory, InventoryService, PaymentAuthorization,
    PaymentGateway, StockDecrement, StockRequest,
};

// =============================================================================
// Stores
// =============================================================================

/// Customer directory backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryCustomers {
    customers: Mutex<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a customer (builder style).
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.get_mut().insert(customer.id, customer);
        self
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomers {
    async fn resolve_customer(&self, customer_id: CustomerId) -> CheckoutResult<Customer> {
        self.customers
            .lock()
            .await
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| CheckoutError::not_found("customer", customer_id))
    }
}

/// Cart store backed by a map. Lookups check ownership.
#[derive(Debug, Default)]
pub struct InMemoryCarts {
    carts: Mutex<HashMap<CartId, Cart>>,
}

impl InMemoryCarts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cart (builder style).
    pub fn with_cart(mut self, cart: Cart) -> Self {
        self.carts.get_mut().insert(cart.id, cart);
        self
    }
}

#[async_trait]
impl CartStore for InMemoryCarts {
    async fn resolve_cart(&self, cart_id: CartId, customer: &Customer) -> CheckoutResult<Cart> {
        self.carts
            .lock()
            .await
            .get(&cart_id)
            .filter(|cart| cart.customer_id == customer.id)
            .cloned()
            .ok_or_else(|| CheckoutError::not_found("cart", cart_id))
    }
}

// =============================================================================
// Scripted Inventory
// =============================================================================

/// A call received by [`ScriptedInventory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCall {
    CheckAvailability(StockRequest),
    DecrementStock(StockRequest),
}

/// Inventory that answers from a script and records every call.
///
/// By default everything is in stock and decrements succeed.
#[derive(Debug)]
pub struct ScriptedInventory {
    unavailable_ids: Option<Vec<ProductId>>,
    decrement_succeeds: bool,
    decrement_error: Option<String>,
    calls: Mutex<Vec<InventoryCall>>,
}

impl Default for ScriptedInventory {
    fn default() -> Self {
        Self {
            unavailable_ids: None,
            decrement_succeeds: true,
            decrement_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Availability checks report these products as missing.
    pub fn out_of_stock(mut self, unavailable_ids: Vec<ProductId>) -> Self {
        self.unavailable_ids = Some(unavailable_ids);
        self
    }

    /// Decrements answer `success: false`.
    pub fn failing_decrement(mut self) -> Self {
        self.decrement_succeeds = false;
        self
    }

    /// Decrements fail at the transport level.
    pub fn unreachable_decrement(mut self, message: impl Into<String>) -> Self {
        self.decrement_error = Some(message.into());
        self
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<InventoryCall> {
        self.calls.lock().await.clone()
    }

    /// Number of decrement calls received so far.
    pub async fn decrement_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, InventoryCall::DecrementStock(_)))
            .count()
    }
}

#[async_trait]
impl InventoryService for ScriptedInventory {
    async fn check_availability(&self, request: &StockRequest) -> CheckoutResult<Availability> {
        self.calls
            .lock()
            .await
            .push(InventoryCall::CheckAvailability(request.clone()));

        Ok(match &self.unavailable_ids {
            Some(ids) => Availability::missing(ids.clone()),
            None => Availability::in_stock(),
        })
    }

    async fn decrement_stock(&self, request: &StockRequest) -> CheckoutResult<StockDecrement> {
        self.calls
            .lock()
            .await
            .push(InventoryCall::DecrementStock(request.clone()));

        if let Some(message) = &self.decrement_error {
            return Err(CheckoutError::upstream("inventory", message.clone()));
        }
        debug!(lines = request.len(), success = self.decrement_succeeds, "Scripted decrement");
        Ok(StockDecrement {
            success: self.decrement_succeeds,
        })
    }
}

// =============================================================================
// Scripted Payments
// =============================================================================

/// A call received by [`ScriptedPayments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentCall {
    Authorize {
        customer_id: CustomerId,
        amount: Money,
    },
    Cancel {
        customer_id: CustomerId,
        transaction_id: TransactionId,
    },
}

/// Payment gateway that answers from a script and records every call.
#[derive(Debug)]
pub struct ScriptedPayments {
    authorize: bool,
    transaction_id: TransactionId,
    cancel_error: Option<String>,
    calls: Mutex<Vec<PaymentCall>>,
}

impl ScriptedPayments {
    /// Authorizes every request with `transaction_id`.
    pub fn approving(transaction_id: TransactionId) -> Self {
        Self {
            authorize: true,
            transaction_id,
            cancel_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Denies every request.
    pub fn denying() -> Self {
        Self {
            authorize: false,
            ..Self::approving(TransactionId(0))
        }
    }

    /// Cancellations fail with `message`.
    pub fn failing_cancellation(mut self, message: impl Into<String>) -> Self {
        self.cancel_error = Some(message.into());
        self
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<PaymentCall> {
        self.calls.lock().await.clone()
    }

    /// `(customer, transaction)` of every cancellation received so far.
    pub async fn cancellations(&self) -> Vec<(CustomerId, TransactionId)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                PaymentCall::Cancel {
                    customer_id,
                    transaction_id,
                } => Some((*customer_id, *transaction_id)),
                PaymentCall::Authorize { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedPayments {
    async fn authorize_payment(
        &self,
        customer_id: CustomerId,
        amount: Money,
    ) -> CheckoutResult<PaymentAuthorization> {
        self.calls.lock().await.push(PaymentCall::Authorize {
            customer_id,
            amount,
        });

        Ok(PaymentAuthorization {
            authorized: self.authorize,
            transaction_id: self.transaction_id,
        })
    }

    async fn cancel_payment(
        &self,
        customer_id: CustomerId,
        transaction_id: TransactionId,
    ) -> CheckoutResult<()> {
        self.calls.lock().await.push(PaymentCall::Cancel {
            customer_id,
            transaction_id,
        });

        match &self.cancel_error {
            Some(message) => Err(CheckoutError::upstream("payment", message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartage_core::{LoyaltyTier, Region};

    fn ana() -> Customer {
        Customer {
            id: CustomerId(1),
            name: "Ana".to_string(),
            region: Region::South,
            tier: LoyaltyTier::Bronze,
        }
    }

    #[tokio::test]
    async fn test_customer_lookup() {
        let customers = InMemoryCustomers::new().with_customer(ana());

        assert_eq!(customers.resolve_customer(CustomerId(1)).await.unwrap(), ana());
        let err = customers.resolve_customer(CustomerId(2)).await.unwrap_err();
        assert_eq!(err.code(), "checkout.not_found");
    }

    #[tokio::test]
    async fn test_cart_lookup_checks_owner() {
        let carts = InMemoryCarts::new().with_cart(Cart::new(CartId(5), CustomerId(1)));
        let mut other = ana();
        other.id = CustomerId(2);

        assert!(carts.resolve_cart(CartId(5), &ana()).await.is_ok());
        assert!(matches!(
            carts.resolve_cart(CartId(5), &other).await,
            Err(CheckoutError::NotFound { entity: "cart", .. })
        ));
        assert!(carts.resolve_cart(CartId(6), &ana()).await.is_err());
    }

    #[tokio::test]
    async fn test_scripted_inventory_records_calls() {
        let inventory = ScriptedInventory::new().failing_decrement();
        let mut request = StockRequest::default();
        request.push(ProductId(1), 2);

        assert!(inventory.check_availability(&request).await.unwrap().available);
        assert!(!inventory.decrement_stock(&request).await.unwrap().success);
        assert_eq!(
            inventory.calls().await,
            vec![
                InventoryCall::CheckAvailability(request.clone()),
                InventoryCall::DecrementStock(request),
            ]
        );
        assert_eq!(inventory.decrement_count().await, 1);
    }

    #[tokio::test]
    async fn test_scripted_payments() {
        let payments = ScriptedPayments::approving(TransactionId(999)).failing_cancellation("down");

        let auth = payments
            .authorize_payment(CustomerId(1), Money::from_cents(1000))
            .await
            .unwrap();
        assert!(auth.authorized);
        assert_eq!(auth.transaction_id, TransactionId(999));

        assert!(payments
            .cancel_payment(CustomerId(1), TransactionId(999))
            .await
            .is_err());
        assert_eq!(
            payments.cancellations().await,
            vec![(CustomerId(1), TransactionId(999))]
        );

        let denied = ScriptedPayments::denying()
            .authorize_payment(CustomerId(1), Money::from_cents(1))
            .await
            .unwrap();
        assert!(!denied.authorized);
    }
}
