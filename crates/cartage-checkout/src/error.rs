//! # Checkout Errors
//!
//! Failures of the finalize-purchase flow and of configuration loading.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Error Types                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Lookup       │  │    Business     │  │     Saga                │ │
//! │  │  ─────────────  │  │  ─────────────  │  │  ─────────────────────  │ │
//! │  │  NotFound       │  │  Validation     │  │  StockDecrementFailed   │ │
//! │  │  Upstream       │  │  OutOfStock     │  │  CompensationFailed     │ │
//! │  │                 │  │  PaymentDenied  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Nothing here is retried. CompensationFailed means a payment may still │
//! │  be authorized and needs manual reconciliation.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use cartage_core::{PolicyError, ProductId, TransactionId, ValidationError};

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Checkout Error
// =============================================================================

/// Terminal failures of a purchase attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Customer unknown, or cart missing / owned by someone else.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The cart or customer failed structural validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Inventory cannot cover the cart.
    #[error("Items are out of stock")]
    OutOfStock { unavailable: Vec<ProductId> },

    /// The payment gateway refused the charge.
    #[error("Payment was not authorized")]
    PaymentDenied,

    /// Stock could not be decremented; the payment was cancelled.
    #[error("Stock decrement failed; payment {transaction_id} was cancelled")]
    StockDecrementFailed { transaction_id: TransactionId },

    /// Stock could not be decremented and cancelling the payment failed too.
    #[error("Stock decrement failed and payment {transaction_id} could not be cancelled: {reason}")]
    CompensationFailed {
        transaction_id: TransactionId,
        reason: String,
    },

    /// A collaborator could not be reached or answered with garbage.
    #[error("{service} error: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },
}

impl CheckoutError {
    /// Convenience constructor for lookup failures.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CheckoutError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for collaborator failures.
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        CheckoutError::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Stable reason code, suitable for logs and client-side lookups.
    pub fn code(&self) -> &'static str {
        match self {
            CheckoutError::NotFound { .. } => "checkout.not_found",
            CheckoutError::Validation(e) => e.code(),
            CheckoutError::OutOfStock { .. } => "checkout.out_of_stock",
            CheckoutError::PaymentDenied => "checkout.payment_denied",
            CheckoutError::StockDecrementFailed { .. } => "checkout.stock_decrement_failed",
            CheckoutError::CompensationFailed { .. } => "checkout.compensation_failed",
            CheckoutError::Upstream { .. } => "checkout.upstream",
        }
    }

    /// True when a payment may have been captured without a matching
    /// stock decrement.
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, CheckoutError::CompensationFailed { .. })
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Problems loading `checkout.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid pricing policy: {0}")]
    InvalidPolicy(#[from] PolicyError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartage_core::error::ItemDefect;

    #[test]
    fn test_messages() {
        assert_eq!(
            CheckoutError::not_found("cart", 42).to_string(),
            "cart not found: 42"
        );
        assert_eq!(
            CheckoutError::StockDecrementFailed {
                transaction_id: TransactionId(999)
            }
            .to_string(),
            "Stock decrement failed; payment 999 was cancelled"
        );
    }

    #[test]
    fn test_validation_keeps_reason() {
        let err: CheckoutError = ValidationError::InvalidItem {
            line: 0,
            defect: ItemDefect::Quantity,
        }
        .into();

        assert_eq!(err.code(), "item.quantity.invalid");
        assert_eq!(err.to_string(), "Cart item has an invalid quantity");
    }

    #[test]
    fn test_only_compensation_failure_needs_reconciliation() {
        assert!(CheckoutError::CompensationFailed {
            transaction_id: TransactionId(1),
            reason: "timeout".into(),
        }
        .needs_reconciliation());
        assert!(!CheckoutError::PaymentDenied.needs_reconciliation());
        assert!(!CheckoutError::StockDecrementFailed {
            transaction_id: TransactionId(1)
        }
        .needs_reconciliation());
    }
}
