//! # cartage-checkout: Purchase Orchestration for Cartage
//!
//! Turns a priced cart into a committed purchase. The orchestrator talks to
//! customer and cart stores, inventory and a payment gateway through async
//! port traits, and cancels the payment if stock cannot be decremented after
//! the charge was authorized.
//!
//! ## Modules
//!
//! - [`orchestrator`] - `PurchaseOrchestrator::finalize_purchase` and its outcome
//! - [`ports`] - Collaborator traits and their payloads
//! - [`memory`] - In-process collaborators with call recording
//! - [`config`] - `checkout.toml` loading (logging, pricing tables)
//! - [`error`] - Checkout and configuration errors
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cartage_checkout::memory::{InMemoryCarts, InMemoryCustomers, ScriptedInventory, ScriptedPayments};
//! use cartage_checkout::{Collaborators, PurchaseOrchestrator};
//! use cartage_core::{CartId, CustomerId, TransactionId};
//!
//! # async fn run() -> Result<(), cartage_checkout::CheckoutError> {
//! let orchestrator = PurchaseOrchestrator::with_standard_pricing(Collaborators {
//!     customers: Arc::new(InMemoryCustomers::new()),
//!     carts: Arc::new(InMemoryCarts::new()),
//!     inventory: Arc::new(ScriptedInventory::new()),
//!     payments: Arc::new(ScriptedPayments::approving(TransactionId(1))),
//! });
//!
//! let outcome = orchestrator.finalize_purchase(CartId(1), CustomerId(1)).await?;
//! println!("{} ({})", outcome.message, outcome.total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod ports;

pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult, ConfigError, ConfigResult};
pub use orchestrator::{Collaborators, PurchaseOrchestrator, PurchaseOutcome, PurchaseStage};
pub use ports::{CartStore, CustomerDirectory, InventoryService, PaymentGateway};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `fallback` (usually the configured
/// `[logging] filter`) is used.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
