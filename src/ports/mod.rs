//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `OrderRepository` - Read access to externally-owned order rows
//! - `PaymentRepository` - Payment attempt row persistence
//! - `PaymentProvider` - Payment gateway integration (intents)
//! - `TransitionStore` - Atomic application of reconciled webhook events
//! - `SessionValidator` - Bearer token validation for payment endpoints

mod order_repository;
mod payment_provider;
mod payment_repository;
mod session_validator;
mod transition_store;

pub use order_repository::OrderRepository;
pub use payment_provider::{
    CreateIntentRequest, PaymentProvider, ProviderError, ProviderErrorCode, ProviderIntent,
};
pub use payment_repository::PaymentRepository;
pub use session_validator::SessionValidator;
pub use transition_store::{TransitionOutcome, TransitionStore};
