//! PostgreSQL adapters - Database implementations for persistence ports.
//!
//! - `PostgresOrderRepository` - Read access to the orders table
//! - `PostgresPaymentRepository` - Payment attempt rows
//! - `PostgresTransitionStore` - Atomic webhook transition transactions

mod order_repository;
mod payment_repository;
mod transition_store;

pub use order_repository::PostgresOrderRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use transition_store::PostgresTransitionStore;
