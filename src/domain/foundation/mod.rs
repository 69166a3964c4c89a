//! Foundation module - Shared domain primitives.

mod auth;
mod errors;
mod ids;

pub use auth::{AuthError, AuthenticatedCustomer};
pub use errors::{DomainError, ErrorCode};
pub use ids::{CustomerId, OrderId, PaymentId};
