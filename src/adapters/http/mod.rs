//! HTTP adapters built on Axum.

pub mod middleware;
pub mod payments;

pub use payments::{payment_routes, webhook_routes, PaymentsAppState};
