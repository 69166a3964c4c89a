//! HTTP adapter for the payment subsystem.
//!
//! Checkout and status endpoints sit behind session auth; the webhook
//! endpoint is unauthenticated and trusts only the signature over the raw
//! request body.

pub mod dto;
pub mod handlers;
pub mod routes;
#[cfg(test)]
pub(crate) mod testing;

pub use handlers::{PaymentsApiError, PaymentsAppState};
pub use routes::{payment_routes, webhook_routes};
