//! Adapters connecting the application core to the outside world.
//!
//! Each submodule implements one or more ports against a concrete
//! technology: Postgres for persistence, Stripe over HTTPS for payments,
//! JWT validation for sessions, and Axum for the HTTP surface.

pub mod auth;
pub mod http;
pub mod postgres;
pub mod stripe;
