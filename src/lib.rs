//! Plateful - Marketplace payment authority and webhook reconciliation.
//!
//! This crate owns the payment side of a multi-tenant food ordering
//! marketplace: provider credential authority, payment intent checkout,
//! signature-verified webhook reconciliation, and status projection for
//! polling clients.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
