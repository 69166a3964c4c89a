//! Domain layer containing business logic and domain types.

pub mod foundation;
pub mod payment;
