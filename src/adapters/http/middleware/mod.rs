//! HTTP middleware for the axum server.

mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
