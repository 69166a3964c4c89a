//! Session validation port for JWT token validation.
//!
//! This port defines the contract for validating access tokens and
//! extracting customer identity. It is provider-agnostic; implementations
//! exist for local JWT validation and mock testing.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedCustomer};

/// Validates access tokens and extracts customer identity.
///
/// HTTP middleware uses this to validate Bearer tokens before any payment
/// endpoint runs.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature
/// - Validate issuer, audience, and expiry claims
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a JWT access token (without "Bearer " prefix) and return
    /// the authenticated customer.
    async fn validate(&self, token: &str) -> Result<AuthenticatedCustomer, AuthError>;
}
