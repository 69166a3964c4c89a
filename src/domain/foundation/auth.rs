//! Authentication types for the domain layer.
//!
//! These types represent an authenticated customer extracted from a session
//! token. Session issuance lives in an external identity service; any
//! implementation of the `SessionValidator` port can populate them.

use super::CustomerId;
use thiserror::Error;

/// Authenticated customer extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedCustomer {
    /// The unique customer identifier from the identity service.
    pub id: CustomerId,

    /// Customer's email address from the token claims, when present.
    pub email: Option<String>,
}

impl AuthenticatedCustomer {
    /// Creates a new authenticated customer.
    pub fn new(id: CustomerId, email: Option<String>) -> Self {
        Self { id, email }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_messages() {
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
    }

    #[test]
    fn authenticated_customer_holds_claims() {
        let id = CustomerId::new();
        let customer = AuthenticatedCustomer::new(id, Some("ada@example.com".into()));
        assert_eq!(customer.id, id);
        assert_eq!(customer.email.as_deref(), Some("ada@example.com"));
    }
}
