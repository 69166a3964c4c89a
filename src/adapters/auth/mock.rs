//! Mock authentication adapter for testing.
//!
//! Implements the `SessionValidator` port for use in tests, avoiding the need
//! for real signed tokens.
//!
//! # Example
//!
//! ```ignore
//! use plateful::adapters::auth::MockSessionValidator;
//! use plateful::domain::foundation::{AuthenticatedCustomer, CustomerId};
//!
//! let customer_id = CustomerId::new();
//! let validator = MockSessionValidator::new()
//!     .with_customer("valid-token", AuthenticatedCustomer::new(customer_id, None));
//!
//! let result = validator.validate("valid-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedCustomer, CustomerId};
use crate::ports::SessionValidator;

/// Mock session validator for testing.
///
/// Stores a map of tokens to customers. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    /// Map of valid tokens to their associated customers
    tokens: RwLock<HashMap<String, AuthenticatedCustomer>>,
    /// Optional error to return for all validations (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    /// Creates a new empty mock validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a customer.
    pub fn with_customer(self, token: impl Into<String>, customer: AuthenticatedCustomer) -> Self {
        self.tokens.write().unwrap().insert(token.into(), customer);
        self
    }

    /// Adds a valid token with a fresh test customer, returning its id.
    pub fn with_test_customer(self, token: impl Into<String>) -> (Self, CustomerId) {
        let id = CustomerId::new();
        let customer =
            AuthenticatedCustomer::new(id, Some(format!("{}@test.example.com", id)));
        (self.with_customer(token, customer), id)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, customer: AuthenticatedCustomer) {
        self.tokens.write().unwrap().insert(token.into(), customer);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }

    /// Returns the number of registered valid tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap().len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedCustomer, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_customer_for_registered_token() {
        let id = CustomerId::new();
        let validator = MockSessionValidator::new()
            .with_customer("valid-token", AuthenticatedCustomer::new(id, None));

        let customer = validator.validate("valid-token").await.unwrap();

        assert_eq!(customer.id, id);
    }

    #[tokio::test]
    async fn returns_invalid_token_for_unknown() {
        let validator = MockSessionValidator::new();

        let result = validator.validate("unknown-token").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn with_error_forces_error() {
        let id = CustomerId::new();
        let validator = MockSessionValidator::new()
            .with_customer("valid-token", AuthenticatedCustomer::new(id, None))
            .with_error(AuthError::ServiceUnavailable("Test error".to_string()));

        let result = validator.validate("valid-token").await;

        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn clear_error_restores_normal_operation() {
        let id = CustomerId::new();
        let validator = MockSessionValidator::new()
            .with_customer("valid-token", AuthenticatedCustomer::new(id, None))
            .with_error(AuthError::ServiceUnavailable("Test".to_string()));

        assert!(validator.validate("valid-token").await.is_err());

        validator.clear_error();

        assert!(validator.validate("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn add_and_remove_token_at_runtime() {
        let validator = MockSessionValidator::new();
        assert!(validator.validate("new-token").await.is_err());

        validator.add_token(
            "new-token",
            AuthenticatedCustomer::new(CustomerId::new(), None),
        );
        assert!(validator.validate("new-token").await.is_ok());

        validator.remove_token("new-token");
        assert!(validator.validate("new-token").await.is_err());
    }

    #[test]
    fn token_count_tracks_tokens() {
        let (validator, _) = MockSessionValidator::new().with_test_customer("t1");
        let (validator, _) = validator.with_test_customer("t2");

        assert_eq!(validator.token_count(), 2);
    }
}
