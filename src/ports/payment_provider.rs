//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Implementations own the HTTP plumbing; callers only see intents.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment provider
//! - **Idempotent**: Every create carries an idempotency key so retries
//!   collapse to one intent on the provider side

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, OrderId};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider name as stored on payment rows (e.g., "stripe").
    fn name(&self) -> &'static str;

    /// Create a payment intent for the given charge.
    ///
    /// The request's idempotency key makes retries safe: the provider
    /// returns the original intent for a repeated key.
    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<ProviderIntent, ProviderError>;

    /// Fetch an existing intent. Returns `Ok(None)` when the provider no
    /// longer knows the id.
    async fn retrieve_intent(
        &self,
        intent_id: &str,
    ) -> Result<Option<ProviderIntent>, ProviderError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIntentRequest {
    /// Amount in minor units (cents).
    pub amount_minor: i64,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Order this charge belongs to (stored as provider metadata).
    pub order_id: OrderId,

    /// Customer initiating the checkout (stored as provider metadata).
    pub customer_id: CustomerId,

    /// Idempotency key for safe retries.
    pub idempotency_key: String,
}

/// A payment intent as the provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderIntent {
    /// Provider's intent ID (pi_xxx format).
    pub id: String,

    /// Client secret the browser needs to complete payment. Returned to the
    /// owning customer only, never logged.
    pub client_secret: String,

    /// Intent status as reported by the provider.
    pub status: String,

    /// Amount in minor units.
    pub amount_minor: i64,

    /// Lowercase ISO currency code.
    pub currency: String,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone)]
pub struct ProviderError {
    /// Error code for categorization.
    pub code: ProviderErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationError, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ApiError, message)
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProviderError {}

impl From<ProviderError> for DomainError {
    fn from(err: ProviderError) -> Self {
        // Caller-facing message stays generic; the detailed message is for
        // logs only.
        DomainError::new(ErrorCode::ProviderError, "payment provider request failed")
            .with_detail("provider_message", err.message)
    }
}

/// Provider error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API key rejected.
    AuthenticationError,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider rejected the request parameters.
    InvalidRequest,

    /// Provider API error.
    ApiError,

    /// Unknown error.
    Unknown,
}

impl ProviderErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderErrorCode::NetworkError | ProviderErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProviderErrorCode::NetworkError => "network_error",
            ProviderErrorCode::AuthenticationError => "authentication_error",
            ProviderErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            ProviderErrorCode::InvalidRequest => "invalid_request",
            ProviderErrorCode::ApiError => "api_error",
            ProviderErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
