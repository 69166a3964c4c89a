//! Webhook error types for provider webhook handling.
//!
//! Defines all error conditions that can occur during webhook processing,
//! with HTTP status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

use super::transition::ConflictReason;

/// Errors that occur during webhook processing.
///
/// The status mapping is deliberate: only genuinely bad data gets a 4xx
/// (which stops provider retries), while "not ready yet" conditions return
/// 503 so the provider's retry schedule drives eventual consistency.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header absent from the request.
    #[error("Missing signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Event livemode flag disagrees with the configured payment mode.
    #[error("Event mode does not match configured mode")]
    ModeMismatch,

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// No local payment row maps to the event's intent yet. The
    /// intent-creation commit may not have landed; let the provider retry.
    #[error("Intent not yet mapped: {0}")]
    UnmappedIntent(String),

    /// Event data contradicts the stored payment row.
    #[error("Validation conflict: {0}")]
    Conflict(ConflictReason),

    /// Payment provider runtime was not initialized at startup.
    #[error("Payment provider not ready")]
    ProviderNotReady,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the provider should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::UnmappedIntent(_)
                | WebhookError::ProviderNotReady
                | WebhookError::Database(_)
        )
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine the provider's retry behavior:
    /// - 2xx: Event acknowledged, no retry
    /// - 4xx: Client error, no retry
    /// - 5xx: Server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::ModeMismatch
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,

            WebhookError::Conflict(_) => StatusCode::CONFLICT,

            WebhookError::UnmappedIntent(_) | WebhookError::ProviderNotReady => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_failures_return_bad_request() {
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::TimestampOutOfRange.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::ParseError("bad json".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn conflict_returns_409() {
        let err = WebhookError::Conflict(ConflictReason::AmountMismatch {
            expected: 2550,
            reported: 100,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(!err.is_retryable());
    }

    #[test]
    fn unmapped_intent_returns_503_and_is_retryable() {
        let err = WebhookError::UnmappedIntent("pi_123".into());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.is_retryable());
    }

    #[test]
    fn provider_not_ready_is_retryable() {
        let err = WebhookError::ProviderNotReady;
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.is_retryable());
    }

    #[test]
    fn database_error_returns_internal_and_is_retryable() {
        let err = WebhookError::Database("connection lost".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_retryable());
    }

    #[test]
    fn signature_failures_are_not_retryable() {
        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::MissingSignature.is_retryable());
        assert!(!WebhookError::ModeMismatch.is_retryable());
    }
}
