//! Stripe API response types.
//!
//! Only the fields this subsystem reads are captured; everything else in
//! Stripe's payload is ignored.

use serde::Deserialize;

/// A payment intent as Stripe's API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    /// Intent identifier (pi_xxx format).
    pub id: String,

    /// Secret the browser SDK needs to complete payment. Absent once the
    /// intent reaches a terminal state.
    pub client_secret: Option<String>,

    /// Intent status (e.g., "requires_payment_method", "succeeded").
    pub status: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Lowercase ISO currency code.
    pub currency: String,
}

/// Error envelope Stripe wraps failures in.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeApiError,
}

/// The error object inside a Stripe failure response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_intent_with_secret() {
        let json = r#"{
            "id": "pi_123",
            "client_secret": "pi_123_secret_abc",
            "status": "requires_payment_method",
            "amount": 2550,
            "currency": "usd",
            "object": "payment_intent"
        }"#;

        let intent: StripePaymentIntent = serde_json::from_str(json).unwrap();
        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.client_secret.as_deref(), Some("pi_123_secret_abc"));
        assert_eq!(intent.amount, 2550);
    }

    #[test]
    fn deserialize_intent_without_secret() {
        let json = r#"{
            "id": "pi_done",
            "client_secret": null,
            "status": "succeeded",
            "amount": 2550,
            "currency": "usd"
        }"#;

        let intent: StripePaymentIntent = serde_json::from_str(json).unwrap();
        assert!(intent.client_secret.is_none());
    }

    #[test]
    fn deserialize_error_response() {
        let json = r#"{
            "error": {
                "type": "invalid_request_error",
                "code": "parameter_missing",
                "message": "Missing required param: amount."
            }
        }"#;

        let err: StripeErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error.code.as_deref(), Some("parameter_missing"));
    }
}
