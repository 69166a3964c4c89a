//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! These types define the JSON request/response structure for the payments API.
//! They serve as the boundary between HTTP and the application layer. Response
//! shapes expose only what a browser checkout needs; amounts and provider
//! internals stay server-side.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payments::{IntentReady, PaymentStatusView};
use crate::domain::foundation::OrderId;
use crate::domain::payment::{ClientPaymentStatus, OrderPaymentStatus, OrderStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create (or reuse) a payment intent for an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIntentRequestBody {
    /// The order to start payment for.
    pub order_id: OrderId,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response when an intent is ready for the client to complete.
#[derive(Debug, Clone, Serialize)]
pub struct IntentReadyResponse {
    pub success: bool,
    /// Provider intent id (pi_...).
    pub payment_intent_id: String,
    /// Client secret for the browser SDK. Returned to the owning customer
    /// only; never logged.
    pub client_secret: String,
    /// Attempt key tying this response to the persisted payment row.
    pub checkout_attempt_key: String,
    /// Publishable key for the active mode, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,
}

impl From<IntentReady> for IntentReadyResponse {
    fn from(ready: IntentReady) -> Self {
        Self {
            success: true,
            payment_intent_id: ready.payment_intent_id,
            client_secret: ready.client_secret,
            checkout_attempt_key: ready.checkout_attempt_key,
            publishable_key: ready.publishable_key,
        }
    }
}

/// Response when the order was already paid; a success, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct AlreadyPaidResponse {
    pub success: bool,
    pub already_paid: bool,
    pub order_id: String,
}

impl AlreadyPaidResponse {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            success: true,
            already_paid: true,
            order_id: order_id.to_string(),
        }
    }
}

/// Response for the payment status poll.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    pub success: bool,
    /// Coarse client-facing status: pending, confirmed, or failed.
    pub status: ClientPaymentStatus,
    /// Order lifecycle status.
    pub order_status: OrderStatus,
    /// Order-level payment status.
    pub payment_status: OrderPaymentStatus,
    /// Latest provider intent id for this order, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}

impl From<PaymentStatusView> for PaymentStatusResponse {
    fn from(view: PaymentStatusView) -> Self {
        Self {
            success: true,
            status: view.status,
            order_status: view.order_status,
            payment_status: view.payment_status,
            payment_intent_id: view.payment_intent_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_intent_request_deserializes() {
        let id = OrderId::new();
        let json = format!(r#"{{"order_id": "{}"}}"#, id);
        let request: CreateIntentRequestBody = serde_json::from_str(&json).unwrap();
        assert_eq!(request.order_id, id);
    }

    #[test]
    fn create_intent_request_rejects_non_uuid() {
        let json = r#"{"order_id": "order-42"}"#;
        assert!(serde_json::from_str::<CreateIntentRequestBody>(json).is_err());
    }

    #[test]
    fn intent_ready_response_serializes_all_fields() {
        let response = IntentReadyResponse::from(IntentReady {
            payment_intent_id: "pi_123".to_string(),
            client_secret: "pi_123_secret_x".to_string(),
            checkout_attempt_key: "attempt-1".to_string(),
            publishable_key: Some("pk_test_abc".to_string()),
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""success":true"#));
        assert!(json.contains("pi_123_secret_x"));
        assert!(json.contains("pk_test_abc"));
    }

    #[test]
    fn intent_ready_response_omits_absent_publishable_key() {
        let response = IntentReadyResponse::from(IntentReady {
            payment_intent_id: "pi_123".to_string(),
            client_secret: "secret".to_string(),
            checkout_attempt_key: "attempt-1".to_string(),
            publishable_key: None,
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("publishable_key"));
    }

    #[test]
    fn already_paid_response_serializes() {
        let id = OrderId::new();
        let json = serde_json::to_string(&AlreadyPaidResponse::new(id)).unwrap();
        assert!(json.contains(r#""already_paid":true"#));
        assert!(json.contains(&id.to_string()));
    }

    #[test]
    fn status_response_serializes_snake_case_statuses() {
        let response = PaymentStatusResponse {
            success: true,
            status: ClientPaymentStatus::Confirmed,
            order_status: OrderStatus::Confirmed,
            payment_status: OrderPaymentStatus::Paid,
            payment_intent_id: Some("pi_9".to_string()),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""status":"confirmed""#));
        assert!(json.contains(r#""payment_status":"paid""#));
    }

    #[test]
    fn error_response_serializes_code_and_message() {
        let response = ErrorResponse::new("ORDER_NOT_FOUND", "order not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ORDER_NOT_FOUND"));
        assert!(json.contains("order not found"));
    }
}
