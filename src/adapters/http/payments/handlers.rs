//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers. The webhook handler reads the raw body so signature verification
//! runs over exactly the bytes the provider signed.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::stripe::ProviderRuntime;
use crate::application::handlers::payments::{
    CheckoutError, CreateIntentCommand, CreateIntentOutcome, CreatePaymentIntentHandler,
    PaymentStatusHandler, PaymentStatusQuery, ProcessWebhookCommand, ProcessWebhookHandler,
    StatusError,
};
use crate::domain::foundation::OrderId;
use crate::domain::payment::WebhookError;
use crate::ports::{OrderRepository, PaymentRepository, TransitionStore};

use super::dto::{
    AlreadyPaidResponse, CreateIntentRequestBody, ErrorResponse, IntentReadyResponse,
    PaymentStatusResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all payment dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers. The provider slot is optional: when
/// bootstrap failed at startup, payment and webhook endpoints answer 503.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub orders: Arc<dyn OrderRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub transitions: Arc<dyn TransitionStore>,
    pub provider: Option<Arc<ProviderRuntime>>,
}

impl PaymentsAppState {
    /// Create handlers on demand from the shared state.
    fn create_intent_handler(&self) -> Result<CreatePaymentIntentHandler, PaymentsApiError> {
        let runtime = self
            .provider
            .as_ref()
            .ok_or(PaymentsApiError::Checkout(CheckoutError::ProviderNotReady))?;
        Ok(CreatePaymentIntentHandler::new(
            self.orders.clone(),
            self.payments.clone(),
            runtime.provider.clone(),
            Some(runtime.publishable_key.clone()),
        ))
    }

    fn webhook_handler(&self) -> Result<ProcessWebhookHandler, PaymentsApiError> {
        let runtime = self
            .provider
            .as_ref()
            .ok_or(PaymentsApiError::Webhook(WebhookError::ProviderNotReady))?;
        Ok(ProcessWebhookHandler::new(
            runtime.verifier.clone(),
            self.payments.clone(),
            self.transitions.clone(),
            runtime.provider.name(),
        ))
    }

    fn status_handler(&self) -> PaymentStatusHandler {
        PaymentStatusHandler::new(self.orders.clone(), self.payments.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/intent - Create or reuse a payment intent for an order.
pub async fn create_payment_intent(
    State(state): State<PaymentsAppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<CreateIntentRequestBody>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let handler = state.create_intent_handler()?;
    let cmd = CreateIntentCommand {
        order_id: request.order_id,
        caller,
    };

    match handler.handle(cmd).await? {
        CreateIntentOutcome::IntentReady(ready) => {
            Ok(Json(IntentReadyResponse::from(ready)).into_response())
        }
        CreateIntentOutcome::AlreadyPaid { order_id } => {
            Ok(Json(AlreadyPaidResponse::new(order_id)).into_response())
        }
    }
}

/// GET /api/payments/status/:order_id - Poll payment status for an order.
pub async fn get_payment_status(
    State(state): State<PaymentsAppState>,
    RequireAuth(caller): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let handler = state.status_handler();
    let query = PaymentStatusQuery { order_id, caller };

    let view = handler.handle(query).await?;

    Ok(Json(PaymentStatusResponse::from(view)))
}

/// POST /api/webhooks/stripe - Handle provider webhook deliveries.
///
/// No session auth; authenticity comes from the signature over the raw body.
/// All successful acks return 200 so the provider stops retrying.
pub async fn handle_provider_webhook(
    State(state): State<PaymentsAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let handler = state.webhook_handler()?;
    let cmd = ProcessWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    let ack = handler.handle(cmd).await?;
    tracing::debug!(ack = ?ack, "webhook acknowledged");

    Ok((StatusCode::OK, Json(serde_json::json!({ "received": true }))))
}

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum PaymentsApiError {
    Checkout(CheckoutError),
    Status(StatusError),
    Webhook(WebhookError),
}

impl From<CheckoutError> for PaymentsApiError {
    fn from(err: CheckoutError) -> Self {
        Self::Checkout(err)
    }
}

impl From<StatusError> for PaymentsApiError {
    fn from(err: StatusError) -> Self {
        Self::Status(err)
    }
}

impl From<WebhookError> for PaymentsApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match &self {
            PaymentsApiError::Checkout(err) => {
                let (status, code) = match err {
                    CheckoutError::Forbidden => (StatusCode::FORBIDDEN, "ORDER_FORBIDDEN"),
                    CheckoutError::OrderNotFound => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
                    CheckoutError::IneligibleState(_) => (StatusCode::CONFLICT, "ORDER_NOT_PAYABLE"),
                    CheckoutError::SnapshotNotLocked => {
                        (StatusCode::CONFLICT, "TOTALS_NOT_LOCKED")
                    }
                    CheckoutError::NonPositiveTotal => {
                        (StatusCode::CONFLICT, "NON_POSITIVE_TOTAL")
                    }
                    CheckoutError::ProviderNotReady => {
                        (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_NOT_READY")
                    }
                    CheckoutError::Provider(provider_err) if provider_err.retryable => {
                        (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_ERROR")
                    }
                    CheckoutError::Provider(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
                    CheckoutError::Persistence(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                // Provider and persistence details go to logs, not callers.
                let message = match err {
                    CheckoutError::Provider(_) => "payment provider request failed".to_string(),
                    CheckoutError::Persistence(_) => "internal error".to_string(),
                    other => other.to_string(),
                };
                (status, code, message)
            }
            PaymentsApiError::Status(err) => {
                let (status, code) = match err {
                    StatusError::Forbidden => (StatusCode::FORBIDDEN, "ORDER_FORBIDDEN"),
                    StatusError::OrderNotFound => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
                    StatusError::Persistence(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                let message = match err {
                    StatusError::Persistence(_) => "internal error".to_string(),
                    other => other.to_string(),
                };
                (status, code, message)
            }
            PaymentsApiError::Webhook(err) => {
                let code = match err {
                    WebhookError::MissingSignature => "MISSING_SIGNATURE",
                    WebhookError::InvalidSignature => "INVALID_SIGNATURE",
                    WebhookError::TimestampOutOfRange | WebhookError::InvalidTimestamp => {
                        "INVALID_TIMESTAMP"
                    }
                    WebhookError::ParseError(_) => "PARSE_ERROR",
                    WebhookError::ModeMismatch => "MODE_MISMATCH",
                    WebhookError::MissingField(_) => "MISSING_FIELD",
                    WebhookError::UnmappedIntent(_) => "INTENT_NOT_MAPPED",
                    WebhookError::Conflict(_) => "VALIDATION_CONFLICT",
                    WebhookError::ProviderNotReady => "PROVIDER_NOT_READY",
                    WebhookError::Database(_) => "INTERNAL_ERROR",
                };
                let message = match err {
                    WebhookError::Database(_) => "internal error".to_string(),
                    other => other.to_string(),
                };
                (err.status_code(), code, message)
            }
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "payment request failed");
        } else {
            tracing::debug!(error = ?self, "payment request rejected");
        }

        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{payable_order, test_runtime, test_state};
    use super::*;
    use crate::domain::foundation::{AuthenticatedCustomer, CustomerId, DomainError};
    use crate::domain::payment::{ConflictReason, OrderStatus};

    // ════════════════════════════════════════════════════════════════════════════
    // Handler Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_intent_succeeds_for_payable_order() {
        let customer_id = CustomerId::new();
        let order = payable_order(customer_id);
        let order_id = order.id;
        let state = test_state(Some(order), Some(test_runtime()));

        let result = create_payment_intent(
            State(state),
            RequireAuth(AuthenticatedCustomer::new(customer_id, None)),
            Json(CreateIntentRequestBody { order_id }),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_intent_without_provider_runtime_returns_503() {
        let customer_id = CustomerId::new();
        let order = payable_order(customer_id);
        let order_id = order.id;
        let state = test_state(Some(order), None);

        let err = create_payment_intent(
            State(state),
            RequireAuth(AuthenticatedCustomer::new(customer_id, None)),
            Json(CreateIntentRequestBody { order_id }),
        )
        .await
        .err()
        .unwrap();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn status_poll_succeeds_for_owned_order() {
        let customer_id = CustomerId::new();
        let order = payable_order(customer_id);
        let order_id = order.id;
        // The status endpoint stays up even without a provider runtime.
        let state = test_state(Some(order), None);

        let result = get_payment_status(
            State(state),
            RequireAuth(AuthenticatedCustomer::new(customer_id, None)),
            Path(order_id),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn webhook_without_provider_runtime_returns_503() {
        let state = test_state(None, None);

        let err = handle_provider_webhook(
            State(state),
            axum::http::HeaderMap::new(),
            axum::body::Bytes::from_static(b"{}"),
        )
        .await
        .err()
        .unwrap();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn webhook_without_signature_returns_400() {
        let state = test_state(None, Some(test_runtime()));

        let err = handle_provider_webhook(
            State(state),
            axum::http::HeaderMap::new(),
            axum::body::Bytes::from_static(b"{}"),
        )
        .await
        .err()
        .unwrap();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn api_error_maps_forbidden_to_403() {
        let err = PaymentsApiError::Checkout(CheckoutError::Forbidden);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn api_error_maps_order_not_found_to_404() {
        let err = PaymentsApiError::Checkout(CheckoutError::OrderNotFound);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_maps_ineligible_state_to_409() {
        let err =
            PaymentsApiError::Checkout(CheckoutError::IneligibleState(OrderStatus::Cancelled));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn api_error_maps_snapshot_not_locked_to_409() {
        let err = PaymentsApiError::Checkout(CheckoutError::SnapshotNotLocked);
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn api_error_maps_provider_not_ready_to_503() {
        let err = PaymentsApiError::Checkout(CheckoutError::ProviderNotReady);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn api_error_maps_persistence_to_500() {
        let err = PaymentsApiError::Checkout(CheckoutError::Persistence(DomainError::database(
            "connection lost",
        )));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_error_maps_status_forbidden_to_403() {
        let err = PaymentsApiError::Status(StatusError::Forbidden);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn api_error_maps_invalid_signature_to_400() {
        let err = PaymentsApiError::Webhook(WebhookError::InvalidSignature);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_maps_webhook_conflict_to_409() {
        let err = PaymentsApiError::Webhook(WebhookError::Conflict(
            ConflictReason::AmountMismatch {
                expected: 2550,
                reported: 100,
            },
        ));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn api_error_maps_unmapped_intent_to_503() {
        let err = PaymentsApiError::Webhook(WebhookError::UnmappedIntent("pi_1".into()));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
