//! Payment route definitions.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_payment_intent, get_payment_status, handle_provider_webhook, PaymentsAppState,
};

/// Creates the payment routes for checkout and status polling.
///
/// These routes expect the session auth middleware to run in front of them;
/// the handlers themselves reject requests without an authenticated customer.
pub fn payment_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/intent", post(create_payment_intent))
        .route("/status/:order_id", get(get_payment_status))
}

/// Creates the webhook routes.
///
/// This is separate from the payment routes because webhooks don't carry a
/// user session; authenticity comes from the signature over the raw body.
pub fn webhook_routes() -> Router<PaymentsAppState> {
    Router::new().route("/stripe", post(handle_provider_webhook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::testing::test_state;

    #[test]
    fn payment_routes_compile_against_state() {
        let _: Router<()> = payment_routes().with_state(test_state(None, None));
    }

    #[test]
    fn webhook_routes_compile_against_state() {
        let _: Router<()> = webhook_routes().with_state(test_state(None, None));
    }
}
