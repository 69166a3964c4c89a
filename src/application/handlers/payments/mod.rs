//! Payment handlers.
//!
//! Command and query handlers for the payment lifecycle:
//!
//! ## Commands
//! - Creating or reusing checkout payment intents
//! - Processing provider webhook deliveries
//!
//! ## Queries
//! - Payment status projection for polling clients

mod create_intent;
mod payment_status;
mod process_webhook;

// Commands
pub use create_intent::{
    CheckoutError, CreateIntentCommand, CreateIntentOutcome, CreatePaymentIntentHandler,
    IntentReady,
};
pub use process_webhook::{ProcessWebhookCommand, ProcessWebhookHandler, WebhookAck};

// Queries
pub use payment_status::{
    PaymentStatusHandler, PaymentStatusQuery, PaymentStatusView, StatusError,
};
