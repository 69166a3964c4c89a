//! Payment domain module.
//!
//! Owns the payment side of the marketplace: charge derivation from locked
//! order snapshots, payment records, webhook verification, transition
//! decisions, and the client-facing status projection.
//!
//! # Module Structure
//!
//! - `order` - Externally-owned order model as this subsystem sees it
//! - `charge` - Minor-unit charge derivation from totals snapshots
//! - `payment` - Payment attempt records and lifecycle status
//! - `provider_event` - Provider webhook payload types and extractors
//! - `webhook_verifier` - HMAC signature verification with replay protection
//! - `webhook_errors` - Webhook error taxonomy with HTTP/retry mapping
//! - `transition` - Pure transition decisions for verified events
//! - `projection` - Three-state status projection for polling clients

pub mod charge;
pub mod order;
pub mod payment;
pub mod projection;
pub mod provider_event;
pub mod transition;
pub mod webhook_errors;
pub mod webhook_verifier;

pub use charge::Charge;
pub use order::{OrderPaymentStatus, OrderRecord, OrderStatus, TotalsSnapshot};
pub use payment::{NewPayment, PaymentRecord, PaymentStatus};
pub use projection::{project, ClientPaymentStatus};
pub use provider_event::{ActionableEventType, ProviderEvent};
pub use transition::{decide, ConflictReason, ReconciledEvent, TransitionDecision};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, WebhookVerifier};
