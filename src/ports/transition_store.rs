//! Transactional transition port.
//!
//! The one place where a verified provider event becomes durable state. An
//! implementation must make the whole reconciliation atomic: event record,
//! payment update, order update, and history row commit together or not at
//! all.

use async_trait::async_trait;

use crate::domain::foundation::{OrderId, PaymentId};
use crate::domain::payment::webhook_errors::WebhookError;
use crate::domain::payment::ReconciledEvent;

/// What the store actually did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The decision was applied; payment and order moved.
    Applied { order_id: OrderId },

    /// The payment had already settled before this event; nothing written.
    AlreadySettled,

    /// This exact event id was already recorded; nothing written.
    DuplicateEvent,

    /// Event recorded for audit but the order was past the states that
    /// accept payment; no transition.
    RecordedOnly,
}

/// Applies a reconciled event to local state, atomically.
///
/// # Contract
///
/// - Locks the payment row, then its order row, always in that order
/// - Re-evaluates the transition decision against the locked rows
/// - Records the event exactly once (unique event id); a replay returns
///   `DuplicateEvent` without further writes
/// - Conflicts roll back everything and surface as `WebhookError::Conflict`
#[async_trait]
pub trait TransitionStore: Send + Sync {
    async fn apply(
        &self,
        payment_id: &PaymentId,
        event: &ReconciledEvent,
    ) -> Result<TransitionOutcome, WebhookError>;
}
