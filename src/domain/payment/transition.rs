//! Transition decisions for reconciling provider events against local state.
//!
//! `decide` is pure: it looks at the stored payment, the stored order, and
//! the facts reported by a verified event, and says what should happen. The
//! transactional store applies the decision; nothing here touches I/O.

use thiserror::Error;

use super::order::OrderRecord;
use super::payment::{PaymentRecord, PaymentStatus};
use super::provider_event::{ActionableEventType, ProviderEvent};

/// The facts extracted from a verified provider event that the transition
/// engine needs. Built after signature verification and allow-list filtering.
#[derive(Debug, Clone)]
pub struct ReconciledEvent {
    /// Provider event id, unique per delivery attempt series.
    pub event_id: String,
    pub kind: ActionableEventType,
    /// Provider intent id the event refers to.
    pub intent_id: String,
    /// Amount the provider reports as received, in minor units.
    pub amount_reported: Option<i64>,
    /// Lowercase currency code reported by the provider.
    pub currency_reported: Option<String>,
    pub payment_method: Option<String>,
}

impl ReconciledEvent {
    /// Extracts the reconcilable facts from a parsed event.
    ///
    /// Returns `None` when the event type is outside the allow-list or the
    /// payload carries no intent id.
    pub fn from_event(event: &ProviderEvent) -> Option<Self> {
        let kind = event.parsed_type()?;
        let intent_id = event.intent_id()?.to_string();
        Some(Self {
            event_id: event.id.clone(),
            kind,
            intent_id,
            amount_reported: event.amount_received(),
            currency_reported: event.currency(),
            payment_method: event.payment_method().map(str::to_string),
        })
    }
}

/// Why an event contradicts the stored payment row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictReason {
    #[error("currency mismatch: stored {expected}, reported {reported}")]
    CurrencyMismatch { expected: String, reported: String },

    #[error("amount mismatch: stored {expected}, reported {reported}")]
    AmountMismatch { expected: i64, reported: i64 },

    #[error("non-positive reported amount: {0}")]
    NonPositiveAmount(i64),
}

/// What the transactional store should do with a validated event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Mark the payment paid and advance the order to confirmed.
    ApplySuccess { payment_method: Option<String> },

    /// Mark the payment failed; the order status stays put so the customer
    /// can retry, only its payment status flips.
    ApplyFailure,

    /// The payment already settled. Acknowledge without writing anything;
    /// this is the short-circuit for redelivered or late events.
    AlreadySettled,

    /// The event is valid but the order has moved past the states that
    /// accept payment. Record the event for audit, transition nothing.
    RecordOnly,

    /// The event contradicts stored facts. Reject, record nothing.
    Conflict(ConflictReason),
}

/// Decides what a verified, allow-listed event should do to local state.
///
/// Check order matters: conflicts are detected before settlement
/// short-circuits so that corrupt data never gets silently acknowledged,
/// and settlement is checked before order-state eligibility so redeliveries
/// stay write-free.
pub fn decide(
    payment: &PaymentRecord,
    order: &OrderRecord,
    event: &ReconciledEvent,
) -> TransitionDecision {
    if let Some(reported) = &event.currency_reported {
        if !payment.currency.is_empty() && payment.currency != *reported {
            return TransitionDecision::Conflict(ConflictReason::CurrencyMismatch {
                expected: payment.currency.clone(),
                reported: reported.clone(),
            });
        }
    }

    if event.kind == ActionableEventType::PaymentSucceeded {
        let reported = event.amount_reported.unwrap_or(0);
        if reported <= 0 {
            return TransitionDecision::Conflict(ConflictReason::NonPositiveAmount(reported));
        }
        if reported != payment.amount_minor {
            return TransitionDecision::Conflict(ConflictReason::AmountMismatch {
                expected: payment.amount_minor,
                reported,
            });
        }
    }

    let already_settled = payment.status == PaymentStatus::Paid
        || order.payment_status.is_paid()
        || order.status.is_past_payment();
    if already_settled {
        return TransitionDecision::AlreadySettled;
    }

    match event.kind {
        ActionableEventType::PaymentSucceeded => {
            if !order.status.accepts_payment() {
                return TransitionDecision::RecordOnly;
            }
            TransitionDecision::ApplySuccess {
                payment_method: event.payment_method.clone(),
            }
        }
        ActionableEventType::PaymentFailed => {
            if !order.status.accepts_payment() {
                return TransitionDecision::RecordOnly;
            }
            TransitionDecision::ApplyFailure
        }
    }
}
