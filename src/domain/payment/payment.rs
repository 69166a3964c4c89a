//! Payment records.
//!
//! A payment row is created per intent-creation attempt and only ever
//! state-transitioned afterwards; rows are never deleted, and amount/currency
//! are immutable once written. Multiple rows per order are expected across
//! retries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrderId, PaymentId};

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    IntentCreated,
    Authorized,
    Paid,
    Failed,
    Cancelled,
    /// Replaced by a fresh intent after the order's charge changed; kept as
    /// audit history and no longer counts as an open intent.
    Superseded,
}

impl PaymentStatus {
    /// Normalize a stored status string, defaulting unknown or blank values
    /// to the initial state.
    pub fn normalize(s: &str) -> Self {
        match s.trim() {
            "authorized" => Self::Authorized,
            "paid" => Self::Paid,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            "superseded" => Self::Superseded,
            _ => Self::IntentCreated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntentCreated => "intent_created",
            Self::Authorized => "authorized",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Superseded => "superseded",
        }
    }

    /// Terminal success: the money has moved.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted payment attempt.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub provider: String,
    pub provider_intent_id: String,
    /// Unique per creation attempt; doubles as the provider idempotency key.
    pub checkout_attempt_key: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new payment row; status is always `intent_created`.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: OrderId,
    pub provider: String,
    pub provider_intent_id: String,
    pub checkout_attempt_key: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_known_statuses() {
        assert_eq!(PaymentStatus::normalize("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::normalize("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::normalize("cancelled"), PaymentStatus::Cancelled);
    }

    #[test]
    fn normalize_defaults_to_intent_created() {
        assert_eq!(PaymentStatus::normalize(""), PaymentStatus::IntentCreated);
        assert_eq!(PaymentStatus::normalize("weird"), PaymentStatus::IntentCreated);
    }

    #[test]
    fn only_paid_is_settled() {
        assert!(PaymentStatus::Paid.is_settled());
        assert!(!PaymentStatus::IntentCreated.is_settled());
        assert!(!PaymentStatus::Authorized.is_settled());
        assert!(!PaymentStatus::Failed.is_settled());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            PaymentStatus::IntentCreated,
            PaymentStatus::Authorized,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
            PaymentStatus::Superseded,
        ] {
            assert_eq!(PaymentStatus::normalize(status.as_str()), status);
        }
    }
}
