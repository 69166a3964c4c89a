//! Order read model.
//!
//! Orders are owned by the external order service. This subsystem reads them
//! (including the locked totals snapshot) and updates only their payment
//! outcome fields through the transition engine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, OrderId};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Placed,
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Normalize a stored status string, defaulting unknown or blank values
    /// to the pending state.
    pub fn normalize(s: &str) -> Self {
        match s.trim() {
            "placed" => Self::Placed,
            "confirmed" => Self::Confirmed,
            "preparing" => Self::Preparing,
            "ready" => Self::Ready,
            "out_for_delivery" => Self::OutForDelivery,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::PendingPayment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Placed => "placed",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// States eligible for starting (or completing) a payment.
    pub fn accepts_payment(&self) -> bool {
        matches!(self, Self::PendingPayment | Self::Placed)
    }

    /// States reached only after payment was settled.
    pub fn is_past_payment(&self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Preparing | Self::Ready | Self::OutForDelivery | Self::Completed
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order-level payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl OrderPaymentStatus {
    /// Normalize a stored payment-status string, defaulting unknown or blank
    /// values to pending.
    pub fn normalize(s: &str) -> Self {
        match s.trim() {
            "paid" => Self::Paid,
            "failed" => Self::Failed,
            "refunded" => Self::Refunded,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl std::fmt::Display for OrderPaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable priced totals captured by the order service before payment
/// begins. Once the order marks it locked, this is the sole source of truth
/// for the amount to charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsSnapshot {
    /// Order total in major units (e.g. 25.50).
    pub total: f64,

    /// ISO currency code; case not guaranteed by the order service.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Order as read from (and partially written back to) the order service's
/// store.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub payment_status: OrderPaymentStatus,
    pub totals_snapshot: Option<TotalsSnapshot>,
    pub snapshot_locked: bool,
    pub payment_method: Option<String>,
    pub payment_transaction_id: Option<String>,
}

impl OrderRecord {
    /// Returns the totals snapshot only when it exists and is locked.
    pub fn locked_snapshot(&self) -> Option<&TotalsSnapshot> {
        if self.snapshot_locked {
            self.totals_snapshot.as_ref()
        } else {
            None
        }
    }

    /// Whether the given customer owns this order.
    pub fn owned_by(&self, customer: &CustomerId) -> bool {
        &self.customer_id == customer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_known_statuses() {
        assert_eq!(OrderStatus::normalize("placed"), OrderStatus::Placed);
        assert_eq!(OrderStatus::normalize("confirmed"), OrderStatus::Confirmed);
        assert_eq!(
            OrderStatus::normalize("out_for_delivery"),
            OrderStatus::OutForDelivery
        );
    }

    #[test]
    fn normalize_defaults_unknown_to_pending_payment() {
        assert_eq!(OrderStatus::normalize(""), OrderStatus::PendingPayment);
        assert_eq!(OrderStatus::normalize("  "), OrderStatus::PendingPayment);
        assert_eq!(OrderStatus::normalize("draft"), OrderStatus::PendingPayment);
    }

    #[test]
    fn payment_status_normalize_defaults_to_pending() {
        assert_eq!(OrderPaymentStatus::normalize("paid"), OrderPaymentStatus::Paid);
        assert_eq!(
            OrderPaymentStatus::normalize("unknown"),
            OrderPaymentStatus::Pending
        );
    }

    #[test]
    fn accepts_payment_only_before_confirmation() {
        assert!(OrderStatus::PendingPayment.accepts_payment());
        assert!(OrderStatus::Placed.accepts_payment());
        assert!(!OrderStatus::Confirmed.accepts_payment());
        assert!(!OrderStatus::Cancelled.accepts_payment());
    }

    #[test]
    fn locked_snapshot_requires_lock_flag() {
        let snapshot = TotalsSnapshot {
            total: 25.50,
            currency: Some("USD".to_string()),
        };
        let mut order = OrderRecord {
            id: OrderId::new(),
            customer_id: CustomerId::new(),
            status: OrderStatus::PendingPayment,
            payment_status: OrderPaymentStatus::Pending,
            totals_snapshot: Some(snapshot),
            snapshot_locked: false,
            payment_method: None,
            payment_transaction_id: None,
        };
        assert!(order.locked_snapshot().is_none());

        order.snapshot_locked = true;
        assert!(order.locked_snapshot().is_some());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::PendingPayment,
            OrderStatus::Placed,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::normalize(status.as_str()), status);
        }
    }
}
