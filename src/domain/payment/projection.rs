//! Client-facing payment status projection.
//!
//! Polling clients only ever see three states. The projection collapses the
//! order's own fields and the latest payment row into one answer, preferring
//! any evidence of settlement over evidence of failure.

use serde::Serialize;

use super::order::OrderRecord;
use super::payment::{PaymentRecord, PaymentStatus};

/// The status a polling client sees for an order's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientPaymentStatus {
    Pending,
    Confirmed,
    Failed,
}

impl ClientPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

/// Projects the order and its most recent payment into a client status.
pub fn project(order: &OrderRecord, latest_payment: Option<&PaymentRecord>) -> ClientPaymentStatus {
    let latest_status = latest_payment.map(|p| p.status);

    let confirmed = order.status.is_past_payment()
        || order.payment_status.is_paid()
        || latest_status == Some(PaymentStatus::Paid);
    if confirmed {
        return ClientPaymentStatus::Confirmed;
    }

    let failed = order.payment_status == super::order::OrderPaymentStatus::Failed
        || order.status == super::order::OrderStatus::Cancelled
        || matches!(
            latest_status,
            Some(PaymentStatus::Failed) | Some(PaymentStatus::Cancelled)
        );
    if failed {
        return ClientPaymentStatus::Failed;
    }

    ClientPaymentStatus::Pending
}
