//! PaymentStatusHandler - Read-only status projection for polling clients.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{AuthenticatedCustomer, DomainError, OrderId};
use crate::domain::payment::{project, ClientPaymentStatus, OrderPaymentStatus, OrderStatus};
use crate::ports::{OrderRepository, PaymentRepository};

/// Query for the payment status of an order.
#[derive(Debug, Clone)]
pub struct PaymentStatusQuery {
    pub order_id: OrderId,
    pub caller: AuthenticatedCustomer,
}

/// What a polling client gets back. Deliberately coarse: no amounts, no
/// provider secrets, no internal identifiers beyond the intent id.
#[derive(Debug, Clone)]
pub struct PaymentStatusView {
    pub status: ClientPaymentStatus,
    pub order_status: OrderStatus,
    pub payment_status: OrderPaymentStatus,
    pub payment_intent_id: Option<String>,
}

/// Why the status query could not be answered.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("order does not belong to caller")]
    Forbidden,

    #[error("order not found")]
    OrderNotFound,

    #[error("persistence error: {0}")]
    Persistence(DomainError),
}

/// Handler for the read-only payment status query.
pub struct PaymentStatusHandler {
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentStatusHandler {
    pub fn new(orders: Arc<dyn OrderRepository>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { orders, payments }
    }

    pub async fn handle(&self, query: PaymentStatusQuery) -> Result<PaymentStatusView, StatusError> {
        let order = self
            .orders
            .find_by_id(&query.order_id)
            .await
            .map_err(StatusError::Persistence)?
            .ok_or(StatusError::OrderNotFound)?;

        if !order.owned_by(&query.caller.id) {
            return Err(StatusError::Forbidden);
        }

        let latest = self
            .payments
            .find_latest_for_order(&order.id)
            .await
            .map_err(StatusError::Persistence)?;

        let status = project(&order, latest.as_ref());

        Ok(PaymentStatusView {
            status,
            order_status: order.status,
            payment_status: order.payment_status,
            payment_intent_id: latest.map(|p| p.provider_intent_id),
        })
    }
}
