//! Shared test doubles for the payment HTTP layer.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::adapters::stripe::{MockPaymentProvider, ProviderRuntime};
use crate::config::PaymentMode;
use crate::domain::foundation::{CustomerId, DomainError, OrderId, PaymentId};
use crate::domain::payment::{
    NewPayment, OrderPaymentStatus, OrderRecord, OrderStatus, PaymentRecord, PaymentStatus,
    ReconciledEvent, TotalsSnapshot, WebhookError, WebhookVerifier,
};
use crate::ports::{OrderRepository, PaymentRepository, TransitionOutcome, TransitionStore};

use super::handlers::PaymentsAppState;

pub struct MockOrderRepository {
    pub order: Option<OrderRecord>,
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<OrderRecord>, DomainError> {
        Ok(self.order.clone().filter(|o| o.id == *id))
    }
}

pub struct MockPaymentRepository;

#[async_trait]
impl PaymentRepository for MockPaymentRepository {
    async fn insert(&self, payment: NewPayment) -> Result<PaymentRecord, DomainError> {
        Ok(PaymentRecord {
            id: PaymentId::new(),
            order_id: payment.order_id,
            provider: payment.provider,
            provider_intent_id: payment.provider_intent_id,
            checkout_attempt_key: payment.checkout_attempt_key,
            amount_minor: payment.amount_minor,
            currency: payment.currency,
            status: PaymentStatus::IntentCreated,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        })
    }

    async fn supersede_open_intents(&self, _order_id: &OrderId) -> Result<u64, DomainError> {
        Ok(0)
    }

    async fn find_latest_intent_created(
        &self,
        _order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(None)
    }

    async fn find_by_provider_intent(
        &self,
        _provider: &str,
        _intent_id: &str,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(None)
    }

    async fn find_latest_for_order(
        &self,
        _order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(None)
    }
}

pub struct MockTransitionStore;

#[async_trait]
impl TransitionStore for MockTransitionStore {
    async fn apply(
        &self,
        _payment_id: &PaymentId,
        _event: &ReconciledEvent,
    ) -> Result<TransitionOutcome, WebhookError> {
        Ok(TransitionOutcome::AlreadySettled)
    }
}

/// An order in the state checkout accepts.
pub fn payable_order(customer_id: CustomerId) -> OrderRecord {
    OrderRecord {
        id: OrderId::new(),
        customer_id,
        status: OrderStatus::PendingPayment,
        payment_status: OrderPaymentStatus::Pending,
        totals_snapshot: Some(TotalsSnapshot {
            total: 25.50,
            currency: Some("USD".to_string()),
        }),
        snapshot_locked: true,
        payment_method: None,
        payment_transaction_id: None,
    }
}

pub fn test_runtime() -> Arc<ProviderRuntime> {
    Arc::new(ProviderRuntime {
        provider: Arc::new(MockPaymentProvider::new()),
        publishable_key: "pk_test_state".to_string(),
        verifier: WebhookVerifier::new(SecretString::new("whsec_state".into()), false),
        mode: PaymentMode::Test,
    })
}

pub fn test_state(
    order: Option<OrderRecord>,
    provider: Option<Arc<ProviderRuntime>>,
) -> PaymentsAppState {
    PaymentsAppState {
        orders: Arc::new(MockOrderRepository { order }),
        payments: Arc::new(MockPaymentRepository),
        transitions: Arc::new(MockTransitionStore),
        provider,
    }
}
