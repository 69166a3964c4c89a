//! CreatePaymentIntentHandler - Command handler for checkout intent creation.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::{AuthenticatedCustomer, DomainError, ErrorCode, OrderId};
use crate::domain::payment::{Charge, NewPayment, OrderStatus};
use crate::ports::{
    CreateIntentRequest, OrderRepository, PaymentProvider, PaymentRepository, ProviderError,
};

/// Command to create or reuse a payment intent for an order.
#[derive(Debug, Clone)]
pub struct CreateIntentCommand {
    pub order_id: OrderId,
    pub caller: AuthenticatedCustomer,
}

/// Result of successful intent resolution.
#[derive(Debug, Clone)]
pub enum CreateIntentOutcome {
    /// An intent (fresh or reused) is ready for the client to complete.
    IntentReady(IntentReady),

    /// The order was already paid; a success, not an error.
    AlreadyPaid { order_id: OrderId },
}

/// The values the client needs to complete payment.
#[derive(Debug, Clone)]
pub struct IntentReady {
    pub payment_intent_id: String,
    /// Sensitive; handed to the owning customer only, never logged.
    pub client_secret: String,
    pub checkout_attempt_key: String,
    /// Publishable key for the active mode, for client-side SDK init.
    pub publishable_key: Option<String>,
}

/// Why checkout could not proceed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("order does not belong to caller")]
    Forbidden,

    #[error("order not found")]
    OrderNotFound,

    #[error("order state {0} does not accept payment")]
    IneligibleState(OrderStatus),

    #[error("order totals snapshot is missing or not locked")]
    SnapshotNotLocked,

    #[error("order total must be positive")]
    NonPositiveTotal,

    #[error("payment provider not ready")]
    ProviderNotReady,

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("persistence error: {0}")]
    Persistence(DomainError),
}

/// Handler for checkout intent creation.
///
/// Reuses an existing `intent_created` payment when the remote intent still
/// matches the order's locked snapshot; otherwise creates a fresh intent and
/// persists the new row before the secret leaves this process, so a webhook
/// can always find a local mapping.
pub struct CreatePaymentIntentHandler {
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentRepository>,
    provider: Arc<dyn PaymentProvider>,
    publishable_key: Option<String>,
}

impl CreatePaymentIntentHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        payments: Arc<dyn PaymentRepository>,
        provider: Arc<dyn PaymentProvider>,
        publishable_key: Option<String>,
    ) -> Self {
        Self {
            orders,
            payments,
            provider,
            publishable_key,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateIntentCommand,
    ) -> Result<CreateIntentOutcome, CheckoutError> {
        // 1. Load the order and enforce ownership
        let order = self
            .orders
            .find_by_id(&cmd.order_id)
            .await
            .map_err(CheckoutError::Persistence)?
            .ok_or(CheckoutError::OrderNotFound)?;

        if !order.owned_by(&cmd.caller.id) {
            return Err(CheckoutError::Forbidden);
        }

        // 2. Already paid short-circuits to a success response
        if order.payment_status.is_paid() {
            return Ok(CreateIntentOutcome::AlreadyPaid {
                order_id: order.id,
            });
        }

        // 3. Eligibility checks, each a distinct error
        if !order.status.accepts_payment() {
            return Err(CheckoutError::IneligibleState(order.status));
        }

        let snapshot = order
            .locked_snapshot()
            .ok_or(CheckoutError::SnapshotNotLocked)?;

        // 4. Derive the charge once from the locked snapshot; these values
        //    are never recomputed for this attempt
        let charge = Charge::from_snapshot(snapshot);
        if !charge.is_positive() {
            return Err(CheckoutError::NonPositiveTotal);
        }

        // 5. Reuse path: hand back an existing intent if it still matches
        if let Some(existing) = self
            .payments
            .find_latest_intent_created(&order.id)
            .await
            .map_err(CheckoutError::Persistence)?
        {
            match self.provider.retrieve_intent(&existing.provider_intent_id).await {
                Ok(Some(remote))
                    if remote.amount_minor == charge.amount_minor
                        && remote.currency == charge.currency
                        && !remote.client_secret.is_empty() =>
                {
                    return Ok(CreateIntentOutcome::IntentReady(IntentReady {
                        payment_intent_id: existing.provider_intent_id,
                        client_secret: remote.client_secret,
                        checkout_attempt_key: existing.checkout_attempt_key,
                        publishable_key: self.publishable_key.clone(),
                    }));
                }
                // Retrieval failure or mismatch: mark the row superseded so
                // the one-open-intent slot is free, then fall through to a
                // fresh intent. The row itself stays as audit history.
                _ => {
                    self.payments
                        .supersede_open_intents(&order.id)
                        .await
                        .map_err(CheckoutError::Persistence)?;
                }
            }
        }

        // 6. Creation path: fresh attempt key doubles as the provider-level
        //    idempotency key
        let attempt_key = Uuid::new_v4().to_string();

        let intent = self
            .provider
            .create_intent(CreateIntentRequest {
                amount_minor: charge.amount_minor,
                currency: charge.currency.clone(),
                order_id: order.id,
                customer_id: cmd.caller.id,
                idempotency_key: attempt_key.clone(),
            })
            .await?;

        // 7. Persist the row before returning the secret, so a webhook
        //    arriving immediately after can resolve the mapping. The payments
        //    table enforces one open intent per order; losing that race means
        //    a concurrent call inserted first, so hand back its intent.
        match self
            .payments
            .insert(NewPayment {
                order_id: order.id,
                provider: self.provider.name().to_string(),
                provider_intent_id: intent.id.clone(),
                checkout_attempt_key: attempt_key.clone(),
                amount_minor: charge.amount_minor,
                currency: charge.currency,
            })
            .await
        {
            Ok(_) => Ok(CreateIntentOutcome::IntentReady(IntentReady {
                payment_intent_id: intent.id,
                client_secret: intent.client_secret,
                checkout_attempt_key: attempt_key,
                publishable_key: self.publishable_key.clone(),
            })),
            Err(err) if err.code == ErrorCode::OpenIntentExists => {
                self.resolve_winning_intent(&order.id).await
            }
            Err(err) => Err(CheckoutError::Persistence(err)),
        }
    }

    /// Recovery after losing the one-open-intent-per-order race: re-read the
    /// row the concurrent call inserted and return its intent. The remote
    /// intent created by the losing call is left behind unused.
    async fn resolve_winning_intent(
        &self,
        order_id: &OrderId,
    ) -> Result<CreateIntentOutcome, CheckoutError> {
        let winner = self
            .payments
            .find_latest_intent_created(order_id)
            .await
            .map_err(CheckoutError::Persistence)?
            .ok_or_else(|| {
                CheckoutError::Persistence(DomainError::new(
                    ErrorCode::PaymentNotFound,
                    "Open intent vanished after insert conflict",
                ))
            })?;

        let remote = self
            .provider
            .retrieve_intent(&winner.provider_intent_id)
            .await?
            .ok_or_else(|| {
                CheckoutError::Persistence(DomainError::new(
                    ErrorCode::PaymentNotFound,
                    "Provider has no intent for the winning row",
                ))
            })?;

        Ok(CreateIntentOutcome::IntentReady(IntentReady {
            payment_intent_id: winner.provider_intent_id,
            client_secret: remote.client_secret,
            checkout_attempt_key: winner.checkout_attempt_key,
            publishable_key: self.publishable_key.clone(),
        }))
    }
}
