//! ProcessWebhookHandler - Command handler for provider webhook deliveries.

use std::sync::Arc;

use crate::domain::payment::webhook_errors::WebhookError;
use crate::domain::payment::{ReconciledEvent, WebhookVerifier};
use crate::ports::{PaymentRepository, TransitionOutcome, TransitionStore};

/// Command to process a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Raw request body, exactly as received. Signature verification runs
    /// over these bytes before anything is parsed.
    pub payload: Vec<u8>,
    /// Signature header, if the request carried one.
    pub signature: Option<String>,
}

/// How a delivery was acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAck {
    /// An actionable event went through the transition store.
    Processed(TransitionOutcome),

    /// Verified event type outside the allow-list; acknowledged so the
    /// provider stops retrying it.
    IgnoredEventType,

    /// Actionable type but no intent id in the payload; not worth a retry.
    MissingIntentId,
}

/// Handler for provider webhook deliveries.
///
/// Order of operations is fixed: verify the signature over the raw bytes,
/// filter by event type, resolve the local payment mapping, then hand off to
/// the transactional transition store.
pub struct ProcessWebhookHandler {
    verifier: WebhookVerifier,
    payments: Arc<dyn PaymentRepository>,
    transitions: Arc<dyn TransitionStore>,
    provider_name: String,
}

impl ProcessWebhookHandler {
    pub fn new(
        verifier: WebhookVerifier,
        payments: Arc<dyn PaymentRepository>,
        transitions: Arc<dyn TransitionStore>,
        provider_name: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            payments,
            transitions,
            provider_name: provider_name.into(),
        }
    }

    pub async fn handle(&self, cmd: ProcessWebhookCommand) -> Result<WebhookAck, WebhookError> {
        // 1. Signature must be present and valid before anything else
        let signature = match cmd.signature.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => return Err(WebhookError::MissingSignature),
        };

        let event = self.verifier.verify_and_parse(&cmd.payload, signature)?;

        // 2. Allow-list filter: anything else is acknowledged untouched
        if event.parsed_type().is_none() {
            return Ok(WebhookAck::IgnoredEventType);
        }

        // 3. Actionable events without an intent id are malformed but not
        //    retryable; acknowledge and move on
        let reconciled = match ReconciledEvent::from_event(&event) {
            Some(r) => r,
            None => return Ok(WebhookAck::MissingIntentId),
        };

        // 4. Resolve the local mapping; absence means our intent-creation
        //    commit has not landed yet, so let the provider retry
        let payment = self
            .payments
            .find_by_provider_intent(&self.provider_name, &reconciled.intent_id)
            .await
            .map_err(|e| WebhookError::Database(e.message))?
            .ok_or_else(|| WebhookError::UnmappedIntent(reconciled.intent_id.clone()))?;

        // 5. One atomic transaction does the rest
        let outcome = self.transitions.apply(&payment.id, &reconciled).await?;

        Ok(WebhookAck::Processed(outcome))
    }
}
