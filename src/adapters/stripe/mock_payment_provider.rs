//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Idempotency-key deduplication (a repeated key returns the same intent)
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CreateIntentRequest, PaymentProvider, ProviderError, ProviderIntent,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Inject errors
/// mock.set_error(ProviderError::network("Test outage"));
///
/// // Use in tests
/// let result = mock.create_intent(request).await;
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Created intents by intent ID.
    intents: HashMap<String, ProviderIntent>,

    /// Intent IDs by idempotency key.
    intents_by_key: HashMap<String, String>,

    /// Next intent to return regardless of the request.
    next_intent: Option<ProviderIntent>,

    /// Error to return on next call.
    next_error: Option<ProviderError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, ProviderError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the intent to return on the next `create_intent` call.
    pub fn set_intent(&self, intent: ProviderIntent) {
        self.inner.lock().unwrap().next_intent = Some(intent);
    }

    /// Add an intent to the "database" for `retrieve_intent` lookups.
    pub fn add_intent(&self, intent: ProviderIntent) {
        let id = intent.id.clone();
        self.inner.lock().unwrap().intents.insert(id, intent);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: ProviderError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: ProviderError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }

    /// Number of distinct intents created so far.
    pub fn created_intent_count(&self) -> usize {
        self.inner.lock().unwrap().intents.len()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), ProviderError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<ProviderIntent, ProviderError> {
        self.record_call(
            "create_intent",
            vec![
                request.order_id.to_string(),
                request.amount_minor.to_string(),
                request.currency.clone(),
            ],
        );
        self.check_error("create_intent")?;

        let mut state = self.inner.lock().unwrap();

        // Idempotency: a repeated key returns the original intent untouched.
        if let Some(existing_id) = state.intents_by_key.get(&request.idempotency_key) {
            if let Some(existing) = state.intents.get(existing_id) {
                return Ok(existing.clone());
            }
        }

        let intent = state.next_intent.take().unwrap_or_else(|| {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            let id = format!("pi_mock_{}", &suffix[..12]);
            ProviderIntent {
                id: id.clone(),
                client_secret: format!("{}_secret_mock", id),
                status: "requires_payment_method".to_string(),
                amount_minor: request.amount_minor,
                currency: request.currency.clone(),
            }
        });

        state
            .intents_by_key
            .insert(request.idempotency_key, intent.id.clone());
        state.intents.insert(intent.id.clone(), intent.clone());

        Ok(intent)
    }

    async fn retrieve_intent(
        &self,
        intent_id: &str,
    ) -> Result<Option<ProviderIntent>, ProviderError> {
        self.record_call("retrieve_intent", vec![intent_id.to_string()]);
        self.check_error("retrieve_intent")?;

        let state = self.inner.lock().unwrap();
        Ok(state.intents.get(intent_id).cloned())
    }
}
