//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against Stripe's payment-intents
//! API. The secret key is resolved for exactly one mode before this adapter
//! is constructed; nothing here ever falls back to another mode's
//! credentials.
//!
//! # Security
//!
//! - API keys are held in `secrecy::SecretString` and never logged
//! - Every create call carries an Idempotency-Key header so a retried HTTP
//!   request cannot mint a second remote intent

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CreateIntentRequest, PaymentProvider, ProviderError, ProviderErrorCode, ProviderIntent,
};

use super::wire_types::{StripeErrorResponse, StripePaymentIntent};

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    secret_key: SecretString,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new adapter with an already-built HTTP client.
    ///
    /// The client comes from the bootstrap chain so TLS backend selection
    /// happens once at startup, not per request.
    pub fn new(
        secret_key: SecretString,
        api_base_url: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            secret_key,
            api_base_url: api_base_url.into(),
            http_client,
        }
    }

    fn intent_from_wire(intent: StripePaymentIntent) -> ProviderIntent {
        ProviderIntent {
            id: intent.id,
            client_secret: intent.client_secret.unwrap_or_default(),
            status: intent.status,
            amount_minor: intent.amount,
            currency: intent.currency,
        }
    }

    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let (code, provider_code, message) = match serde_json::from_str::<StripeErrorResponse>(&body)
        {
            Ok(parsed) => {
                let code = match status.as_u16() {
                    401 => ProviderErrorCode::AuthenticationError,
                    429 => ProviderErrorCode::RateLimitExceeded,
                    400 | 402 | 404 => ProviderErrorCode::InvalidRequest,
                    _ => ProviderErrorCode::ApiError,
                };
                (
                    code,
                    parsed.error.code,
                    parsed
                        .error
                        .message
                        .unwrap_or_else(|| format!("Stripe API error ({})", status)),
                )
            }
            Err(_) => (
                ProviderErrorCode::ApiError,
                None,
                format!("Stripe API error ({})", status),
            ),
        };

        tracing::error!(
            status = %status,
            provider_code = provider_code.as_deref().unwrap_or("none"),
            "Stripe request failed"
        );

        let mut err = ProviderError::new(code, message);
        if let Some(pc) = provider_code {
            err = err.with_provider_code(pc);
        }
        err
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<ProviderIntent, ProviderError> {
        let url = format!("{}/v1/payment_intents", self.api_base_url);

        let params = [
            ("amount", request.amount_minor.to_string()),
            ("currency", request.currency.clone()),
            ("metadata[order_id]", request.order_id.to_string()),
            ("metadata[customer_id]", request.customer_id.to_string()),
            (
                "metadata[checkout_attempt_key]",
                request.idempotency_key.clone(),
            ),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.secret_key.expose_secret(), Option::<&str>::None)
            .header("Idempotency-Key", &request.idempotency_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            ProviderError::api(format!("Failed to parse Stripe response: {}", e))
        })?;

        tracing::info!(
            intent_id = %intent.id,
            order_id = %request.order_id,
            amount_minor = request.amount_minor,
            currency = %request.currency,
            "Created payment intent"
        );

        Ok(Self::intent_from_wire(intent))
    }

    async fn retrieve_intent(
        &self,
        intent_id: &str,
    ) -> Result<Option<ProviderIntent>, ProviderError> {
        let url = format!("{}/v1/payment_intents/{}", self.api_base_url, intent_id);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.secret_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            ProviderError::api(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(Some(Self::intent_from_wire(intent)))
    }
}
