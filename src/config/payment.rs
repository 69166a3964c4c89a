//! Payment provider configuration and key/mode authority.
//!
//! Holds both test and live credential sets and resolves exactly the set for
//! the requested mode. A missing credential for the active mode is a hard
//! validation failure; the other mode's keys are never substituted.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Operating mode against the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Safe default when unset.
    #[default]
    Test,
    Live,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Test => "test",
            PaymentMode::Live => "live",
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment configuration (Stripe).
///
/// Secret material is wrapped in [`SecretString`], so the derived `Debug`
/// never prints key or webhook-secret values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Active operating mode; defaults to test.
    #[serde(default)]
    pub mode: PaymentMode,

    /// Secret API key for test mode (sk_test_...).
    pub test_secret_key: Option<SecretString>,

    /// Secret API key for live mode (sk_live_...).
    pub live_secret_key: Option<SecretString>,

    /// Publishable key for test mode (pk_test_...).
    pub test_publishable_key: Option<String>,

    /// Publishable key for live mode (pk_live_...).
    pub live_publishable_key: Option<String>,

    /// Webhook signing secret for test mode (whsec_...).
    pub test_webhook_secret: Option<SecretString>,

    /// Webhook signing secret for live mode (whsec_...).
    pub live_webhook_secret: Option<SecretString>,

    /// Base URL for the provider API (overridable for testing).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Provider request timeout in milliseconds.
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_provider_timeout_ms() -> u64 {
    15_000
}

impl PaymentConfig {
    /// Resolve the secret API key for exactly the requested mode.
    pub fn resolve_secret_key(&self, mode: PaymentMode) -> Result<&SecretString, ValidationError> {
        let key = match mode {
            PaymentMode::Test => self.test_secret_key.as_ref(),
            PaymentMode::Live => self.live_secret_key.as_ref(),
        };
        key.ok_or(ValidationError::MissingModeCredential(
            "secret key",
            mode.as_str(),
        ))
    }

    /// Resolve the publishable key for exactly the requested mode.
    pub fn resolve_publishable_key(&self, mode: PaymentMode) -> Result<&str, ValidationError> {
        let key = match mode {
            PaymentMode::Test => self.test_publishable_key.as_deref(),
            PaymentMode::Live => self.live_publishable_key.as_deref(),
        };
        key.ok_or(ValidationError::MissingModeCredential(
            "publishable key",
            mode.as_str(),
        ))
    }

    /// Resolve the webhook signing secret for exactly the requested mode.
    pub fn resolve_webhook_secret(
        &self,
        mode: PaymentMode,
    ) -> Result<&SecretString, ValidationError> {
        let secret = match mode {
            PaymentMode::Test => self.test_webhook_secret.as_ref(),
            PaymentMode::Live => self.live_webhook_secret.as_ref(),
        };
        secret.ok_or(ValidationError::MissingModeCredential(
            "webhook secret",
            mode.as_str(),
        ))
    }

    /// Validate that the active mode has a complete, well-formed credential set.
    ///
    /// Prefix checks catch the most common misconfiguration: a live key wired
    /// into the test slot or vice versa.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let expected_sk_prefix = match self.mode {
            PaymentMode::Test => "sk_test_",
            PaymentMode::Live => "sk_live_",
        };
        let expected_pk_prefix = match self.mode {
            PaymentMode::Test => "pk_test_",
            PaymentMode::Live => "pk_live_",
        };

        let secret_key = self.resolve_secret_key(self.mode)?;
        if !secret_key.expose_secret().starts_with("sk_") {
            return Err(ValidationError::InvalidSecretKey);
        }
        if !secret_key.expose_secret().starts_with(expected_sk_prefix) {
            return Err(ValidationError::CredentialModeMismatch(
                "secret key",
                self.mode.as_str(),
            ));
        }

        let publishable = self.resolve_publishable_key(self.mode)?;
        if !publishable.starts_with("pk_") {
            return Err(ValidationError::InvalidPublishableKey);
        }
        if !publishable.starts_with(expected_pk_prefix) {
            return Err(ValidationError::CredentialModeMismatch(
                "publishable key",
                self.mode.as_str(),
            ));
        }

        let webhook_secret = self.resolve_webhook_secret(self.mode)?;
        if !webhook_secret.expose_secret().starts_with("whsec_") {
            return Err(ValidationError::InvalidWebhookSecret);
        }

        Ok(())
    }
}
