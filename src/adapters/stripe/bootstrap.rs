//! Provider bootstrap: credentials, HTTP client, webhook verifier.
//!
//! Everything the payment surface needs from the provider is assembled here
//! once at startup and handed to the router as a [`ProviderRuntime`]. There is
//! no ambient global client; if bootstrap fails the runtime slot stays empty
//! and payment endpoints answer 503 until the process is restarted with a
//! working configuration.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::config::{PaymentConfig, PaymentMode, ValidationError};
use crate::domain::payment::WebhookVerifier;
use crate::ports::PaymentProvider;

use super::stripe_adapter::StripePaymentAdapter;

/// Fully assembled provider state for the active mode.
///
/// Built once by [`bootstrap_provider`]; the HTTP handlers share it behind an
/// `Arc`.
pub struct ProviderRuntime {
    /// The live provider client.
    pub provider: Arc<dyn PaymentProvider>,

    /// Publishable key for the active mode, returned to browsers alongside
    /// client secrets.
    pub publishable_key: String,

    /// Verifier bound to the active mode's webhook signing secret.
    pub verifier: WebhookVerifier,

    /// Mode the runtime was assembled for.
    pub mode: PaymentMode,
}

/// Why provider bootstrap failed.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The active mode's credential set is incomplete or malformed.
    #[error("payment credentials invalid: {0}")]
    Credentials(#[from] ValidationError),

    /// Every client build strategy failed.
    #[error("no HTTP client could be built for the payment provider")]
    NoHttpClient,
}

/// One way of building the provider's HTTP client.
///
/// Strategies are tried in declaration order; the first that builds wins.
/// Keeping them in a plain slice makes the fallback order inspectable instead
/// of buried in nested `or_else` chains.
struct ClientStrategy {
    name: &'static str,
    build: fn(Duration) -> Result<reqwest::Client, reqwest::Error>,
}

const CLIENT_STRATEGIES: &[ClientStrategy] = &[
    ClientStrategy {
        name: "rustls",
        build: build_rustls_client,
    },
    ClientStrategy {
        name: "native-tls",
        build: build_native_tls_client,
    },
    ClientStrategy {
        name: "default",
        build: build_default_client,
    },
];

fn build_rustls_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .build()
}

fn build_native_tls_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .use_native_tls()
        .timeout(timeout)
        .build()
}

fn build_default_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Build the provider HTTP client, trying each strategy in order.
fn build_http_client(timeout: Duration) -> Result<reqwest::Client, BootstrapError> {
    for strategy in CLIENT_STRATEGIES {
        match (strategy.build)(timeout) {
            Ok(client) => {
                tracing::info!(tls_backend = strategy.name, "payment HTTP client ready");
                return Ok(client);
            }
            Err(error) => {
                tracing::warn!(
                    tls_backend = strategy.name,
                    %error,
                    "client build strategy failed, trying next"
                );
            }
        }
    }
    Err(BootstrapError::NoHttpClient)
}

/// Assemble the provider runtime for the configured mode.
///
/// Fails closed: a missing or malformed credential for the active mode is an
/// error here, never a silent fallback to the other mode's keys.
pub fn bootstrap_provider(config: &PaymentConfig) -> Result<ProviderRuntime, BootstrapError> {
    config.validate()?;

    let mode = config.mode;
    let secret_key: SecretString = config.resolve_secret_key(mode)?.clone();
    let publishable_key = config.resolve_publishable_key(mode)?.to_string();
    let webhook_secret = config.resolve_webhook_secret(mode)?.clone();

    let timeout = Duration::from_millis(config.provider_timeout_ms);
    let http_client = build_http_client(timeout)?;

    let adapter =
        StripePaymentAdapter::new(secret_key, config.api_base_url.clone(), http_client);
    let verifier = WebhookVerifier::new(webhook_secret, mode == PaymentMode::Live);

    tracing::info!(mode = %mode, api_base_url = %config.api_base_url, "payment provider ready");

    Ok(ProviderRuntime {
        provider: Arc::new(adapter),
        publishable_key,
        verifier,
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PaymentConfig {
        PaymentConfig {
            mode: PaymentMode::Test,
            test_secret_key: Some(SecretString::new("sk_test_bootstrap".into())),
            test_publishable_key: Some("pk_test_bootstrap".to_string()),
            test_webhook_secret: Some(SecretString::new("whsec_bootstrap".into())),
            ..Default::default()
        }
    }

    #[test]
    fn strategies_are_ordered_rustls_first() {
        let names: Vec<&str> = CLIENT_STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["rustls", "native-tls", "default"]);
    }

    #[test]
    fn bootstrap_succeeds_with_complete_test_credentials() {
        let runtime = bootstrap_provider(&valid_config()).unwrap();
        assert_eq!(runtime.mode, PaymentMode::Test);
        assert_eq!(runtime.publishable_key, "pk_test_bootstrap");
        assert_eq!(runtime.provider.name(), "stripe");
    }

    #[test]
    fn bootstrap_fails_closed_on_missing_credentials() {
        let config = PaymentConfig {
            mode: PaymentMode::Live,
            ..valid_config()
        };
        let result = bootstrap_provider(&config);
        assert!(matches!(result, Err(BootstrapError::Credentials(_))));
    }

    #[test]
    fn bootstrap_fails_closed_on_mode_prefix_mismatch() {
        let config = PaymentConfig {
            test_secret_key: Some(SecretString::new("sk_live_wrong_slot".into())),
            ..valid_config()
        };
        assert!(bootstrap_provider(&config).is_err());
    }
}
