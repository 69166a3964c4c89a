//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration, including:
//! - Payment intent creation with idempotency keys
//! - Intent retrieval for reuse checks
//! - Startup bootstrap of the provider runtime
//!
//! # Security
//!
//! - The secret API key is handled via `secrecy::SecretString` and sent only
//!   as HTTP basic auth to the provider
//! - Credentials are resolved per mode at bootstrap and never fall back to
//!   the other mode's keys
//!
//! # Configuration
//!
//! Required environment variables (test mode):
//! - `PLATEFUL__PAYMENT__TEST_SECRET_KEY`: secret API key (sk_test_...)
//! - `PLATEFUL__PAYMENT__TEST_PUBLISHABLE_KEY`: publishable key (pk_test_...)
//! - `PLATEFUL__PAYMENT__TEST_WEBHOOK_SECRET`: webhook signing secret (whsec_...)

mod bootstrap;
mod mock_payment_provider;
mod stripe_adapter;
mod wire_types;

pub use bootstrap::{bootstrap_provider, BootstrapError, ProviderRuntime};
pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::StripePaymentAdapter;
pub use wire_types::{StripeApiError, StripeErrorResponse, StripePaymentIntent};
