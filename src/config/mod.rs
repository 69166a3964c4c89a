//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is loaded
//! with the `PLATEFUL` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use plateful::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::{PaymentConfig, PaymentMode};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Session verification configuration
    pub auth: AuthConfig,

    /// Payment provider configuration (mode + per-mode credentials)
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PLATEFUL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PLATEFUL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PLATEFUL__PAYMENT__MODE=live` -> `payment.mode = live`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLATEFUL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    /// Check if running in production environment.
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var(
            "PLATEFUL__DATABASE__URL",
            "postgresql://test@localhost/plateful",
        );
        env::set_var("PLATEFUL__AUTH__JWT_SECRET", "test-signing-secret");
        env::set_var("PLATEFUL__PAYMENT__TEST_SECRET_KEY", "sk_test_xxx");
        env::set_var("PLATEFUL__PAYMENT__TEST_PUBLISHABLE_KEY", "pk_test_xxx");
        env::set_var("PLATEFUL__PAYMENT__TEST_WEBHOOK_SECRET", "whsec_xxx");
    }

    fn clear_env() {
        env::remove_var("PLATEFUL__DATABASE__URL");
        env::remove_var("PLATEFUL__AUTH__JWT_SECRET");
        env::remove_var("PLATEFUL__PAYMENT__MODE");
        env::remove_var("PLATEFUL__PAYMENT__TEST_SECRET_KEY");
        env::remove_var("PLATEFUL__PAYMENT__TEST_PUBLISHABLE_KEY");
        env::remove_var("PLATEFUL__PAYMENT__TEST_WEBHOOK_SECRET");
        env::remove_var("PLATEFUL__SERVER__PORT");
        env::remove_var("PLATEFUL__SERVER__ENVIRONMENT");
    }

    #[test]
    fn load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/plateful");
        assert_eq!(config.payment.mode, PaymentMode::Test);
    }

    #[test]
    fn validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn live_mode_without_live_keys_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLATEFUL__PAYMENT__MODE", "live");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.payment.mode, PaymentMode::Live);
        assert!(config.validate().is_err());
    }

    #[test]
    fn server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLATEFUL__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
