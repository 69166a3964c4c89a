//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Session JWT secret must not be empty")]
    MissingJwtSecret,

    #[error("No {0} credential configured for {1} mode")]
    MissingModeCredential(&'static str, &'static str),

    #[error("Provider {0} credential does not match {1} mode")]
    CredentialModeMismatch(&'static str, &'static str),

    #[error("Invalid provider secret key format")]
    InvalidSecretKey,

    #[error("Invalid provider publishable key format")]
    InvalidPublishableKey,

    #[error("Invalid provider webhook secret format")]
    InvalidWebhookSecret,
}
