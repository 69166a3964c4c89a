//! Session verification configuration.
//!
//! Sessions are issued by an external identity service; this subsystem only
//! verifies the tokens it receives.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration (JWT session verification).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify session tokens.
    pub jwt_secret: Option<SecretString>,

    /// Expected issuer claim, if enforced.
    pub issuer: Option<String>,

    /// Expected audience claim, if enforced.
    pub audience: Option<String>,
}

impl AuthConfig {
    /// Validate authentication configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.jwt_secret {
            None => Err(ValidationError::MissingRequired("AUTH__JWT_SECRET")),
            Some(secret) if secret.expose_secret().is_empty() => {
                Err(ValidationError::MissingJwtSecret)
            }
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_requires_secret() {
        assert!(AuthConfig::default().validate().is_err());
    }

    #[test]
    fn validation_rejects_empty_secret() {
        let config = AuthConfig {
            jwt_secret: Some(SecretString::new(String::new())),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingJwtSecret)
        ));
    }

    #[test]
    fn validation_accepts_secret() {
        let config = AuthConfig {
            jwt_secret: Some(SecretString::new("session-signing-secret".into())),
            issuer: Some("https://id.plateful.dev".to_string()),
            audience: None,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = AuthConfig {
            jwt_secret: Some(SecretString::new("session-signing-secret".into())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("session-signing-secret"));
    }
}
