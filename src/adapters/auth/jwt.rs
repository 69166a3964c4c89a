//! HMAC JWT adapter for session validation.
//!
//! Sessions are issued by an external identity service that shares an HMAC
//! signing secret with this process. This adapter implements the
//! `SessionValidator` port by:
//!
//! 1. Verifying the HS256 signature against the shared secret
//! 2. Validating issuer and audience claims when they are configured
//! 3. Validating expiry
//! 4. Mapping the subject claim to a domain `CustomerId`
//!
//! # Example
//!
//! ```ignore
//! use plateful::adapters::auth::JwtSessionValidator;
//! use plateful::ports::SessionValidator;
//!
//! let validator = JwtSessionValidator::new(&config.auth)?;
//! let customer = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedCustomer, CustomerId};
use crate::ports::SessionValidator;

/// Claims carried by session tokens.
#[derive(Debug, Deserialize)]
struct SessionClaims {
    /// Subject, the customer's UUID.
    sub: String,

    /// Expiry timestamp (Unix epoch seconds). Present for jsonwebtoken's
    /// expiry validation; read via the `Validation` settings.
    #[allow(dead_code)]
    exp: i64,

    /// Customer's email, when the issuer includes it.
    #[serde(default)]
    email: Option<String>,
}

/// Validates externally-issued HS256 session tokens.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    /// Build a validator from auth configuration.
    ///
    /// Fails when the shared signing secret is missing; session verification
    /// must never run unsigned.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let secret = config.jwt_secret.as_ref().ok_or_else(|| {
            AuthError::ServiceUnavailable("session signing secret not configured".to_string())
        })?;
        let decoding_key = DecodingKey::from_secret(secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            // jsonwebtoken rejects tokens carrying an aud claim unless one is
            // expected; we accept them when no audience is enforced.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedCustomer, AuthError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("session token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer => {
                        tracing::warn!("invalid issuer in session token");
                        AuthError::InvalidToken
                    }
                    ErrorKind::InvalidAudience => {
                        tracing::warn!("invalid audience in session token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::warn!("session token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?;
        let claims = token_data.claims;

        let customer_id: CustomerId = claims.sub.parse().map_err(|_| {
            tracing::warn!("session token subject is not a customer id");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedCustomer::new(customer_id, claims.email))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use secrecy::SecretString;
    use serde::Serialize;

    const SECRET: &str = "test-signing-secret";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        iss: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        aud: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: Some(SecretString::new(SECRET.into())),
            issuer: None,
            audience: None,
        }
    }

    fn sign(claims: &TestClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> TestClaims {
        TestClaims {
            sub: CustomerId::new().to_string(),
            exp: chrono::Utc::now().timestamp() + 3600,
            iss: None,
            aud: None,
            email: Some("diner@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let validator = JwtSessionValidator::new(&config()).unwrap();
        let claims = valid_claims();
        let token = sign(&claims, SECRET);

        let customer = validator.validate(&token).await.unwrap();

        assert_eq!(customer.id.to_string(), claims.sub);
        assert_eq!(customer.email.as_deref(), Some("diner@example.com"));
    }

    #[tokio::test]
    async fn rejects_wrong_signature() {
        let validator = JwtSessionValidator::new(&config()).unwrap();
        let token = sign(&valid_claims(), "some-other-secret");

        let result = validator.validate(&token).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let validator = JwtSessionValidator::new(&config()).unwrap();
        let claims = TestClaims {
            exp: chrono::Utc::now().timestamp() - 3600,
            ..valid_claims()
        };
        let token = sign(&claims, SECRET);

        let result = validator.validate(&token).await;

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn rejects_non_uuid_subject() {
        let validator = JwtSessionValidator::new(&config()).unwrap();
        let claims = TestClaims {
            sub: "customer-42".to_string(),
            ..valid_claims()
        };
        let token = sign(&claims, SECRET);

        let result = validator.validate(&token).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn enforces_issuer_when_configured() {
        let validator = JwtSessionValidator::new(&AuthConfig {
            issuer: Some("https://id.plateful.dev".to_string()),
            ..config()
        })
        .unwrap();

        let good = TestClaims {
            iss: Some("https://id.plateful.dev".to_string()),
            ..valid_claims()
        };
        assert!(validator.validate(&sign(&good, SECRET)).await.is_ok());

        let bad = TestClaims {
            iss: Some("https://evil.example.com".to_string()),
            ..valid_claims()
        };
        assert!(matches!(
            validator.validate(&sign(&bad, SECRET)).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn enforces_audience_when_configured() {
        let validator = JwtSessionValidator::new(&AuthConfig {
            audience: Some("plateful-api".to_string()),
            ..config()
        })
        .unwrap();

        let bad = TestClaims {
            aud: Some("other-api".to_string()),
            ..valid_claims()
        };
        assert!(matches!(
            validator.validate(&sign(&bad, SECRET)).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn construction_fails_without_secret() {
        let result = JwtSessionValidator::new(&AuthConfig::default());
        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
    }

    #[test]
    fn validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JwtSessionValidator>();
    }
}
