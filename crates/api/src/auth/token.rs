//! HS256 access token verification and issuance.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use otelier_core::UserId;

use super::claims::RoleClaimStrategy;
use super::context::Principal;
use crate::config::JwtConfig;

/// Errors from token verification or issuance.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's `exp` is in the past.
    #[error("token expired")]
    Expired,

    /// Bad signature, wrong issuer or audience, malformed, or missing claims.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Decoded claims: the subject plus everything else for role lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID).
    pub sub: String,
    /// All remaining claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Verifies bearer tokens against the configured secret and issuer.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    roles: Arc<dyn RoleClaimStrategy>,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("key", &"[REDACTED]")
            .field("issuer", &self.validation.iss)
            .field("roles", &self.roles)
            .finish()
    }
}

impl JwtVerifier {
    /// Create a verifier from configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iss"]);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key,
            validation,
            roles: config.role_claim.strategy(),
        }
    }

    /// Verify a token and resolve the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] for expired tokens and
    /// [`TokenError::Invalid`] for everything else that fails validation,
    /// including a blank `sub`.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        let user_id = UserId::parse(&claims.sub)
            .ok_or_else(|| TokenError::Invalid("blank sub claim".to_string()))?;
        let role = self.roles.resolve(&claims.extra);

        Ok(Principal::new(user_id, role))
    }
}

/// Mints tokens the [`JwtVerifier`] accepts.
///
/// Production tokens come from the identity provider; this is for local
/// development and tests.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    issuer: String,
    audience: Option<String>,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Issue a token for `sub` with a flat `role` claim, valid for `ttl_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if encoding fails.
    pub fn issue(&self, sub: &str, role: Option<&str>, ttl_secs: i64) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let mut extra = Map::new();
        extra.insert("iss".to_string(), Value::from(self.issuer.clone()));
        extra.insert("iat".to_string(), Value::from(now));
        extra.insert("exp".to_string(), Value::from(now + ttl_secs));
        if let Some(audience) = &self.audience {
            extra.insert("aud".to_string(), Value::from(audience.clone()));
        }
        if let Some(role) = role {
            extra.insert("role".to_string(), Value::from(role));
        }

        self.issue_claims(&TokenClaims {
            sub: sub.to_string(),
            extra,
        })
    }

    /// Issue a token with arbitrary claims. Registered claims are not added.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if encoding fails.
    pub fn issue_claims(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.key)
            .map_err(|e| TokenError::Invalid(format!("JWT encode: {e}")))
    }
}
