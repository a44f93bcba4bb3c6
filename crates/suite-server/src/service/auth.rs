//! Verification material for bearer tokens.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::Args;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::extract::AuthClaims;
use crate::service::{Error, Result};

/// Identity token configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct AuthConfig {
    /// Shared HS256 secret used to verify identity tokens.
    ///
    /// Without it every authenticated route answers 401.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AUTH_JWT_SECRET", hide_env_values = true)
    )]
    pub auth_jwt_secret: Option<String>,

    /// Expected `iss` claim.
    #[cfg_attr(feature = "config", arg(long, env = "AUTH_JWT_ISSUER"))]
    pub auth_jwt_issuer: Option<String>,

    /// Expected `aud` claim.
    #[cfg_attr(feature = "config", arg(long, env = "AUTH_JWT_AUDIENCE"))]
    pub auth_jwt_audience: Option<String>,
}

impl AuthConfig {
    /// Creates a configuration with the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            auth_jwt_secret: Some(secret.into()),
            ..Self::default()
        }
    }
}

/// Keys used to verify (and, for tooling and tests, sign) identity tokens.
#[derive(Clone)]
pub struct AuthKeys {
    inner: Option<Arc<AuthKeysInner>>,
}

struct AuthKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl AuthKeys {
    /// Loads the keys described by `config`.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let Some(secret) = config.auth_jwt_secret.as_deref() else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                "no identity secret configured, authenticated routes are disabled"
            );
            return Ok(Self { inner: None });
        };

        if secret.trim().is_empty() {
            return Err(Error::config("AUTH_JWT_SECRET must not be empty"));
        }

        // Configured `aud`/`iss` must be present in the token, not only match when present.
        let mut required = vec!["exp"];
        let mut validation = Validation::new(Algorithm::HS256);
        match &config.auth_jwt_audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &config.auth_jwt_issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        validation.set_required_spec_claims(required.as_slice());

        tracing::info!(
            target: TRACING_TARGET_AUTHENTICATION,
            issuer = config.auth_jwt_issuer.as_deref(),
            audience = config.auth_jwt_audience.as_deref(),
            "identity keys loaded"
        );

        Ok(Self {
            inner: Some(Arc::new(AuthKeysInner {
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
                validation,
            })),
        })
    }

    /// Returns true if tokens can be verified.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Verifies `token` and returns its claims.
    pub fn decode(&self, token: &str) -> Result<AuthClaims> {
        let inner = self.inner.as_ref().ok_or(Error::AuthDisabled)?;
        let data = jsonwebtoken::decode::<AuthClaims>(token, &inner.decoding_key, &inner.validation)?;
        Ok(data.claims)
    }

    /// Signs `claims` into a compact token.
    pub fn encode(&self, claims: &AuthClaims) -> Result<String> {
        let inner = self.inner.as_ref().ok_or(Error::AuthDisabled)?;
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &inner.encoding_key)?;
        Ok(token)
    }
}

impl fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthKeys")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}
