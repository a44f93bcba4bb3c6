//! Bearer token authentication.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind};
use crate::service::AuthKeys;

/// Identity token claims.
///
/// Only `sub` is interpreted: it is the uid that namespaces saved projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject (user id).
    pub sub: String,
    /// Expiration time, seconds since the epoch.
    pub exp: i64,
    /// Issued at, seconds since the epoch.
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl AuthClaims {
    /// Creates claims for `uid` expiring after `ttl`.
    pub fn new(uid: impl Into<String>, ttl: SignedDuration) -> Self {
        let now = Timestamp::now().as_second();
        Self {
            sub: uid.into(),
            exp: now.saturating_add(ttl.as_secs()),
            iat: now,
            iss: None,
            aud: None,
        }
    }

    /// Sets the `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Sets the `aud` claim.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    /// Returns the user id.
    #[inline]
    pub fn uid(&self) -> &str {
        &self.sub
    }
}

/// Authenticated caller, extracted from `Authorization: Bearer <token>`.
///
/// Any failure (missing header, malformed header, bad signature, expired
/// token, verification disabled) rejects with `401 Unauthorized`.
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthUser {
    claims: AuthClaims,
}

impl AuthUser {
    /// Returns the user id.
    #[inline]
    pub fn uid(&self) -> &str {
        self.claims.uid()
    }

    /// Returns the verified claims.
    #[inline]
    pub fn claims(&self) -> &AuthClaims {
        &self.claims
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<Self>() {
            return Ok(user.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let bearer = match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(rejection) => {
                let context = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => "missing bearer token",
                    _ => "malformed authorization header",
                };
                return Err(ErrorKind::Unauthorized.with_context(context));
            }
        };

        let keys = AuthKeys::from_ref(state);
        let claims = keys.decode(bearer.token()).map_err(|error| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %error,
                "rejected bearer token"
            );
            ErrorKind::Unauthorized.with_context(error.to_string())
        })?;

        if claims.sub.trim().is_empty() {
            return Err(ErrorKind::Unauthorized.with_context("token has no subject"));
        }

        let user = Self { claims };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
