use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

/// Failure envelope: `{ "ok": false, "error": ..., "details": ... }`.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Always `false`.
    pub ok: bool,
    /// Human-readable message safe for client display.
    pub error: Cow<'a, str>,
    /// Structured details, e.g. schema violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Error kind identifier, used for logs only.
    #[serde(skip)]
    pub name: Cow<'a, str>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self =
        Self::new("bad_request", "Bad request", StatusCode::BAD_REQUEST);
    pub const NOT_FOUND: Self = Self::new("not_found", "Not found", StatusCode::NOT_FOUND);
    pub const UNAUTHORIZED: Self =
        Self::new("unauthorized", "Unauthorized", StatusCode::UNAUTHORIZED);
    pub const VALIDATION_ERROR: Self = Self::new(
        "validation_error",
        "Validation failed",
        StatusCode::BAD_REQUEST,
    );

    // 5xx Server Errors
    pub const GENERATION_FAILED: Self = Self::new(
        "generation_failed",
        "Content generation failed",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const INTERNAL_ERROR: Self = Self::new(
        "internal_error",
        "Internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const UPSTREAM_ERROR: Self = Self::new(
        "upstream_error",
        "An upstream service failed",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, error: &'a str, status: StatusCode) -> Self {
        Self {
            ok: false,
            error: Cow::Borrowed(error),
            details: None,
            name: Cow::Borrowed(name),
            status,
        }
    }

    /// Replaces the client-facing message.
    pub fn with_error(mut self, error: impl Into<Cow<'a, str>>) -> Self {
        self.error = error.into();
        self
    }

    /// Attaches structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_envelope_only() -> anyhow::Result<()> {
        let value = serde_json::to_value(ErrorResponse::UNAUTHORIZED)?;
        assert_eq!(value, json!({ "ok": false, "error": "Unauthorized" }));

        let value = serde_json::to_value(
            ErrorResponse::VALIDATION_ERROR.with_details(json!(["/topic: required"])),
        )?;
        assert_eq!(value["details"], json!(["/topic: required"]));
        Ok(())
    }
}
