//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::handler::response::ErrorResponse;

/// Tracing target for rendered errors.
const TRACING_TARGET: &str = "suite_server::handler::error";

/// The error type for HTTP handlers in the server.
///
/// The message is what the client sees in `error`; the context is logged
/// server-side and never serialized.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    details: Option<Value>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            details: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches server-side context to the error.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Replaces the default client-facing message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Attaches structured details, e.g. the list of schema violations.
    #[inline]
    pub fn with_details(self, details: impl Into<Value>) -> Self {
        Self {
            details: Some(details.into()),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the details if present.
    #[inline]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Converts this error into a static version by cloning all borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            details: self.details,
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &response.name)
            .field("status", &response.status);

        if let Some(ref message) = self.message {
            debug_struct.field("message", message);
        }

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref details) = self.details {
            debug_struct.field("details", details);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or(response.error.as_ref());

        write!(f, "{} ({}): {}", response.name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let mut response = self.kind.response();

        if response.status.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET,
                kind = %self.kind,
                message = self.message.as_deref(),
                context = self.context.as_deref(),
                "request failed"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                kind = %self.kind,
                message = self.message.as_deref(),
                context = self.context.as_deref(),
                "request rejected"
            );
        }

        if let Some(message) = self.message {
            response = response.with_error(message);
        }

        if let Some(details) = self.details {
            response = response.with_details(details);
        }

        response.into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Every failure class a route can report.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 - The payload violates the input schema.
    ValidationError,
    /// 400 - A required parameter is missing or malformed.
    BadRequest,
    /// 401 - Missing or invalid bearer token.
    Unauthorized,
    /// 404 - Unknown tool or route.
    NotFound,

    // 5xx Server Errors
    /// 500 - A third-party collaborator failed.
    UpstreamError,
    /// 500 - The model produced nothing usable.
    GenerationFailed,
    /// 500 - Anything else.
    #[default]
    InternalError,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the default response of this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::ValidationError => ErrorResponse::VALIDATION_ERROR,
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::Unauthorized => ErrorResponse::UNAUTHORIZED,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::UpstreamError => ErrorResponse::UPSTREAM_ERROR,
            Self::GenerationFailed => ErrorResponse::GENERATION_FAILED,
            Self::InternalError => ErrorResponse::INTERNAL_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalError);
        assert_eq!(error.kind().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let _ = error.into_response();
    }

    #[test]
    fn error_from_kind() {
        let error = Error::from(ErrorKind::NotFound);
        assert_eq!(error.kind(), ErrorKind::NotFound);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_builder_chaining() {
        let error = ErrorKind::ValidationError
            .with_message("input validation failed")
            .with_context("tool: ad-creator")
            .with_details(json!(["/projectName: required"]));

        assert_eq!(error.kind(), ErrorKind::ValidationError);
        assert_eq!(error.message(), Some("input validation failed"));
        assert_eq!(error.context(), Some("tool: ad-creator"));
        assert_eq!(error.details(), Some(&json!(["/projectName: required"])));
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ErrorKind::ValidationError.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        for kind in [
            ErrorKind::UpstreamError,
            ErrorKind::GenerationFailed,
            ErrorKind::InternalError,
        ] {
            assert_eq!(kind.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn std_fmt_display() {
        let error = ErrorKind::NotFound
            .with_message("Tool with id \"x\" not found.")
            .with_context("registry lookup");

        let display = format!("{}", error);
        assert!(display.contains("not_found"));
        assert!(display.contains("404"));
        assert!(display.contains("Tool with id"));
        assert!(display.contains("registry lookup"));
    }

    #[test]
    fn error_into_static() {
        let message = String::from("temporary");
        let error = ErrorKind::BadRequest.with_message(message.as_str());
        let static_error = error.into_static();
        assert_eq!(static_error.message(), Some("temporary"));
    }
}
