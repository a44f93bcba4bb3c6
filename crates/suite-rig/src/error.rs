//! Error types for suite-rig.

use std::fmt;

use strum::Display;
use suite_core::Retryable;

/// Result type alias for flow operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which side of a flow failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValidationStage {
    Input,
    Output,
}

/// Errors raised while resolving or running a flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No flow is registered under the requested id.
    #[error("Tool with id \"{0}\" not found.")]
    ToolNotFound(String),

    /// The payload or the produced output violates its schema.
    #[error("{stage} validation failed")]
    Validation {
        stage: ValidationStage,
        violations: Vec<String>,
    },

    /// The model returned nothing usable.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// The completion provider call failed.
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// A third-party collaborator other than the model failed.
    #[error("upstream error: {service}: {message}")]
    Upstream { service: String, message: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a validation error.
    pub fn validation(stage: ValidationStage, violations: Vec<String>) -> Self {
        Self::Validation { stage, violations }
    }

    /// Creates a generation error.
    pub fn generation(message: impl fmt::Display) -> Self {
        Self::GenerationFailed(message.to_string())
    }

    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an upstream error.
    pub fn upstream(service: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Upstream {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Returns the violations of a validation error.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            Self::Validation { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

impl Retryable for Error {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

impl From<suite_publish::Error> for Error {
    fn from(error: suite_publish::Error) -> Self {
        let service = error
            .target()
            .map_or_else(|| "publish".to_owned(), |target| target.to_string());
        Self::upstream(service, error)
    }
}
