//! Flow error to HTTP error conversion.

use suite_rig::{Error as FlowError, ValidationStage};

use super::http_error::{Error as HttpError, ErrorKind};

impl From<FlowError> for HttpError<'static> {
    fn from(error: FlowError) -> Self {
        match error {
            FlowError::ToolNotFound(_) => ErrorKind::NotFound.with_message(error.to_string()),

            FlowError::Validation {
                stage: ValidationStage::Input,
                violations,
            } => ErrorKind::ValidationError
                .with_message("Invalid tool payload")
                .with_context("input validation failed")
                .with_details(violations),

            // The model produced it, so the caller is not at fault.
            FlowError::Validation {
                stage: ValidationStage::Output,
                violations,
            } => ErrorKind::GenerationFailed
                .with_message("Generated output failed validation")
                .with_context("output validation failed")
                .with_details(violations),

            FlowError::GenerationFailed(message) => ErrorKind::GenerationFailed
                .with_message("Content generation failed")
                .with_context(message),

            FlowError::Provider { provider, message } => ErrorKind::UpstreamError
                .with_message("The model provider request failed")
                .with_context(format!("{provider}: {message}")),

            FlowError::Upstream { service, message } => ErrorKind::UpstreamError
                .with_message(format!("{service} request failed"))
                .with_context(message),

            FlowError::Config(message) => ErrorKind::InternalError.with_context(message),

            FlowError::Serialization(error) => {
                ErrorKind::InternalError.with_context(error.to_string())
            }
        }
    }
}
