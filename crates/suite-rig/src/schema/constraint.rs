//! Field constraints shared by flow inputs and outputs.
//!
//! Each function follows the `validator` custom-function signature.

use std::borrow::Cow;

use suite_core::DataUri;
use url::Url;
use validator::ValidationError;

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// A `data:<mime>;base64,<payload>` URI with a decodable payload.
pub fn data_uri(value: &str) -> Result<(), ValidationError> {
    DataUri::parse(value)
        .map(|_| ())
        .map_err(|e| invalid("data_uri", format!("invalid data URI: {e}")))
}

/// Every element is a valid data URI.
pub fn data_uris(values: &[String]) -> Result<(), ValidationError> {
    values.iter().enumerate().try_for_each(|(index, value)| {
        DataUri::parse(value)
            .map(|_| ())
            .map_err(|e| invalid("data_uri", format!("item {index} is not a valid data URI: {e}")))
    })
}

/// A data URI carrying an `application/pdf` document.
pub fn pdf_data_uri(value: &str) -> Result<(), ValidationError> {
    let uri = DataUri::parse(value)
        .map_err(|e| invalid("pdf_data_uri", format!("invalid data URI: {e}")))?;
    if uri.is_pdf() {
        Ok(())
    } else {
        Err(invalid(
            "pdf_data_uri",
            format!("expected application/pdf, got {}", uri.mime_type()),
        ))
    }
}

/// Every element is an absolute http(s) URL.
pub fn http_urls(values: &[String]) -> Result<(), ValidationError> {
    values.iter().enumerate().try_for_each(|(index, value)| {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(invalid("url", format!("item {index} is not an http(s) URL"))),
        }
    })
}

/// A strictly positive, finite number.
pub fn positive(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid("positive", format!("must be greater than 0, got {value}")))
    }
}
