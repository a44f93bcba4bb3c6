//! `data:` URI parsing.
//!
//! Flows receive brochures, images and PDFs as base64 data URIs of the form
//! `data:<mime>;base64,<payload>`. Only the base64 form is accepted.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Error returned when a string is not a valid base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUriError {
    /// The string does not start with `data:`.
    #[error("data URI must start with 'data:'")]
    MissingScheme,
    /// The `;base64,` separator is missing.
    #[error("data URI must be base64 encoded (missing ';base64,')")]
    NotBase64,
    /// The media type is empty or malformed.
    #[error("data URI has an invalid media type")]
    InvalidMediaType,
    /// The payload is empty or not valid base64.
    #[error("data URI payload is not valid base64")]
    InvalidPayload,
}

/// A parsed, validated base64 data URI.
///
/// The payload is kept encoded; [`DataUri::decode`] produces the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    payload: String,
}

impl DataUri {
    /// Parses and validates a data URI.
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or(DataUriError::NotBase64)?;

        let valid_mime = mime_type
            .split_once('/')
            .is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty())
            && !mime_type.contains(char::is_whitespace);
        if !valid_mime {
            return Err(DataUriError::InvalidMediaType);
        }

        if payload.is_empty() || STANDARD.decode(payload).is_err() {
            return Err(DataUriError::InvalidPayload);
        }

        Ok(Self {
            mime_type: mime_type.to_ascii_lowercase(),
            payload: payload.to_owned(),
        })
    }

    /// Returns the lowercased media type, e.g. `application/pdf`.
    #[inline]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns true if the media type is an image type.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Returns true if the media type is `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }

    /// Returns the base64 payload without the header.
    #[inline]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns the approximate decoded size in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.payload.chars().rev().take_while(|c| *c == '=').count();
        (self.payload.len() / 4) * 3 - padding
    }

    /// Decodes the payload.
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        STANDARD
            .decode(&self.payload)
            .map_err(|_| DataUriError::InvalidPayload)
    }
}

impl FromStr for DataUri {
    type Err = DataUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pdf_uri() {
        let uri = DataUri::parse("data:application/pdf;base64,JVBERi0xLjQ=").unwrap();
        assert_eq!(uri.mime_type(), "application/pdf");
        assert!(uri.is_pdf());
        assert!(!uri.is_image());
        assert_eq!(uri.decode().unwrap(), b"%PDF-1.4");
        assert_eq!(uri.decoded_len(), 8);
    }

    #[test]
    fn parses_image_uri() {
        let uri: DataUri = "data:IMAGE/PNG;base64,iVBORw0KGgo=".parse().unwrap();
        assert_eq!(uri.mime_type(), "image/png");
        assert!(uri.is_image());
    }

    #[test]
    fn rejects_malformed_uris() {
        assert_eq!(
            DataUri::parse("https://example.com/a.png"),
            Err(DataUriError::MissingScheme)
        );
        assert_eq!(
            DataUri::parse("data:text/plain,hello"),
            Err(DataUriError::NotBase64)
        );
        assert_eq!(
            DataUri::parse("data:;base64,aGVsbG8="),
            Err(DataUriError::InvalidMediaType)
        );
        assert_eq!(
            DataUri::parse("data:image/png;base64,"),
            Err(DataUriError::InvalidPayload)
        );
        assert_eq!(
            DataUri::parse("data:image/png;base64,not base64!"),
            Err(DataUriError::InvalidPayload)
        );
    }

    #[test]
    fn display_round_trips_header() {
        let raw = "data:image/jpeg;base64,/9j/4AAQ";
        assert_eq!(DataUri::parse(raw).unwrap().to_string(), raw);
    }
}
