//! Publish error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};

impl From<suite_publish::Error> for HttpError<'static> {
    fn from(error: suite_publish::Error) -> Self {
        let message = match error.target() {
            Some(target) => format!("{target} request failed"),
            None => "Publish request failed".to_owned(),
        };

        ErrorKind::UpstreamError
            .with_message(message)
            .with_context(error.to_string())
    }
}
