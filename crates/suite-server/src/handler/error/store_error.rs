//! Document store error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};

impl From<suite_store::Error> for HttpError<'static> {
    fn from(error: suite_store::Error) -> Self {
        match error {
            suite_store::Error::InvalidPath(path) => ErrorKind::BadRequest
                .with_message("Invalid document identifier")
                .with_context(path),

            suite_store::Error::Connection(_) | suite_store::Error::Backend { .. } => {
                ErrorKind::InternalError
                    .with_message("Database request failed")
                    .with_context(error.to_string())
            }

            _ => ErrorKind::InternalError.with_context(error.to_string()),
        }
    }
}
