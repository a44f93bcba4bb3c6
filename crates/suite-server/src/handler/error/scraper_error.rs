//! Scraper error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};

impl From<suite_scraper::Error> for HttpError<'static> {
    fn from(error: suite_scraper::Error) -> Self {
        match error {
            suite_scraper::Error::UnknownSource(ref source) => ErrorKind::BadRequest
                .with_message(format!("Unknown scrape source '{source}'"))
                .with_details(["dxboffplan", "propertyfinder"].as_slice()),

            suite_scraper::Error::Connection(_) | suite_scraper::Error::Status { .. } => {
                ErrorKind::UpstreamError
                    .with_message("Failed to fetch the listing page")
                    .with_context(error.to_string())
            }

            suite_scraper::Error::Store(error) => error.into(),

            suite_scraper::Error::Selector { .. } => {
                ErrorKind::InternalError.with_context(error.to_string())
            }
        }
    }
}
