//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod publish_error;
mod rig_error;
mod scraper_error;
mod store_error;

pub use http_error::{Error, ErrorKind, Result};
