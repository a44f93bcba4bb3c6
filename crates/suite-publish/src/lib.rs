#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for publish operations.
pub const TRACING_TARGET: &str = "suite_publish";

mod config;
mod error;
mod http;
mod outcome;
mod service;

pub use crate::config::PublishConfig;
pub use crate::error::{Error, Result};
pub use crate::http::HttpPublisher;
pub use crate::outcome::{PublishOutcome, PublishStatus, PublishTarget};
pub use crate::service::{PublishService, Publisher};
