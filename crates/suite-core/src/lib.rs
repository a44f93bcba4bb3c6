#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for retry attempts.
pub const TRACING_TARGET_RETRY: &str = "suite_core::retry";

mod data_uri;
mod error;
mod market;
mod retry;

pub use crate::data_uri::{DataUri, DataUriError};
pub use crate::error::BoxedError;
pub use crate::market::Market;
pub use crate::retry::{RetryConfig, RetryPolicy, Retryable};
