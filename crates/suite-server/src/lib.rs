#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::handler::{Error, ErrorKind, Result};

/// Tracing target for authentication.
pub const TRACING_TARGET_AUTHENTICATION: &str = "suite_server::authentication";

/// Tracing target for service construction.
pub const TRACING_TARGET_SERVICE: &str = "suite_server::service";
