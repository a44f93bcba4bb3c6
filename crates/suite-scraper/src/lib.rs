#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for scraper operations.
pub const TRACING_TARGET: &str = "suite_scraper";

mod config;
mod error;
mod parse;
mod service;
mod source;

pub use crate::config::ScraperConfig;
pub use crate::error::{Error, Result};
pub use crate::parse::{ParsedPage, parse_listing_page};
pub use crate::service::{ScrapeReport, Scraper};
pub use crate::source::{ScrapeSource, SourceProfile};
