#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for store backends.
pub const TRACING_TARGET_STORE: &str = "suite_store::store";

/// Tracing target for repository operations.
pub const TRACING_TARGET_REPOSITORY: &str = "suite_store::repository";

mod catalog;
mod client;
mod config;
mod document;
mod error;
mod firestore;
mod memory;
mod user_project;

pub use crate::catalog::{
    CATALOG_COLLECTION, CatalogEntry, CatalogQuery, CatalogRepository, catalog_id, slugify,
};
pub use crate::client::{DocumentStore, StoreClient};
pub use crate::config::{StoreBackend, StoreConfig};
pub use crate::document::{Document, Fields, merge_fields};
pub use crate::error::{Error, Result};
pub use crate::firestore::{FirestoreConfig, FirestoreStore};
pub use crate::memory::MemoryStore;
pub use crate::user_project::{UserProject, UserProjectRepository, user_projects_collection};
