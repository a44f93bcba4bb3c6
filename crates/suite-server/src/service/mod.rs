//! Application state, its configuration and identity keys.

mod auth;
mod config;
mod error;
mod state;

pub use crate::service::auth::{AuthConfig, AuthKeys};
pub use crate::service::config::ServiceConfig;
pub use crate::service::error::{Error, Result};
pub use crate::service::state::ServiceState;
