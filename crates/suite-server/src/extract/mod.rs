//! Request extractors.
//!
//! - [`Json`] and [`Query`] reject with the JSON error envelope.
//! - [`AuthUser`] verifies the bearer token of authenticated routes.
//! - [`RequestMarket`] scopes catalog reads by the `country`/`city` cookies.

mod auth;
mod market;
pub mod reject;

pub use crate::extract::auth::{AuthClaims, AuthUser};
pub use crate::extract::market::{CITY_COOKIE, COUNTRY_COOKIE, RequestMarket};
pub use crate::extract::reject::{Json, Query};
