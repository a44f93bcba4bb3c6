//! Request extractors that reject with the JSON error envelope.

pub mod json;
pub mod query;

pub use self::json::Json;
pub use self::query::Query;
