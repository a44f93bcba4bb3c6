//! Schema generation, validation and model response parsing.

pub mod constraint;
mod response;
mod validator;

pub use response::JsonResponse;
pub use validator::{SchemaValidator, schema_value};
