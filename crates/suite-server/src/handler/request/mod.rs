//! Request types for HTTP handlers.

mod catalog;
mod publish;
mod tools;
mod user_projects;

pub use catalog::*;
pub use publish::*;
pub use tools::*;
pub use user_projects::*;
