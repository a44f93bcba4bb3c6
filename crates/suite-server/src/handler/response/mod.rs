//! Response types for HTTP handlers.
//!
//! Every helper route answers with `ok: true` next to its own fields; the
//! tool run route returns the bare tool output.

mod catalog;
mod error_response;
mod monitors;
mod publish;
mod tools;
mod user_projects;

pub use catalog::*;
pub use error_response::ErrorResponse;
pub use monitors::*;
pub use publish::*;
pub use tools::*;
pub use user_projects::*;
