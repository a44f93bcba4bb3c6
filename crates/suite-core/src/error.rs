//! Common error type definitions.

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source error in structured error types of the other crates.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;
