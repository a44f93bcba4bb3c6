//! Completion providers.

mod backend;
mod completion;
mod config;
mod scripted;

pub use backend::{CompletionBackend, CompletionClient};
pub use completion::CompletionProvider;
pub use config::{ModelConfig, ModelProvider};
pub use scripted::ScriptedBackend;
