#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for flow execution.
pub const TRACING_TARGET_FLOW: &str = "suite_rig::flow";

/// Tracing target for completion providers.
pub const TRACING_TARGET_PROVIDER: &str = "suite_rig::provider";

/// Tracing target for the tool registry.
pub const TRACING_TARGET_REGISTRY: &str = "suite_rig::registry";

mod error;
pub mod flow;
mod prompt;
pub mod provider;
mod registry;
pub mod schema;

pub use crate::error::{Error, Result, ValidationStage};
pub use crate::flow::{DynFlow, Flow, FlowContext, ToolDescriptor};
pub use crate::prompt::Prompt;
pub use crate::provider::{
    CompletionBackend, CompletionClient, CompletionProvider, ModelConfig, ModelProvider,
    ScriptedBackend,
};
pub use crate::registry::{ToolId, ToolRegistry};
