//! Completion backend abstraction.

use std::fmt;
use std::sync::Arc;

use derive_more::Deref;

use crate::Result;
use crate::prompt::Prompt;

/// Something that turns a preamble and a prompt into raw completion text.
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync + 'static {
    /// Returns the provider name, e.g. `openai`.
    fn provider_name(&self) -> &str;

    /// Returns the model name.
    fn model_name(&self) -> &str;

    /// Sends one completion request and returns the assistant text.
    ///
    /// Attachments of `prompt` are sent alongside its text as separate parts.
    async fn complete(&self, preamble: &str, prompt: &Prompt) -> Result<String>;
}

/// Cheaply cloneable handle to a [`CompletionBackend`].
#[derive(Clone, Deref)]
pub struct CompletionClient(Arc<dyn CompletionBackend>);

impl CompletionClient {
    /// Wraps `backend`.
    pub fn new(backend: impl CompletionBackend) -> Self {
        Self(Arc::new(backend))
    }

    /// Wraps an already shared backend.
    pub fn from_arc(backend: Arc<dyn CompletionBackend>) -> Self {
        Self(backend)
    }
}

impl fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionClient")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .finish()
    }
}
