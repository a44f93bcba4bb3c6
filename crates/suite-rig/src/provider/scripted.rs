//! Scripted completion backend.

use std::collections::VecDeque;

use tokio::sync::Mutex;

use suite_core::DataUri;

use super::CompletionBackend;
use crate::prompt::Prompt;
use crate::{Error, Result};

/// Backend that replays canned responses in order and records every prompt.
///
/// Used wherever a deterministic model is needed, mostly in tests.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedBackend {
    /// Creates a backend answering with `responses`, in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::default(),
        }
    }

    /// Queues a provider failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Queues a response.
    pub async fn push_response(&self, response: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(response.into()));
    }

    /// Returns the text of every prompt received so far.
    pub async fn prompts(&self) -> Vec<String> {
        let prompts = self.prompts.lock().await;
        prompts.iter().map(|p| p.text().to_owned()).collect()
    }

    /// Returns the attachments sent with every prompt received so far.
    pub async fn attachments(&self) -> Vec<Vec<DataUri>> {
        let prompts = self.prompts.lock().await;
        prompts.iter().map(|p| p.attachments().to_vec()).collect()
    }
}

#[async_trait::async_trait]
impl CompletionBackend for ScriptedBackend {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _preamble: &str, prompt: &Prompt) -> Result<String> {
        self.prompts.lock().await.push(prompt.clone());
        match self.responses.lock().await.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(Error::provider("scripted", message)),
            None => Err(Error::generation("no scripted response left")),
        }
    }
}
