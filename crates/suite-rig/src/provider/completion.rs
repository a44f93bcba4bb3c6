//! rig-core backed completion provider.

use std::sync::Arc;

use rig::completion::{
    AssistantContent, CompletionError, CompletionModel as RigCompletionModel, Message,
};
use rig::message::{
    Document, DocumentMediaType, DocumentSourceKind, ImageMediaType, MimeType, UserContent,
};
use rig::one_or_many::OneOrMany;
use suite_core::DataUri;
use rig::prelude::CompletionClient as _;
use rig::providers::{anthropic, gemini, openai};

use super::{CompletionBackend, ModelProvider};
use crate::prompt::Prompt;
use crate::{Error, Result, TRACING_TARGET_PROVIDER};

/// Completion provider that wraps the rig completion model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<CompletionService>`.
#[derive(Clone)]
pub struct CompletionProvider(Arc<CompletionService>);

enum CompletionService {
    OpenAi {
        model: openai::CompletionModel,
        model_name: String,
    },
    Anthropic {
        model: anthropic::completion::CompletionModel,
        model_name: String,
    },
    Gemini {
        model: gemini::completion::CompletionModel,
        model_name: String,
    },
}

impl CompletionProvider {
    /// Connects to `provider` with the given API key and model.
    pub fn connect(provider: ModelProvider, api_key: &str, model_name: &str) -> Result<Self> {
        let model_name = model_name.to_owned();
        let inner = match provider {
            ModelProvider::OpenAi => {
                let client = openai::Client::new(api_key)
                    .map_err(|e| Error::provider("openai", e))?
                    .completions_api();
                CompletionService::OpenAi {
                    model: client.completion_model(&model_name),
                    model_name,
                }
            }
            ModelProvider::Anthropic => {
                let client = anthropic::Client::new(api_key)
                    .map_err(|e| Error::provider("anthropic", e))?;
                CompletionService::Anthropic {
                    model: client.completion_model(&model_name),
                    model_name,
                }
            }
            ModelProvider::Gemini => {
                let client =
                    gemini::Client::new(api_key).map_err(|e| Error::provider("gemini", e))?;
                CompletionService::Gemini {
                    model: client.completion_model(&model_name),
                    model_name,
                }
            }
        };

        Ok(Self(Arc::new(inner)))
    }
}

#[async_trait::async_trait]
impl CompletionBackend for CompletionProvider {
    fn provider_name(&self) -> &str {
        match self.0.as_ref() {
            CompletionService::OpenAi { .. } => "openai",
            CompletionService::Anthropic { .. } => "anthropic",
            CompletionService::Gemini { .. } => "gemini",
        }
    }

    fn model_name(&self) -> &str {
        match self.0.as_ref() {
            CompletionService::OpenAi { model_name, .. }
            | CompletionService::Anthropic { model_name, .. }
            | CompletionService::Gemini { model_name, .. } => model_name,
        }
    }

    async fn complete(&self, preamble: &str, prompt: &Prompt) -> Result<String> {
        let provider = self.provider_name();
        let map_err = |e: CompletionError| Error::provider(provider, e);

        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            provider = provider,
            model = self.model_name(),
            prompt_len = prompt.text().len(),
            attachments = prompt.attachments().len(),
            "sending completion request"
        );

        let message = user_message(prompt);

        match self.0.as_ref() {
            CompletionService::OpenAi { model, .. } => model
                .completion_request(message)
                .preamble(preamble.to_owned())
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
            CompletionService::Anthropic { model, .. } => model
                .completion_request(message)
                .preamble(preamble.to_owned())
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
            CompletionService::Gemini { model, .. } => model
                .completion_request(message)
                .preamble(preamble.to_owned())
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
        }
    }
}

/// Builds the user message: the prompt text followed by one part per attachment.
fn user_message(prompt: &Prompt) -> Message {
    let mut content = OneOrMany::one(UserContent::text(prompt.text()));
    for attachment in prompt.attachments() {
        content.push(attachment_content(attachment));
    }
    Message::User { content }
}

/// Images become image parts; anything else is sent as a base64 document.
fn attachment_content(attachment: &DataUri) -> UserContent {
    let mime = attachment.mime_type();
    if attachment.is_image() {
        return UserContent::image_base64(
            attachment.payload(),
            ImageMediaType::from_mime_type(mime),
            None,
        );
    }

    UserContent::Document(Document {
        data: DocumentSourceKind::Base64(attachment.payload().to_owned()),
        media_type: DocumentMediaType::from_mime_type(mime),
        additional_params: None,
    })
}

/// Extracts text content from assistant content choices.
fn extract_text_content(choice: &OneOrMany<AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBuilder;

    const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";
    const PDF: &str = "data:application/pdf;base64,JVBERi0xLjQ=";

    #[test]
    fn attachments_become_separate_message_parts() {
        let uris = [PNG.to_owned(), PDF.to_owned()];
        let prompt = PromptBuilder::new("Describe.")
            .attachments("Attachment", &uris)
            .build();

        let Message::User { content } = user_message(&prompt) else {
            panic!("expected a user message");
        };
        let parts: Vec<_> = content.iter().collect();
        assert_eq!(parts.len(), 3);

        let UserContent::Text(text) = parts[0] else {
            panic!("expected the prompt text first");
        };
        assert!(!text.text().contains("base64"));

        let UserContent::Image(image) = parts[1] else {
            panic!("expected an image part");
        };
        assert_eq!(image.media_type, Some(ImageMediaType::PNG));
        assert_eq!(image.data, DocumentSourceKind::Base64("iVBORw0KGgo=".to_owned()));

        let UserContent::Document(document) = parts[2] else {
            panic!("expected a document part");
        };
        assert_eq!(document.media_type, Some(DocumentMediaType::PDF));
        assert_eq!(document.data, DocumentSourceKind::Base64("JVBERi0xLjQ=".to_owned()));
    }
}
