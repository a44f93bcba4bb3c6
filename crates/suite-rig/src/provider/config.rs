//! Model provider configuration.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::{CompletionClient, CompletionProvider};
use crate::{Result, TRACING_TARGET_PROVIDER};

/// Supported completion providers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelProvider {
    #[default]
    #[cfg_attr(feature = "config", value(name = "openai"))]
    OpenAi,
    Anthropic,
    Gemini,
}

impl ModelProvider {
    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::Gemini => "gemini-2.0-flash",
        }
    }
}

/// Completion model configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ModelConfig {
    /// Completion provider.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MODEL_PROVIDER", value_enum, default_value_t = ModelProvider::OpenAi)
    )]
    #[serde(default)]
    pub model_provider: ModelProvider,

    /// Model name; defaults to the provider's default model.
    #[cfg_attr(feature = "config", arg(long, env = "MODEL_NAME"))]
    pub model_name: Option<String>,

    /// Provider API key. Without it flows return offline output.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MODEL_API_KEY", hide_env_values = true)
    )]
    pub model_api_key: Option<String>,
}

impl ModelConfig {
    /// Returns the configured model name or the provider default.
    pub fn model_name(&self) -> &str {
        self.model_name
            .as_deref()
            .unwrap_or_else(|| self.model_provider.default_model())
    }

    /// Connects to the configured provider.
    ///
    /// Returns `None` when no API key is set.
    pub fn connect(&self) -> Result<Option<CompletionClient>> {
        let Some(api_key) = self.model_api_key.as_deref().filter(|k| !k.trim().is_empty())
        else {
            tracing::warn!(
                target: TRACING_TARGET_PROVIDER,
                provider = %self.model_provider,
                "no model api key configured, flows return offline output"
            );
            return Ok(None);
        };

        let provider = CompletionProvider::connect(self.model_provider, api_key, self.model_name())?;
        tracing::info!(
            target: TRACING_TARGET_PROVIDER,
            provider = %self.model_provider,
            model = self.model_name(),
            "completion provider ready"
        );

        Ok(Some(CompletionClient::new(provider)))
    }
}
