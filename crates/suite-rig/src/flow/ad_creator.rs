//! `ad-creator`: ad copy for a real-estate project.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use validator::Validate;

use super::{Flow, FlowContext};
use crate::prompt::{Prompt, PromptBuilder};
use crate::schema::constraint;
use crate::{Result, ToolId};

const PREAMBLE: &str = "\
You are a senior performance marketer for real-estate developers.
You write concise, compliant ad copy that drives qualified leads.
Never invent prices, dates or amenities that are not given.";

const PROMPT_AD_CREATOR: &str = "\
Create ad copy for the project below. Provide several headline variants,
one primary text, a call to action and ideas for the ad images.
Use the attached brochure pages, if any, as the source of facts.";

/// Ad platform the copy is written for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdPlatform {
    #[default]
    Facebook,
    Instagram,
    Google,
    Linkedin,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdCreatorInput {
    #[validate(length(min = 1))]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub platform: AdPlatform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// Up to five brochure pages as data URIs.
    #[serde(default)]
    #[validate(length(max = 5), custom(function = "constraint::data_uris"))]
    pub brochure_data_uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdCreatorOutput {
    #[validate(length(min = 1))]
    pub headlines: Vec<String>,
    #[validate(length(min = 1))]
    pub primary_text: String,
    #[validate(length(min = 1))]
    pub call_to_action: String,
    #[serde(default)]
    pub image_ideas: Vec<String>,
}

/// Ad copy generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdCreator;

impl AdCreator {
    fn prompt(input: &AdCreatorInput) -> Result<Prompt> {
        Ok(PromptBuilder::new(PROMPT_AD_CREATOR)
            .field("Project", &input.project_name)
            .field("Platform", input.platform)
            .optional("Description", input.project_description.as_deref())
            .optional("Target audience", input.target_audience.as_deref())
            .optional("Tone", input.tone.as_deref())
            .attachments("Brochure page", &input.brochure_data_uris)
            .output_schema::<AdCreatorOutput>()?
            .build())
    }

    fn offline(input: &AdCreatorInput) -> AdCreatorOutput {
        let name = input.project_name.trim();
        AdCreatorOutput {
            headlines: vec![
                format!("Discover {name}"),
                format!("{name}: your next address"),
                format!("Register your interest in {name} today"),
            ],
            primary_text: format!(
                "{name} is now open for registrations. Secure early access to launch prices and payment plans."
            ),
            call_to_action: match input.platform {
                AdPlatform::Google => "Get Quote".to_owned(),
                _ => "Learn More".to_owned(),
            },
            image_ideas: vec![
                "Aerial shot of the community at golden hour".to_owned(),
                "Bright living room with skyline views".to_owned(),
            ],
        }
    }
}

impl Flow for AdCreator {
    const ID: ToolId = ToolId::AdCreator;
    const TITLE: &'static str = "Ad Creator";
    const DESCRIPTION: &'static str =
        "Generates headline variants, primary text and a call to action for paid ads.";

    type Input = AdCreatorInput;
    type Output = AdCreatorOutput;

    async fn run(&self, ctx: &FlowContext, input: AdCreatorInput) -> Result<AdCreatorOutput> {
        let prompt = Self::prompt(&input)?;
        ctx.generate(Self::ID, PREAMBLE, prompt, || Self::offline(&input))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::flow::test_support::{self, PNG};
    use crate::{Error, ScriptedBackend};

    fn input() -> AdCreatorInput {
        AdCreatorInput {
            project_name: "Creek Vista".into(),
            project_description: None,
            target_audience: Some("Young families".into()),
            platform: AdPlatform::Instagram,
            tone: None,
            brochure_data_uris: vec![PNG.into(), PNG.into()],
        }
    }

    #[tokio::test]
    async fn offline_output_mentions_project() -> anyhow::Result<()> {
        let output = AdCreator.run(&test_support::offline(), input()).await?;
        assert!(output.headlines.iter().all(|h| h.contains("Creek Vista")));
        assert_eq!(output.call_to_action, "Learn More");
        Ok(())
    }

    #[tokio::test]
    async fn model_output_is_parsed_from_fenced_json() -> anyhow::Result<()> {
        let backend = Arc::new(ScriptedBackend::new([r#"```json
{"headlines": ["Live by the creek"], "primaryText": "Launch pricing.", "callToAction": "Sign Up", "imageIdeas": []}
```"#]));
        let output = AdCreator
            .run(&test_support::scripted(&backend), input())
            .await?;
        assert_eq!(output.headlines, ["Live by the creek"]);

        let prompts = backend.prompts().await;
        assert!(prompts[0].contains("Platform: instagram"));
        assert!(prompts[0].contains("[Brochure page 2 (image/png)]"));
        assert!(!prompts[0].contains("Tone:"));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_model_output_is_rejected() {
        let backend = Arc::new(ScriptedBackend::new([r#"{"headlines": [], "primaryText": ""}"#]));
        let error = AdCreator
            .run(&test_support::scripted(&backend), input())
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Validation { .. }));
        let violations = error.violations().unwrap();
        assert!(violations.iter().any(|v| v.contains("callToAction")));
        assert!(violations.iter().any(|v| v.starts_with("/primaryText")));
    }
}
