//! `landing-page`: landing page copy for a project.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Flow, FlowContext};
use crate::prompt::{Prompt, PromptBuilder};
use crate::schema::constraint;
use crate::{Result, ToolId};

const PREAMBLE: &str = "\
You are a conversion copywriter building landing pages for off-plan property launches.
Write scannable sections with clear benefits. Keep the meta description under 160 characters.";

const PROMPT_LANDING_PAGE: &str = "\
Write the copy for a single-page project website: a page title, a hero headline
and subheadline, content sections and a meta description.";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageInput {
    #[validate(length(min = 1))]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "constraint::data_uri"))]
    pub brochure_data_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LandingSection {
    #[validate(length(min = 1))]
    pub heading: String,
    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageOutput {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub hero_headline: String,
    pub hero_subheadline: String,
    #[validate(length(min = 1), nested)]
    pub sections: Vec<LandingSection>,
    pub meta_description: String,
}

/// Landing page copy generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct LandingPage;

impl LandingPage {
    fn prompt(input: &LandingPageInput) -> Result<Prompt> {
        Ok(PromptBuilder::new(PROMPT_LANDING_PAGE)
            .field("Project", &input.project_name)
            .optional("Developer", input.developer.as_deref())
            .optional("Location", input.location.as_deref())
            .list("Highlights", &input.highlights)
            .attachments("Brochure", &input.brochure_data_uri)
            .output_schema::<LandingPageOutput>()?
            .build())
    }

    fn offline(input: &LandingPageInput) -> LandingPageOutput {
        let name = input.project_name.trim();
        let location = input.location.as_deref().unwrap_or("a prime location");
        let by = input
            .developer
            .as_deref()
            .map(|d| format!(" by {d}"))
            .unwrap_or_default();

        let mut sections = vec![LandingSection {
            heading: "Overview".to_owned(),
            body: format!("{name}{by} brings contemporary living to {location}."),
        }];
        if !input.highlights.is_empty() {
            sections.push(LandingSection {
                heading: "Highlights".to_owned(),
                body: input.highlights.join(", "),
            });
        }

        LandingPageOutput {
            title: format!("{name} | Official Project Page"),
            hero_headline: format!("Welcome to {name}"),
            hero_subheadline: format!("New homes in {location}"),
            sections,
            meta_description: format!("Register your interest in {name}{by}."),
        }
    }
}

impl Flow for LandingPage {
    const ID: ToolId = ToolId::LandingPage;
    const TITLE: &'static str = "Landing Page";
    const DESCRIPTION: &'static str = "Drafts hero copy, page sections and SEO metadata.";

    type Input = LandingPageInput;
    type Output = LandingPageOutput;

    async fn run(&self, ctx: &FlowContext, input: LandingPageInput) -> Result<LandingPageOutput> {
        let prompt = Self::prompt(&input)?;
        ctx.generate(Self::ID, PREAMBLE, prompt, || Self::offline(&input))
            .await
    }
}
