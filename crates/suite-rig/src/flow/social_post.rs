//! `social-post`: a batch of organic social posts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use validator::Validate;

use super::{Flow, FlowContext};
use crate::prompt::{Prompt, PromptBuilder};
use crate::schema::constraint;
use crate::{Result, ToolId};

const PREAMBLE: &str = "\
You are a social media manager for a real-estate brokerage.
Posts are short, platform-native and end with relevant hashtags.";

const PROMPT_SOCIAL_POST: &str = "\
Write the requested number of social media posts about the topic below.
Each post has a caption and a list of hashtags without the leading '#'.";

/// Social network the posts are written for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SocialPlatform {
    #[default]
    Instagram,
    Facebook,
    Linkedin,
    Tiktok,
    X,
}

fn default_post_count() -> u32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocialPostInput {
    #[validate(length(min = 1))]
    pub topic: String,
    #[serde(default)]
    pub platform: SocialPlatform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default = "default_post_count")]
    #[validate(range(min = 1, max = 10))]
    pub post_count: u32,
    #[serde(default)]
    #[validate(custom(function = "constraint::data_uris"))]
    pub image_data_uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    #[validate(length(min = 1))]
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocialPostOutput {
    #[validate(length(min = 1), nested)]
    pub posts: Vec<SocialPost>,
}

/// Social post generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SocialPostWriter;

impl SocialPostWriter {
    fn prompt(input: &SocialPostInput) -> Result<Prompt> {
        Ok(PromptBuilder::new(PROMPT_SOCIAL_POST)
            .field("Topic", &input.topic)
            .field("Platform", input.platform)
            .field("Number of posts", input.post_count)
            .optional("Tone", input.tone.as_deref())
            .attachments("Image", &input.image_data_uris)
            .output_schema::<SocialPostOutput>()?
            .build())
    }

    fn offline(input: &SocialPostInput) -> SocialPostOutput {
        let topic = input.topic.trim();
        let tag: String = topic
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();

        let posts = (1..=input.post_count)
            .map(|n| SocialPost {
                caption: format!("{topic} ({n}/{}) Message us to learn more.", input.post_count),
                hashtags: vec![tag.clone(), "realestate".to_owned()],
            })
            .collect();

        SocialPostOutput { posts }
    }
}

impl Flow for SocialPostWriter {
    const ID: ToolId = ToolId::SocialPost;
    const TITLE: &'static str = "Social Posts";
    const DESCRIPTION: &'static str = "Writes captions and hashtags for a series of social posts.";

    type Input = SocialPostInput;
    type Output = SocialPostOutput;

    async fn run(&self, ctx: &FlowContext, input: SocialPostInput) -> Result<SocialPostOutput> {
        let prompt = Self::prompt(&input)?;
        ctx.generate(Self::ID, PREAMBLE, prompt, || Self::offline(&input))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::test_support;

    #[tokio::test]
    async fn offline_respects_post_count() -> anyhow::Result<()> {
        let input = SocialPostInput {
            topic: "Dubai Hills launch".into(),
            platform: SocialPlatform::Linkedin,
            tone: None,
            post_count: 4,
            image_data_uris: vec![],
        };

        let output = SocialPostWriter.run(&test_support::offline(), input).await?;
        assert_eq!(output.posts.len(), 4);
        assert_eq!(output.posts[0].hashtags[0], "dubaihillslaunch");
        Ok(())
    }
}
