//! `listing-sync`: portal listing copy, pushed to the listing feed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use suite_publish::{PublishOutcome, PublishTarget};
use validator::Validate;

use super::{Flow, FlowContext};
use crate::prompt::{Prompt, PromptBuilder};
use crate::schema::constraint;
use crate::{Result, TRACING_TARGET_FLOW, ToolId};

const PREAMBLE: &str = "\
You write property portal listings. Titles are under 70 characters,
descriptions are factual and keywords are lowercase search terms.";

const PROMPT_LISTING_SYNC: &str = "\
Write a portal listing for the property below: a title, a description and
a list of search keywords.";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingSyncInput {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "constraint::positive"))]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(default)]
    #[validate(custom(function = "constraint::http_urls"))]
    pub image_urls: Vec<String>,
}

/// The generated part of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    #[validate(length(min = 1))]
    pub listing_title: String,
    #[validate(length(min = 1))]
    pub listing_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingSyncOutput {
    #[validate(length(min = 1))]
    pub listing_title: String,
    #[validate(length(min = 1))]
    pub listing_description: String,
    pub keywords: Vec<String>,
    pub sync: PublishOutcome,
}

/// Listing writer and feed sync.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListingSync;

impl ListingSync {
    fn prompt(input: &ListingSyncInput) -> Result<Prompt> {
        let bedrooms = input.bedrooms.map(|b| b.to_string());
        Ok(PromptBuilder::new(PROMPT_LISTING_SYNC)
            .field("Title", &input.title)
            .field("Price", input.price)
            .field("Location", &input.location)
            .optional("Bedrooms", bedrooms.as_deref())
            .list("Image URLs", &input.image_urls)
            .section("Owner description", input.description.as_deref())
            .output_schema::<ListingDraft>()?
            .build())
    }

    fn offline(input: &ListingSyncInput) -> ListingDraft {
        let bedrooms = input
            .bedrooms
            .map(|b| format!("{b}-bedroom "))
            .unwrap_or_default();
        let location = input.location.trim();

        ListingDraft {
            listing_title: format!("{bedrooms}{} in {location}", input.title.trim()),
            listing_description: input.description.clone().unwrap_or_else(|| {
                format!(
                    "{} located in {location}, offered at {}.",
                    input.title.trim(),
                    input.price
                )
            }),
            keywords: vec![location.to_lowercase(), "for sale".to_owned()],
        }
    }
}

impl Flow for ListingSync {
    const ID: ToolId = ToolId::ListingSync;
    const TITLE: &'static str = "Listing Sync";
    const DESCRIPTION: &'static str =
        "Writes portal listing copy and pushes the listing to the partner feed.";

    type Input = ListingSyncInput;
    type Output = ListingSyncOutput;

    async fn run(&self, ctx: &FlowContext, input: ListingSyncInput) -> Result<ListingSyncOutput> {
        ctx.publisher().require(PublishTarget::ListingFeed)?;

        let prompt = Self::prompt(&input)?;
        let draft = ctx
            .generate(Self::ID, PREAMBLE, prompt, || Self::offline(&input))
            .await?;

        let payload = json!({
            "title": draft.listing_title,
            "description": draft.listing_description,
            "keywords": draft.keywords,
            "price": input.price,
            "bedrooms": input.bedrooms,
            "location": input.location,
            "images": input.image_urls,
        });
        let sync = ctx.publish(PublishTarget::ListingFeed, &payload).await;
        tracing::info!(
            target: TRACING_TARGET_FLOW,
            tool = %Self::ID,
            status = %sync.status,
            "listing sync finished"
        );

        Ok(ListingSyncOutput {
            listing_title: draft.listing_title,
            listing_description: draft.listing_description,
            keywords: draft.keywords,
            sync,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use suite_publish::{PublishConfig, PublishStatus};

    use super::*;
    use crate::flow::test_support;
    use crate::{Error, ScriptedBackend};

    fn input() -> ListingSyncInput {
        ListingSyncInput {
            title: "Marina apartment".into(),
            description: None,
            price: 1_850_000.0,
            bedrooms: Some(2),
            location: "Dubai Marina".into(),
            image_urls: vec!["https://cdn.example.com/1.jpg".into()],
        }
    }

    #[tokio::test]
    async fn missing_feed_key_fails_before_model_call() {
        let backend = Arc::new(ScriptedBackend::default());
        let error = ListingSync
            .run(&test_support::scripted(&backend), input())
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Upstream { .. }));
        assert!(backend.prompts().await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_feed_reports_failed_sync() -> anyhow::Result<()> {
        let backend = Arc::new(ScriptedBackend::new([
            r#"{"listingTitle": "2BR Marina view", "listingDescription": "Bright unit.", "keywords": ["marina"]}"#,
        ]));
        let config = PublishConfig {
            listing_feed_api_key: Some("key".into()),
            listing_feed_url: "http://127.0.0.1:9".into(),
            ..PublishConfig::default()
        };

        let output = ListingSync
            .run(&test_support::scripted_with(&backend, config), input())
            .await?;

        assert_eq!(output.listing_title, "2BR Marina view");
        assert_eq!(output.sync.status, PublishStatus::Failed);
        assert_eq!(output.sync.target, PublishTarget::ListingFeed);
        Ok(())
    }
}
