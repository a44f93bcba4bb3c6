//! `campaign-planner`: a paid campaign structure, optionally published.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{AsRefStr, Display};
use suite_publish::{PublishOutcome, PublishTarget};
use validator::Validate;

use super::{Flow, FlowContext};
use crate::prompt::{Prompt, PromptBuilder};
use crate::schema::constraint;
use crate::{Result, TRACING_TARGET_FLOW, ToolId};

const PREAMBLE: &str = "\
You are a paid-media strategist for property developers.
Split the daily budget across ad sets; ad set budgets must add up to the total.";

const PROMPT_CAMPAIGN_PLANNER: &str = "\
Plan a paid social campaign for the project below. Name the campaign and
define ad sets with their audience, daily budget and creative angles.";

/// Campaign optimization goal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CampaignObjective {
    #[default]
    Leads,
    Traffic,
    Awareness,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlannerInput {
    #[validate(length(min = 1))]
    pub project_name: String,
    #[serde(default)]
    pub objective: CampaignObjective,
    #[validate(custom(function = "constraint::positive"))]
    pub daily_budget: f64,
    #[validate(range(min = 1, max = 90))]
    pub duration_days: u32,
    #[serde(default)]
    pub target_locations: Vec<String>,
    /// Create the campaign on the ads platform after planning.
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdSet {
    #[validate(length(min = 1))]
    pub name: String,
    pub audience: String,
    #[validate(custom(function = "constraint::positive"))]
    pub daily_budget: f64,
    #[serde(default)]
    pub creatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlannerOutput {
    #[validate(length(min = 1))]
    pub campaign_name: String,
    pub objective: CampaignObjective,
    #[validate(length(min = 1), nested)]
    pub ad_sets: Vec<AdSet>,
    /// Present only when publishing was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishOutcome>,
}

/// Campaign planner.
#[derive(Debug, Default, Clone, Copy)]
pub struct CampaignPlanner;

impl CampaignPlanner {
    fn prompt(input: &CampaignPlannerInput) -> Result<Prompt> {
        Ok(PromptBuilder::new(PROMPT_CAMPAIGN_PLANNER)
            .field("Project", &input.project_name)
            .field("Objective", input.objective)
            .field("Daily budget", input.daily_budget)
            .field("Duration (days)", input.duration_days)
            .list("Target locations", &input.target_locations)
            .output_schema::<CampaignPlannerOutput>()?
            .build())
    }

    fn offline(input: &CampaignPlannerInput) -> CampaignPlannerOutput {
        let name = input.project_name.trim();
        let half = input.daily_budget / 2.0;
        let locations = if input.target_locations.is_empty() {
            "UAE residents".to_owned()
        } else {
            input.target_locations.join(", ")
        };

        CampaignPlannerOutput {
            campaign_name: format!("{name} - {} - {}d", input.objective, input.duration_days),
            objective: input.objective,
            ad_sets: vec![
                AdSet {
                    name: "Investors".to_owned(),
                    audience: format!("Property investors in {locations}"),
                    daily_budget: half,
                    creatives: vec!["ROI and payment plan".to_owned()],
                },
                AdSet {
                    name: "End users".to_owned(),
                    audience: format!("Families relocating within {locations}"),
                    daily_budget: input.daily_budget - half,
                    creatives: vec!["Lifestyle and amenities".to_owned()],
                },
            ],
            publish: None,
        }
    }

    fn publish_payload(
        input: &CampaignPlannerInput,
        plan: &CampaignPlannerOutput,
    ) -> serde_json::Value {
        json!({
            "name": plan.campaign_name,
            "objective": plan.objective,
            "dailyBudget": input.daily_budget,
            "durationDays": input.duration_days,
            "targetLocations": input.target_locations,
            "adSets": plan.ad_sets,
        })
    }
}

impl Flow for CampaignPlanner {
    const ID: ToolId = ToolId::CampaignPlanner;
    const TITLE: &'static str = "Campaign Planner";
    const DESCRIPTION: &'static str =
        "Plans ad sets and budgets, and can create the campaign on the ads platform.";

    type Input = CampaignPlannerInput;
    type Output = CampaignPlannerOutput;

    async fn run(
        &self,
        ctx: &FlowContext,
        input: CampaignPlannerInput,
    ) -> Result<CampaignPlannerOutput> {
        let prompt = Self::prompt(&input)?;
        let mut plan = ctx
            .generate(Self::ID, PREAMBLE, prompt, || Self::offline(&input))
            .await?;

        plan.publish = None;
        if input.publish {
            let payload = Self::publish_payload(&input, &plan);
            let outcome = ctx.publish(PublishTarget::AdsPlatform, &payload).await;
            tracing::info!(
                target: TRACING_TARGET_FLOW,
                tool = %Self::ID,
                status = %outcome.status,
                "campaign publish finished"
            );
            plan.publish = Some(outcome);
        }

        Ok(plan)
    }
}
