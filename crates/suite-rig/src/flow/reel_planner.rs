//! `reel-planner`: a shot list for a short vertical video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Flow, FlowContext};
use crate::prompt::{Prompt, PromptBuilder};
use crate::schema::constraint;
use crate::{Result, ToolId};

const PREAMBLE: &str = "\
You are a video producer planning short-form property reels.
Scenes are numbered from 1 and their durations add up to the requested length.";

const PROMPT_REEL_PLANNER: &str = "\
Plan a reel about the topic below. For every scene give what is shown,
the voiceover line and its duration in seconds. Suggest background music.
Use the attached images as available footage.";

/// Number of scenes in offline plans.
const OFFLINE_SCENES: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReelPlannerInput {
    #[validate(length(min = 1))]
    pub topic: String,
    #[validate(range(min = 1, max = 180))]
    pub duration_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_mood: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "constraint::data_uris"))]
    pub image_data_uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReelScene {
    #[validate(range(min = 1))]
    pub scene_number: u32,
    #[validate(length(min = 1))]
    pub visual: String,
    pub voiceover: String,
    #[validate(range(min = 1))]
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReelPlannerOutput {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1), nested)]
    pub scenes: Vec<ReelScene>,
    pub suggested_music: String,
}

/// Reel shot-list generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReelPlanner;

impl ReelPlanner {
    fn prompt(input: &ReelPlannerInput) -> Result<Prompt> {
        Ok(PromptBuilder::new(PROMPT_REEL_PLANNER)
            .field("Topic", &input.topic)
            .field("Total duration (seconds)", input.duration_seconds)
            .optional("Music mood", input.music_mood.as_deref())
            .attachments("Image", &input.image_data_uris)
            .output_schema::<ReelPlannerOutput>()?
            .build())
    }

    /// Splits the duration into up to three scenes of at least one second.
    fn offline(input: &ReelPlannerInput) -> ReelPlannerOutput {
        let total = input.duration_seconds.max(1);
        let count = OFFLINE_SCENES.min(total);
        let base = total / count;
        let visuals = [
            "Establishing drone shot",
            "Interior walkthrough",
            "Amenities and call to action",
        ];

        let scenes = (0..count)
            .map(|i| {
                let extra = if i + 1 == count { total - base * count } else { 0 };
                ReelScene {
                    scene_number: i + 1,
                    visual: visuals[i as usize].to_owned(),
                    voiceover: format!("{} - part {}", input.topic.trim(), i + 1),
                    duration_seconds: base + extra,
                }
            })
            .collect();

        ReelPlannerOutput {
            title: input.topic.trim().to_owned(),
            scenes,
            suggested_music: input
                .music_mood
                .clone()
                .unwrap_or_else(|| "Upbeat ambient".to_owned()),
        }
    }
}

impl Flow for ReelPlanner {
    const ID: ToolId = ToolId::ReelPlanner;
    const TITLE: &'static str = "Reel Planner";
    const DESCRIPTION: &'static str = "Plans scenes, voiceover and music for a short video.";

    type Input = ReelPlannerInput;
    type Output = ReelPlannerOutput;

    async fn run(&self, ctx: &FlowContext, input: ReelPlannerInput) -> Result<ReelPlannerOutput> {
        let prompt = Self::prompt(&input)?;
        ctx.generate(Self::ID, PREAMBLE, prompt, || Self::offline(&input))
            .await
    }
}
