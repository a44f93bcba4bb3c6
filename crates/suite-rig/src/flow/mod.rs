//! Flows: one schema-validated generation step per tool.
//!
//! A [`Flow`] binds a [`ToolId`] to its concrete input and output types.
//! [`FlowHandle`] erases those types behind [`DynFlow`] so the registry can
//! dispatch on a JSON payload, validating it on the way in and the produced
//! value on the way out.

mod ad_creator;
mod campaign_planner;
mod commission;
mod landing_page;
mod listing_sync;
mod pdf_editor;
mod reel_planner;
mod social_post;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use suite_core::RetryPolicy;
use suite_publish::{PublishOutcome, PublishService, PublishTarget};
use validator::Validate;

pub use self::ad_creator::{AdCreator, AdCreatorInput, AdCreatorOutput, AdPlatform};
pub use self::campaign_planner::{
    AdSet, CampaignObjective, CampaignPlanner, CampaignPlannerInput, CampaignPlannerOutput,
};
pub use self::commission::{CommissionCalculator, Passthrough};
pub use self::landing_page::{LandingPage, LandingPageInput, LandingPageOutput, LandingSection};
pub use self::listing_sync::{ListingDraft, ListingSync, ListingSyncInput, ListingSyncOutput};
pub use self::pdf_editor::{PdfEdit, PdfEditor, PdfEditorInput, PdfEditorOutput};
pub use self::reel_planner::{ReelPlanner, ReelPlannerInput, ReelPlannerOutput, ReelScene};
pub use self::social_post::{
    SocialPlatform, SocialPost, SocialPostInput, SocialPostOutput, SocialPostWriter,
};
use crate::prompt::Prompt;
use crate::schema::{JsonResponse, SchemaValidator};
use crate::{CompletionClient, Result, TRACING_TARGET_FLOW, ToolId, ValidationStage};

/// Compiled draft validators, keyed by the generated type.
type DraftValidators = Arc<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>>;

/// A tool: typed input in, typed output out.
pub trait Flow: Send + Sync + 'static {
    /// Registry id of the tool.
    const ID: ToolId;
    /// Human-readable title.
    const TITLE: &'static str;
    /// One-line description.
    const DESCRIPTION: &'static str;

    type Input: DeserializeOwned + JsonSchema + Validate + Send;
    type Output: Serialize + DeserializeOwned + JsonSchema + Validate + Send;

    /// Runs the flow on an already validated input.
    fn run(
        &self,
        ctx: &FlowContext,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output>> + Send;
}

/// Collaborators available to every flow.
#[derive(Debug, Clone)]
pub struct FlowContext {
    completion: Option<CompletionClient>,
    publisher: PublishService,
    retry: RetryPolicy,
    drafts: DraftValidators,
}

impl FlowContext {
    /// Creates a context. Without a completion client flows produce
    /// deterministic offline output.
    pub fn new(
        completion: Option<CompletionClient>,
        publisher: PublishService,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            completion,
            publisher,
            retry,
            drafts: DraftValidators::default(),
        }
    }

    /// Returns true if no model is configured.
    pub fn is_offline(&self) -> bool {
        self.completion.is_none()
    }

    /// Returns the publish service.
    pub fn publisher(&self) -> &PublishService {
        &self.publisher
    }

    /// Generates a `T` from `prompt`, or returns `offline()` without a model.
    ///
    /// The raw completion is stripped of markdown fences and validated against
    /// the schema of `T` before it is decoded.
    pub async fn generate<T>(
        &self,
        tool: ToolId,
        preamble: &str,
        prompt: Prompt,
        offline: impl FnOnce() -> T + Send,
    ) -> Result<T>
    where
        T: DeserializeOwned + JsonSchema + Validate + 'static,
    {
        let Some(client) = &self.completion else {
            tracing::debug!(target: TRACING_TARGET_FLOW, tool = %tool, "returning offline output");
            return Ok(offline());
        };

        let raw = self
            .retry
            .run(tool.as_ref(), || client.complete(preamble, &prompt))
            .await?;

        let value = JsonResponse::parse(&raw)?;
        self.draft_validator::<T>()?.validate(&value)
    }

    /// Returns the output validator for `T`, compiling it on first use.
    fn draft_validator<T: JsonSchema + 'static>(&self) -> Result<Arc<SchemaValidator<T>>> {
        let key = TypeId::of::<T>();
        let cached = self
            .drafts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        if let Some(validator) = cached.and_then(|v| v.downcast::<SchemaValidator<T>>().ok()) {
            return Ok(validator);
        }

        let validator = Arc::new(SchemaValidator::<T>::new(ValidationStage::Output)?);
        self.drafts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, validator.clone());
        Ok(validator)
    }

    /// Publishes `payload` to `target`. Failures are reported, never raised.
    pub async fn publish(&self, target: PublishTarget, payload: &Value) -> PublishOutcome {
        self.publisher.publish(target, payload).await
    }
}

/// Public description of a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub title: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

/// Type-erased flow, dispatched on JSON payloads.
#[async_trait::async_trait]
pub trait DynFlow: Send + Sync {
    /// Returns the tool descriptor.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Validates `payload`, runs the flow and validates its output.
    async fn run_value(&self, payload: Value) -> Result<Value>;
}

/// Binds a [`Flow`] to its validators and context.
pub(crate) struct FlowHandle<F: Flow> {
    flow: F,
    ctx: FlowContext,
    input: SchemaValidator<F::Input>,
    output: SchemaValidator<F::Output>,
    descriptor: ToolDescriptor,
}

impl<F: Flow> FlowHandle<F> {
    /// Compiles the schemas of `flow`.
    pub fn new(flow: F, ctx: FlowContext) -> Result<Arc<Self>> {
        let input = SchemaValidator::new(ValidationStage::Input)?;
        let output = SchemaValidator::new(ValidationStage::Output)?;
        let descriptor = ToolDescriptor {
            id: F::ID,
            title: F::TITLE.to_owned(),
            description: F::DESCRIPTION.to_owned(),
            input_schema: input.schema().clone(),
            output_schema: output.schema().clone(),
        };

        Ok(Arc::new(Self {
            flow,
            ctx,
            input,
            output,
            descriptor,
        }))
    }
}

#[async_trait::async_trait]
impl<F: Flow> DynFlow for FlowHandle<F> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    #[tracing::instrument(skip_all, fields(tool = %F::ID))]
    async fn run_value(&self, payload: Value) -> Result<Value> {
        let input = self.input.validate(&payload)?;
        let output = self.flow.run(&self.ctx, input).await?;

        let value = serde_json::to_value(&output)?;
        self.output.validate(&value)?;

        tracing::debug!(target: TRACING_TARGET_FLOW, tool = %F::ID, "flow completed");
        Ok(value)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use suite_core::RetryPolicy;
    use suite_publish::{HttpPublisher, PublishConfig, PublishService};

    use super::FlowContext;
    use crate::{CompletionClient, ScriptedBackend};

    pub const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";
    pub const PDF: &str = "data:application/pdf;base64,JVBERi0xLjQ=";

    fn publisher(config: PublishConfig) -> PublishService {
        let publisher = HttpPublisher::new(config).unwrap();
        PublishService::new(publisher, RetryPolicy::none())
    }

    /// Context without a model and without publish credentials.
    pub fn offline() -> FlowContext {
        FlowContext::new(None, publisher(PublishConfig::default()), RetryPolicy::none())
    }

    /// Context backed by `backend`, without publish credentials.
    pub fn scripted(backend: &Arc<ScriptedBackend>) -> FlowContext {
        FlowContext::new(
            Some(CompletionClient::from_arc(backend.clone())),
            publisher(PublishConfig::default()),
            RetryPolicy::none(),
        )
    }

    /// Context backed by `backend` with publish credentials for `config`.
    pub fn scripted_with(backend: &Arc<ScriptedBackend>, config: PublishConfig) -> FlowContext {
        FlowContext::new(
            Some(CompletionClient::from_arc(backend.clone())),
            publisher(config),
            RetryPolicy::none(),
        )
    }
}
