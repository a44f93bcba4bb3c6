//! Tool identifiers and the registry that dispatches on them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::flow::{
    AdCreator, CampaignPlanner, CommissionCalculator, DynFlow, Flow, FlowContext, FlowHandle,
    LandingPage, ListingSync, PdfEditor, ReelPlanner, SocialPostWriter, ToolDescriptor,
};
use crate::{Error, Result, TRACING_TARGET_REGISTRY};

/// Identifier of a registered tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ToolId {
    CommissionCalculator,
    AdCreator,
    LandingPage,
    SocialPost,
    ReelPlanner,
    PdfEditor,
    CampaignPlanner,
    ListingSync,
}

/// Read-only map from [`ToolId`] to its flow.
///
/// Built once at startup and shared by cloning.
#[derive(Clone)]
pub struct ToolRegistry {
    flows: Arc<HashMap<ToolId, Arc<dyn DynFlow>>>,
    offline: bool,
}

impl ToolRegistry {
    /// Registers every built-in tool over `ctx`.
    pub fn new(ctx: FlowContext) -> Result<Self> {
        RegistryBuilder::new(ctx)
            .register(CommissionCalculator)?
            .register(AdCreator)?
            .register(LandingPage)?
            .register(SocialPostWriter)?
            .register(ReelPlanner)?
            .register(PdfEditor)?
            .register(CampaignPlanner)?
            .register(ListingSync)
            .map(RegistryBuilder::build)
    }

    /// Resolves a raw tool id.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn DynFlow>> {
        id.parse::<ToolId>()
            .ok()
            .and_then(|tool| self.flows.get(&tool))
            .cloned()
            .ok_or_else(|| Error::ToolNotFound(id.to_owned()))
    }

    /// Resolves `id` and runs its flow on `payload`.
    ///
    /// The payload is forwarded unchanged; the flow validates it.
    pub async fn run(&self, id: &str, payload: Value) -> Result<Value> {
        let flow = self.resolve(id)?;
        tracing::debug!(target: TRACING_TARGET_REGISTRY, tool = id, "dispatching tool run");
        flow.run_value(payload).await
    }

    /// Returns the descriptors of all registered tools, in declaration order.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        ToolId::iter()
            .filter_map(|id| self.flows.get(&id))
            .map(|flow| flow.descriptor())
            .collect()
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Returns true if no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Returns true if flows answer with offline output.
    pub fn is_offline(&self) -> bool {
        self.offline
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = ToolId::iter().filter(|id| self.flows.contains_key(id)).collect();
        f.debug_struct("ToolRegistry")
            .field("tools", &ids)
            .field("offline", &self.offline)
            .finish()
    }
}

struct RegistryBuilder {
    ctx: FlowContext,
    flows: HashMap<ToolId, Arc<dyn DynFlow>>,
}

impl RegistryBuilder {
    fn new(ctx: FlowContext) -> Self {
        Self {
            ctx,
            flows: HashMap::new(),
        }
    }

    fn register<F: Flow>(mut self, flow: F) -> Result<Self> {
        if self.flows.contains_key(&F::ID) {
            return Err(Error::config(format!("tool {} registered twice", F::ID)));
        }

        let handle = FlowHandle::new(flow, self.ctx.clone())?;
        self.flows.insert(F::ID, handle);
        Ok(self)
    }

    fn build(self) -> ToolRegistry {
        tracing::info!(
            target: TRACING_TARGET_REGISTRY,
            tools = self.flows.len(),
            offline = self.ctx.is_offline(),
            "tool registry built"
        );

        ToolRegistry {
            offline: self.ctx.is_offline(),
            flows: Arc::new(self.flows),
        }
    }
}
