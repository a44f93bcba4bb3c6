//! `commission-calculator`: returns its payload unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use super::{Flow, FlowContext};
use crate::{Result, ToolId};

/// Any JSON value, accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Passthrough(pub Value);

impl Validate for Passthrough {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Echo tool used by the commission calculator widget, which computes
/// client-side and only needs a round trip.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommissionCalculator;

impl Flow for CommissionCalculator {
    const ID: ToolId = ToolId::CommissionCalculator;
    const TITLE: &'static str = "Commission Calculator";
    const DESCRIPTION: &'static str = "Echoes the calculator state back to the client.";

    type Input = Passthrough;
    type Output = Passthrough;

    async fn run(&self, _ctx: &FlowContext, input: Passthrough) -> Result<Passthrough> {
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::flow::test_support;

    #[tokio::test]
    async fn returns_payload_unchanged() -> anyhow::Result<()> {
        let payload = json!({"x": 1, "nested": {"rate": 2.5}});
        let output = CommissionCalculator
            .run(&test_support::offline(), Passthrough(payload.clone()))
            .await?;
        assert_eq!(output.0, payload);
        Ok(())
    }
}
