//! Tool dispatch handlers.
//!
//! `/api/run` and `/api/tools/run` are served by the same handler: the
//! registry resolves `toolId`, the flow validates `payload`, and the flow
//! output is returned as the bare response body.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use serde_json::Value;
use suite_rig::ToolRegistry;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::request::RunTool;
use crate::handler::response::Tools;
use crate::service::ServiceState;

/// Tracing target for tool operations.
const TRACING_TARGET: &str = "suite_server::handler::tools";

/// Runs one tool and returns its output.
#[tracing::instrument(skip_all)]
async fn run_tool(
    State(registry): State<ToolRegistry>,
    Json(request): Json<RunTool>,
) -> Result<Json<Value>> {
    tracing::debug!(target: TRACING_TARGET, tool_id = %request.tool_id, "running tool");

    let output = registry.run(&request.tool_id, request.payload).await?;

    tracing::info!(target: TRACING_TARGET, tool_id = %request.tool_id, "tool finished");
    Ok(Json(output))
}

/// Lists every registered tool with its input and output schemas.
#[tracing::instrument(skip_all)]
async fn list_tools(State(registry): State<ToolRegistry>) -> Json<Tools> {
    let descriptors = registry.descriptors().into_iter().cloned().collect();
    Json(Tools::new(descriptors))
}

/// Returns a [`Router`] with all tool routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/run", post(run_tool))
        .route("/api/tools/run", post(run_tool))
        .route("/api/tools", get(list_tools))
}
