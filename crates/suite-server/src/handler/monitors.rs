//! Liveness handler.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use suite_rig::ToolRegistry;

use crate::extract::Json;
use crate::handler::response::MonitorStatus;
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn health_status(State(registry): State<ToolRegistry>) -> Json<MonitorStatus> {
    Json(MonitorStatus::new(registry.is_offline(), registry.len()))
}

/// Returns a [`Router`] with the health route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn health_reports_offline_mode() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<MonitorStatus>();
        assert!(status.ok);
        assert!(status.offline);
        assert_eq!(status.tools, 8);
        Ok(())
    }
}
