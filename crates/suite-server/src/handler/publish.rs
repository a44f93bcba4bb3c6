//! Explicit publish handler.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use suite_publish::PublishService;

use crate::extract::Json;
use crate::handler::request::PublishRequest;
use crate::handler::response::Published;
use crate::service::ServiceState;

/// Tracing target for publish operations.
const TRACING_TARGET: &str = "suite_server::handler::publish";

/// Publishes a payload to one target.
///
/// Target failures are reported in the outcome, not as an error status.
#[tracing::instrument(skip_all)]
async fn publish(
    State(publisher): State<PublishService>,
    Json(request): Json<PublishRequest>,
) -> Json<Published> {
    let outcome = publisher.publish(request.target, &request.payload).await;

    tracing::info!(
        target: TRACING_TARGET,
        publish_target = %request.target,
        status = %outcome.status,
        "publish finished"
    );

    Json(outcome.into())
}

/// Returns a [`Router`] with the publish route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/publish", post(publish))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn unconfigured_target_is_skipped() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/api/publish")
            .json(&json!({ "target": "ads-platform", "payload": { "name": "Launch" } }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["outcome"]["status"], json!("skipped"));
        assert_eq!(body["outcome"]["target"], json!("ads-platform"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_target_is_bad_request() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/api/publish")
            .json(&json!({ "target": "fax", "payload": {} }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
