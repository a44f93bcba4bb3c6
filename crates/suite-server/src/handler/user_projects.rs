//! Saved project handlers.
//!
//! Every route authenticates first; nothing is read or written for an
//! unauthenticated caller.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use suite_store::UserProjectRepository;

use crate::extract::{AuthUser, Json, Query};
use crate::handler::Result;
use crate::handler::request::{DeleteUserProject, UpsertUserProject};
use crate::handler::response::{UserProjectChanged, UserProjects};
use crate::service::ServiceState;

/// Tracing target for saved project operations.
const TRACING_TARGET: &str = "suite_server::handler::user_projects";

/// Lists the caller's saved projects.
#[tracing::instrument(skip_all, fields(uid = %auth_user.uid()))]
async fn list_projects(
    auth_user: AuthUser,
    State(repository): State<UserProjectRepository>,
) -> Result<Json<UserProjects>> {
    let projects = repository.list(auth_user.uid()).await?;
    tracing::debug!(target: TRACING_TARGET, count = projects.len(), "projects listed");
    Ok(Json(UserProjects::new(projects)))
}

/// Creates or merge-updates one saved project.
#[tracing::instrument(skip_all, fields(uid = %auth_user.uid()))]
async fn upsert_project(
    auth_user: AuthUser,
    State(repository): State<UserProjectRepository>,
    Json(request): Json<UpsertUserProject>,
) -> Result<Json<UserProjectChanged>> {
    let project = request.into_project()?;
    repository.upsert(auth_user.uid(), &project).await?;

    tracing::info!(target: TRACING_TARGET, project_id = %project.id, "project saved");
    Ok(Json(UserProjectChanged::new(project.id)))
}

/// Removes one saved project. Removing a missing project succeeds.
#[tracing::instrument(skip_all, fields(uid = %auth_user.uid()))]
async fn delete_project(
    auth_user: AuthUser,
    State(repository): State<UserProjectRepository>,
    Query(request): Query<DeleteUserProject>,
) -> Result<Json<UserProjectChanged>> {
    let project_id = request.project_id()?;
    repository.delete(auth_user.uid(), project_id).await?;

    tracing::info!(target: TRACING_TARGET, project_id = %project_id, "project deleted");
    Ok(Json(UserProjectChanged::new(project_id)))
}

/// Returns a [`Router`] with all saved project routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route(
        "/api/user/projects",
        get(list_projects)
            .post(upsert_project)
            .delete(delete_project),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{bearer, create_test_server_with_state, create_test_state};

    #[tokio::test]
    async fn upsert_requires_authentication() -> anyhow::Result<()> {
        let server = create_test_server_with_state(routes(), create_test_state()?).await?;

        let response = server
            .post("/api/user/projects")
            .json(&json!({ "id": "p1", "name": "Marina" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "ok": false, "error": "Unauthorized" }));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_tokens_are_unauthorized() -> anyhow::Result<()> {
        let server = create_test_server_with_state(routes(), create_test_state()?).await?;

        let response = server
            .get("/api/user/projects")
            .authorization_bearer("not-a-token")
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_missing_project_succeeds() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let token = bearer(&state, "user-1")?;
        let server = create_test_server_with_state(routes(), state).await?;

        let response = server
            .delete("/api/user/projects")
            .add_query_param("projectId", "missing-id")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "ok": true, "success": true, "projectId": "missing-id" }));
        Ok(())
    }

    #[tokio::test]
    async fn delete_requires_project_id() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let token = bearer(&state, "user-1")?;
        let server = create_test_server_with_state(routes(), state).await?;

        let response = server
            .delete("/api/user/projects")
            .authorization_bearer(token)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn projects_are_scoped_to_the_caller() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let alice = bearer(&state, "alice")?;
        let bob = bearer(&state, "bob")?;
        let server = create_test_server_with_state(routes(), state).await?;

        server
            .post("/api/user/projects")
            .authorization_bearer(&alice)
            .json(&json!({ "id": "p1", "name": "Marina Gate", "budget": 2 }))
            .await
            .assert_json(&json!({ "ok": true, "success": true, "projectId": "p1" }));

        let mine = server
            .get("/api/user/projects")
            .authorization_bearer(&alice)
            .await
            .json::<UserProjects>();
        assert_eq!(mine.projects.len(), 1);
        assert_eq!(mine.projects[0].extra.get("budget"), Some(&json!(2)));

        let theirs = server
            .get("/api/user/projects")
            .authorization_bearer(&bob)
            .await
            .json::<Value>();
        assert_eq!(theirs, json!({ "ok": true, "projects": [] }));
        Ok(())
    }

    #[tokio::test]
    async fn upsert_requires_id_and_name() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let token = bearer(&state, "user-1")?;
        let server = create_test_server_with_state(routes(), state).await?;

        let response = server
            .post("/api/user/projects")
            .authorization_bearer(token)
            .json(&json!({ "name": "No id" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["ok"], json!(false));
        Ok(())
    }
}
