//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use suite_server::handler::routes;
//! use suite_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&ServiceConfig::default())?;
//! let app: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod catalog;
mod error;
mod monitors;
mod publish;
pub mod request;
pub mod response;
mod tools;
mod user_projects;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and a not-found fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(tools::routes())
        .merge(catalog::routes())
        .merge(user_projects::routes())
        .merge(publish::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use axum::Router;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use jiff::SignedDuration;
    use serde_json::json;

    use crate::extract::AuthClaims;
    use crate::handler::routes;
    use crate::service::{AuthConfig, AuthKeys, ServiceConfig, ServiceState};

    /// Identity secret shared by the test state and minted tokens.
    pub const TEST_SECRET: &str = "test-identity-secret";

    /// Returns an offline, in-memory state that verifies [`TEST_SECRET`].
    pub fn create_test_state() -> anyhow::Result<ServiceState> {
        let config = ServiceConfig {
            auth: AuthConfig::with_secret(TEST_SECRET),
            ..ServiceConfig::default()
        };
        Ok(ServiceState::from_config(&config)?)
    }

    /// Mints a bearer token for `uid` accepted by `state`.
    pub fn bearer(state: &ServiceState, uid: &str) -> anyhow::Result<String> {
        use axum::extract::FromRef;

        let keys = AuthKeys::from_ref(state);
        Ok(keys.encode(&AuthClaims::new(uid, SignedDuration::from_mins(10)))?)
    }

    /// Returns a new [`TestServer`] with the given router.
    pub async fn create_test_server_with_router(
        router: impl Fn(ServiceState) -> Router<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let state = create_test_state()?;
        let router = router(state.clone());
        create_test_server_with_state(router, state).await
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub async fn create_test_server_with_state(
        router: Router<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app = router.with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        let state = create_test_state()?;
        create_test_server_with_state(routes(), state).await
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_use_the_envelope() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/api/nothing-here").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "ok": false, "error": "Not found" }));
        Ok(())
    }
}
