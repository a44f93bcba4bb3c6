//! Saved project response types.

use serde::{Deserialize, Serialize};
use suite_store::UserProject;

/// Response of `GET /api/user/projects`.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProjects {
    pub ok: bool,
    pub projects: Vec<UserProject>,
}

impl UserProjects {
    pub fn new(projects: Vec<UserProject>) -> Self {
        Self { ok: true, projects }
    }
}

/// Response of the upsert and delete routes.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjectChanged {
    pub ok: bool,
    pub success: bool,
    pub project_id: String,
}

impl UserProjectChanged {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            ok: true,
            success: true,
            project_id: project_id.into(),
        }
    }
}
