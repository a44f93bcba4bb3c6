//! Saved project request types.

use serde::{Deserialize, Serialize};
use suite_store::{Fields, UserProject};

use crate::handler::{ErrorKind, Result};

/// Body of `POST /api/user/projects`.
///
/// `id` and `name` are optional here so that a missing field is reported as
/// a bad request rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertUserProject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl UpsertUserProject {
    /// Checks the required fields and returns the project to store.
    pub fn into_project(self) -> Result<UserProject> {
        let id = self.id.filter(|id| !id.trim().is_empty());
        let name = self.name.filter(|name| !name.trim().is_empty());

        match (id, name) {
            (Some(id), Some(name)) => Ok(UserProject {
                id,
                name,
                extra: self.extra,
            }),
            _ => Err(ErrorKind::BadRequest.with_message("Project must have a non-empty id and name")),
        }
    }
}

/// Query string of `DELETE /api/user/projects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserProject {
    pub project_id: Option<String>,
}

impl DeleteUserProject {
    /// Returns the non-empty project id.
    pub fn project_id(&self) -> Result<&str> {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ErrorKind::BadRequest.with_message("Missing projectId query parameter"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn id_and_name_are_required() {
        let request: UpsertUserProject = serde_json::from_value(json!({ "name": "Marina" })).unwrap();
        assert!(request.into_project().is_err());

        let request: UpsertUserProject =
            serde_json::from_value(json!({ "id": "p1", "name": "  " })).unwrap();
        assert!(request.into_project().is_err());
    }

    #[test]
    fn extra_fields_are_kept() {
        let request: UpsertUserProject =
            serde_json::from_value(json!({ "id": "p1", "name": "Marina", "budget": 3 })).unwrap();
        let project = request.into_project().unwrap();
        assert_eq!(project.id, "p1");
        assert_eq!(project.extra.get("budget"), Some(&json!(3)));
    }

    #[test]
    fn delete_requires_project_id() {
        assert!(DeleteUserProject::default().project_id().is_err());
        let request = DeleteUserProject {
            project_id: Some("p1".into()),
        };
        assert_eq!(request.project_id().unwrap(), "p1");
    }
}
