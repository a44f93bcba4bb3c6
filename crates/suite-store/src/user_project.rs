//! Per-user saved projects.

use serde::{Deserialize, Serialize};

use crate::document::validate_segment;
use crate::{Document, Fields, Result, StoreClient, TRACING_TARGET_REPOSITORY};

/// Returns the collection path holding the projects of `uid`.
pub fn user_projects_collection(uid: &str) -> Result<String> {
    validate_segment(uid)?;
    Ok(format!("users/{uid}/projects"))
}

/// A project snapshot saved by a user.
///
/// Only `id` and `name` are interpreted; every other field is stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProject {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl UserProject {
    /// Creates a project with no extra fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Fields::new(),
        }
    }
}

/// Repository over `users/{uid}/projects`.
///
/// Every operation is scoped to the given `uid`; nothing crosses namespaces.
#[derive(Debug, Clone)]
pub struct UserProjectRepository {
    store: StoreClient,
}

impl UserProjectRepository {
    /// Creates a repository over `store`.
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Lists the projects of `uid`.
    pub async fn list(&self, uid: &str) -> Result<Vec<UserProject>> {
        let collection = user_projects_collection(uid)?;
        self.store
            .list(&collection)
            .await?
            .iter()
            .map(Document::deserialize)
            .collect()
    }

    /// Merge-upserts `project` under its own id.
    pub async fn upsert(&self, uid: &str, project: &UserProject) -> Result<()> {
        let collection = user_projects_collection(uid)?;
        let document = Document::from_serialize(project.id.clone(), project)?;
        self.store.upsert_merge(&collection, document).await?;

        tracing::debug!(
            target: TRACING_TARGET_REPOSITORY,
            project_id = %project.id,
            "user project saved"
        );
        Ok(())
    }

    /// Removes a project. Removing a missing project succeeds.
    pub async fn delete(&self, uid: &str, project_id: &str) -> Result<()> {
        let collection = user_projects_collection(uid)?;
        self.store.delete(&collection, project_id).await?;

        tracing::debug!(
            target: TRACING_TARGET_REPOSITORY,
            project_id = %project_id,
            "user project deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn projects_are_isolated_per_user() -> anyhow::Result<()> {
        let repository = UserProjectRepository::new(StoreClient::memory());

        repository.upsert("alice", &UserProject::new("p1", "Marina")).await?;
        repository.upsert("bob", &UserProject::new("p2", "Hills")).await?;
        repository.delete("alice", "p2").await?;

        let alice = repository.list("alice").await?;
        let bob = repository.list("bob").await?;
        assert_eq!(alice, [UserProject::new("p1", "Marina")]);
        assert_eq!(bob, [UserProject::new("p2", "Hills")]);
        Ok(())
    }

    #[tokio::test]
    async fn upsert_merges_extra_fields() -> anyhow::Result<()> {
        let repository = UserProjectRepository::new(StoreClient::memory());

        let mut first = UserProject::new("p1", "Marina");
        first.extra.insert("budget".into(), json!(100));
        repository.upsert("alice", &first).await?;

        let mut second = UserProject::new("p1", "Marina Gate");
        second.extra.insert("notes".into(), json!("call back"));
        repository.upsert("alice", &second).await?;

        let saved = repository.list("alice").await?;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Marina Gate");
        assert_eq!(saved[0].extra.get("budget"), Some(&json!(100)));
        assert_eq!(saved[0].extra.get("notes"), Some(&json!("call back")));
        Ok(())
    }

    #[test]
    fn uid_must_be_a_single_segment() {
        assert!(user_projects_collection("a/b").is_err());
        assert_eq!(user_projects_collection("u1").unwrap(), "users/u1/projects");
    }
}
