//! Firestore REST backend.
//!
//! Uses the v1 REST surface: `GET` for reads, `DELETE` for removals and
//! `documents:commit` for writes. A commit is atomic, which gives batch
//! merge-upserts all-or-nothing visibility. Merge semantics are expressed
//! through an `updateMask` listing every written leaf field, so nested
//! objects are merged the same way [`merge_fields`] merges them.
//!
//! [`merge_fields`]: crate::document::merge_fields

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::document::{validate_collection, validate_segment};
use crate::{Document, DocumentStore, Error, Fields, Result, TRACING_TARGET_STORE};

/// Default Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Page size used when listing collections.
const LIST_PAGE_SIZE: usize = 300;

/// Firestore rejects commits with more writes than this.
const MAX_WRITES_PER_COMMIT: usize = 500;

/// Connection settings for [`FirestoreStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Database id, usually `(default)`.
    pub database_id: String,
    /// OAuth2 access token sent as a bearer token.
    pub access_token: Option<String>,
    /// REST endpoint, overridable for the emulator.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl FirestoreConfig {
    /// Creates a configuration for the given project and the default database.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: "(default)".to_owned(),
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the REST endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resource name of the database's document root.
    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }
}

/// Firestore-backed [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    http: Client,
    config: FirestoreConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

impl FirestoreStore {
    /// Creates a new store with its own HTTP client.
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::config("Firestore project id cannot be empty"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("suite-store/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.documents_root(),
            path
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::backend(status.as_u16(), message))
    }

    async fn commit(&self, collection: &str, documents: &[Document]) -> Result<()> {
        let root = self.config.documents_root();
        let writes: Vec<Value> = documents
            .iter()
            .map(|document| {
                json!({
                    "update": {
                        "name": format!("{root}/{collection}/{}", document.id),
                        "fields": encode_fields(&document.fields),
                    },
                    "updateMask": {
                        "fieldPaths": update_mask(&document.fields),
                    },
                })
            })
            .collect();

        let url = format!(
            "{}/{}:commit",
            self.config.base_url.trim_end_matches('/'),
            root
        );
        let request = self.authorize(self.http.post(url)).json(&json!({ "writes": writes }));
        Self::check(request.send().await?).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        validate_collection(collection)?;
        validate_segment(id)?;

        let request = self.authorize(self.http.get(self.url(&format!("{collection}/{id}"))));
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let raw: RawDocument = Self::check(response).await?.json().await?;
        Ok(Some(Document::new(id, decode_fields(raw.fields)?)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        validate_collection(collection)?;

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.url(collection))
                .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = self.authorize(request).send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                break;
            }

            let page: ListResponse = Self::check(response).await?.json().await?;
            for raw in page.documents {
                let id = raw
                    .name
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_owned();
                documents.push(Document::new(id, decode_fields(raw.fields)?));
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(documents)
    }

    async fn upsert_merge(&self, collection: &str, document: Document) -> Result<()> {
        validate_collection(collection)?;
        validate_segment(&document.id)?;
        self.commit(collection, std::slice::from_ref(&document)).await
    }

    async fn batch_upsert_merge(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize> {
        validate_collection(collection)?;
        documents
            .iter()
            .try_for_each(|document| validate_segment(&document.id))?;

        if documents.is_empty() {
            return Ok(0);
        }

        if documents.len() > MAX_WRITES_PER_COMMIT {
            return Err(Error::config(format!(
                "batch of {} documents exceeds the commit limit of {MAX_WRITES_PER_COMMIT}",
                documents.len()
            )));
        }

        self.commit(collection, &documents).await?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            collection = collection,
            count = documents.len(),
            "firestore batch committed"
        );

        Ok(documents.len())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        validate_collection(collection)?;
        validate_segment(id)?;

        let request = self.authorize(self.http.delete(self.url(&format!("{collection}/{id}"))));
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Self::check(response).await?;
        Ok(())
    }
}

/// Quotes a field path segment when it is not a simple identifier.
fn quote_field_path(key: &str) -> String {
    let simple = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        key.to_owned()
    } else {
        format!("`{}`", key.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Field paths written by a merge of `fields`.
///
/// Non-empty objects contribute the paths of their children, so sibling
/// fields already stored under them survive. Any other value, an empty
/// object included, replaces the stored value at its own path.
fn update_mask(fields: &Fields) -> Vec<String> {
    let mut paths = Vec::new();
    collect_field_paths(fields, None, &mut paths);
    paths
}

fn collect_field_paths(fields: &Fields, parent: Option<&str>, paths: &mut Vec<String>) {
    for (key, value) in fields {
        let path = match parent {
            Some(parent) => format!("{parent}.{}", quote_field_path(key)),
            None => quote_field_path(key),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => {
                collect_field_paths(nested, Some(&path), paths);
            }
            _ => paths.push(path),
        }
    }
}

fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Encodes a JSON value as a Firestore typed value.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

fn decode_fields(fields: Map<String, Value>) -> Result<Fields> {
    fields
        .into_iter()
        .map(|(k, v)| decode_value(v).map(|v| (k, v)))
        .collect()
}

/// Decodes a Firestore typed value into plain JSON.
fn decode_value(value: Value) -> Result<Value> {
    let Value::Object(mut typed) = value else {
        return Err(Error::unexpected("Firestore value must be an object"));
    };

    let Some((kind, inner)) = typed.iter_mut().next().map(|(k, v)| (k.clone(), v.take())) else {
        return Err(Error::unexpected("Firestore value has no type"));
    };

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "referenceValue"
        | "bytesValue" => inner,
        "integerValue" => match &inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| Error::unexpected(format!("invalid integerValue '{s}'")))?,
            _ => inner,
        },
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            Value::Array(values.into_iter().map(decode_value).collect::<Result<_>>()?)
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Value::Object(decode_fields(fields)?)
        }
        "geoPointValue" => inner,
        other => return Err(Error::unexpected(format!("unsupported Firestore type '{other}'"))),
    };

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_round_trip() {
        let original = json!({
            "name": "Sobha Hartland",
            "priceFrom": 1250000,
            "yield": 6.5,
            "offplan": true,
            "handover": null,
            "tags": ["waterfront", "villa"],
            "location": {"city": "Dubai", "country": "AE"},
        });
        let Value::Object(fields) = original.clone() else {
            unreachable!()
        };

        let encoded = encode_fields(&fields);
        assert_eq!(encoded["priceFrom"], json!({"integerValue": "1250000"}));
        assert_eq!(encoded["location"]["mapValue"]["fields"]["city"], json!({"stringValue": "Dubai"}));

        let Value::Object(encoded) = encoded else {
            unreachable!()
        };
        let decoded = decode_fields(encoded).unwrap();
        assert_eq!(Value::Object(decoded), original);
    }

    #[test]
    fn field_paths_are_quoted_when_needed() {
        assert_eq!(quote_field_path("priceFrom"), "priceFrom");
        assert_eq!(quote_field_path("unit-types"), "`unit-types`");
        assert_eq!(quote_field_path("1st"), "`1st`");
    }

    #[test]
    fn update_mask_reaches_nested_leaves() {
        let Value::Object(fields) = json!({
            "name": "Creek Vista",
            "location": {"city": "Dubai", "geo": {"lat": 25.2}},
            "unit-types": {"2br": 3},
            "tags": ["waterfront"],
            "extras": {},
        }) else {
            unreachable!()
        };

        let mut mask = update_mask(&fields);
        mask.sort();
        assert_eq!(
            mask,
            [
                "`unit-types`.`2br`",
                "extras",
                "location.city",
                "location.geo.lat",
                "name",
                "tags",
            ]
        );
    }

    #[test]
    fn empty_project_id_is_rejected() {
        assert!(FirestoreStore::new(FirestoreConfig::new("  ")).is_err());
    }

    #[test]
    fn urls_include_database_root() {
        let store = FirestoreStore::new(
            FirestoreConfig::new("demo").with_base_url("http://localhost:8080/v1/"),
        )
        .unwrap();
        assert_eq!(
            store.url("projects_catalog/a"),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents/projects_catalog/a"
        );
    }
}
