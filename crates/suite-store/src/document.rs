//! Schemaless documents and merge semantics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Top-level fields of a document.
pub type Fields = Map<String, Value>;

/// A document addressed by its id within a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id, unique within its collection.
    pub id: String,
    /// Document fields.
    pub fields: Fields,
}

impl Document {
    /// Creates a new document.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Serializes `value` into a document. `value` must serialize to an object.
    pub fn from_serialize<T: Serialize>(id: impl Into<String>, value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self::new(id, fields)),
            other => Err(Error::unexpected(format!(
                "document must be a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    /// Deserializes the fields into `T`.
    pub fn deserialize<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

/// Merges `incoming` into `existing`.
///
/// Keys absent from `incoming` are preserved. Nested objects are merged
/// recursively; every other value (arrays included) is replaced.
pub fn merge_fields(existing: &mut Fields, incoming: Fields) {
    for (key, value) in incoming {
        match (existing.get_mut(&key), value) {
            (Some(Value::Object(current)), Value::Object(update)) => merge_fields(current, update),
            (_, value) => {
                existing.insert(key, value);
            }
        }
    }
}

/// Checks that a document id or path segment is addressable.
pub(crate) fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() || segment.contains('/') || segment == "." || segment == ".." {
        return Err(Error::invalid_path(segment));
    }
    Ok(())
}

/// Checks that a collection path has an odd number of non-empty segments.
pub(crate) fn validate_collection(path: &str) -> Result<()> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() % 2 == 0 {
        return Err(Error::invalid_path(path));
    }
    segments.into_iter().try_for_each(validate_segment)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn merge_preserves_absent_keys() {
        let mut existing = fields(json!({"name": "Palm", "area": "JVC", "tags": ["a"]}));
        merge_fields(&mut existing, fields(json!({"name": "Palm Views", "tags": ["b"]})));

        assert_eq!(
            Value::Object(existing),
            json!({"name": "Palm Views", "area": "JVC", "tags": ["b"]})
        );
    }

    #[test]
    fn merge_recurses_into_objects() {
        let mut existing = fields(json!({"meta": {"a": 1, "b": 2}}));
        merge_fields(&mut existing, fields(json!({"meta": {"b": 3}})));

        assert_eq!(Value::Object(existing), json!({"meta": {"a": 1, "b": 3}}));
    }

    #[test]
    fn collection_paths() {
        assert!(validate_collection("projects_catalog").is_ok());
        assert!(validate_collection("users/u1/projects").is_ok());
        assert!(validate_collection("users/u1").is_err());
        assert!(validate_collection("users//projects").is_err());
        assert!(validate_segment("a/b").is_err());
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(Document::from_serialize("x", &vec![1, 2]).is_err());
    }
}
