//! Extraction of JSON from raw completion text.

use serde_json::Value;

use crate::{Error, Result};

/// Opening and closing marker of a markdown code block.
const FENCE: &str = "```";

/// Parser for the JSON object embedded in a model response.
///
/// Every flow output is an object, so anything else is a failed generation.
/// The object may be bare, inside a markdown code block, or wrapped in prose.
pub struct JsonResponse;

impl JsonResponse {
    /// Returns the text spanning the outermost object of `response`, looking
    /// inside the first code block when there is one.
    pub fn extract(response: &str) -> &str {
        let body = code_block(response).unwrap_or(response);
        match (body.find('{'), body.rfind('}')) {
            (Some(start), Some(end)) if start < end => &body[start..=end],
            _ => body.trim(),
        }
    }

    /// Parses a response into a JSON object.
    ///
    /// Empty, unparsable or non-object output is a [`Error::GenerationFailed`].
    pub fn parse(response: &str) -> Result<Value> {
        let json = Self::extract(response);
        if json.is_empty() {
            return Err(Error::generation("model returned an empty response"));
        }

        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::generation(format!("model returned invalid JSON: {e}")))?;
        if !value.is_object() {
            return Err(Error::generation("model returned JSON that is not an object"));
        }
        Ok(value)
    }
}

/// Body of the first fenced code block; the info string line is skipped.
fn code_block(response: &str) -> Option<&str> {
    let (_, rest) = response.split_once(FENCE)?;
    let (_, rest) = rest.split_once('\n')?;
    let (body, _) = rest.split_once(FENCE)?;
    Some(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_plain_json() {
        assert_eq!(JsonResponse::parse(r#"{"key": "value"}"#).unwrap(), json!({"key": "value"}));
    }

    #[test]
    fn parse_fenced_json() {
        let response = "Here you go:\n```json\n{\"key\": 1}\n```\nEnjoy.";
        assert_eq!(JsonResponse::parse(response).unwrap(), json!({"key": 1}));

        let response = "```\n{\"key\": 2}\n```";
        assert_eq!(JsonResponse::parse(response).unwrap(), json!({"key": 2}));
    }

    #[test]
    fn parse_json_with_surrounding_text() {
        let response = "Sure! {\"headlines\": [\"a\"]} Hope this helps.";
        assert_eq!(JsonResponse::parse(response).unwrap(), json!({"headlines": ["a"]}));
    }

    #[test]
    fn single_line_fence_falls_back_to_braces() {
        let response = "```{\"key\": 3}```";
        assert_eq!(JsonResponse::parse(response).unwrap(), json!({"key": 3}));
    }

    #[test]
    fn non_objects_fail_generation() {
        assert!(matches!(
            JsonResponse::parse("```json\n[1, 2]\n```"),
            Err(Error::GenerationFailed(_))
        ));
        assert!(matches!(JsonResponse::parse("42"), Err(Error::GenerationFailed(_))));
    }

    #[test]
    fn empty_and_garbage_fail_generation() {
        assert!(matches!(JsonResponse::parse("   "), Err(Error::GenerationFailed(_))));
        assert!(matches!(
            JsonResponse::parse("no json here"),
            Err(Error::GenerationFailed(_))
        ));
    }
}
