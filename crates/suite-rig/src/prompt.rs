//! Prompt rendering for flows.

use std::fmt::{Display, Write};

use schemars::JsonSchema;
use suite_core::DataUri;

use crate::schema::schema_value;
use crate::{Result, TRACING_TARGET_FLOW};

/// Output contract appended to every generative prompt.
const PROMPT_OUTPUT_CONTRACT: &str = "\
Respond with a single JSON object that conforms to this JSON Schema.
Only output valid JSON, no explanation or markdown formatting.";

/// A rendered prompt: the text and the files it refers to.
///
/// The text only carries numbered labels such as `[Document 1 (application/pdf)]`;
/// the payloads travel as separate message parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    attachments: Vec<DataUri>,
}

impl Prompt {
    /// Creates a text-only prompt.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// Returns the prompt text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the attachments, in label order.
    #[inline]
    pub fn attachments(&self) -> &[DataUri] {
        &self.attachments
    }
}

/// Builds a prompt from an instruction and the input fields of a flow.
///
/// Blank optional values and empty lists are left out entirely.
#[derive(Debug)]
pub(crate) struct PromptBuilder {
    text: String,
    attachments: Vec<DataUri>,
}

impl PromptBuilder {
    /// Starts a prompt with the task instruction.
    pub fn new(instruction: &str) -> Self {
        let mut text = String::with_capacity(1024);
        text.push_str(instruction.trim());
        text.push_str("\n\n");
        Self {
            text,
            attachments: Vec::new(),
        }
    }

    /// Adds a `Label: value` line.
    pub fn field(mut self, label: &str, value: impl Display) -> Self {
        let _ = writeln!(self.text, "{label}: {value}");
        self
    }

    /// Adds a `Label: value` line when `value` is present and not blank.
    pub fn optional(self, label: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.field(label, value),
            None => self,
        }
    }

    /// Adds a bulleted list when `items` is not empty.
    pub fn list(mut self, label: &str, items: &[String]) -> Self {
        if items.is_empty() {
            return self;
        }

        let _ = writeln!(self.text, "{label}:");
        for item in items {
            let _ = writeln!(self.text, "- {item}");
        }
        self
    }

    /// Adds a headed section when `body` is present and not blank.
    pub fn section(mut self, heading: &str, body: Option<&str>) -> Self {
        if let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) {
            let _ = write!(self.text, "\n## {heading}\n{body}\n");
        }
        self
    }

    /// Labels data URI attachments with a 1-based index and queues their
    /// payloads. Inputs are validated before rendering, so a URI that still
    /// fails to parse is logged and left out.
    pub fn attachments<'a>(
        mut self,
        label: &str,
        uris: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        for uri in uris {
            let data_uri = match DataUri::parse(uri) {
                Ok(data_uri) => data_uri,
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET_FLOW,
                        label,
                        error = %error,
                        "dropping unparsable attachment"
                    );
                    continue;
                }
            };

            let index = self.attachments.len() + 1;
            let _ = write!(self.text, "\n[{label} {index} ({})]\n", data_uri.mime_type());
            self.attachments.push(data_uri);
        }
        self
    }

    /// Appends the output contract with the schema of `T`.
    pub fn output_schema<T: JsonSchema>(mut self) -> Result<Self> {
        let schema = serde_json::to_string_pretty(&schema_value::<T>()?)?;
        let _ = write!(self.text, "\n{PROMPT_OUTPUT_CONTRACT}\n\nSchema:\n{schema}\n");
        Ok(self)
    }

    /// Returns the rendered prompt.
    pub fn build(self) -> Prompt {
        Prompt {
            text: self.text,
            attachments: self.attachments,
        }
    }
}

#[cfg(test)]
mod tests {
    use schemars::JsonSchema;

    use super::*;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Answer {
        text: String,
    }

    const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";
    const PDF: &str = "data:application/pdf;base64,JVBERi0xLjQ=";

    #[test]
    fn blank_optional_parts_are_omitted() {
        let prompt = PromptBuilder::new("Write an ad.")
            .field("Project", "Creek Vista")
            .optional("Tone", Some("  "))
            .optional("Audience", None)
            .list("Highlights", &[])
            .section("Deep edit instructions", None)
            .build();

        assert_eq!(prompt.text(), "Write an ad.\n\nProject: Creek Vista\n");
        assert!(prompt.attachments().is_empty());
    }

    #[test]
    fn sections_and_lists_render_when_present() {
        let prompt = PromptBuilder::new("Edit.")
            .list("Highlights", &["Pool".to_owned(), "Gym".to_owned()])
            .section("Deep edit instructions", Some("Rewrite page 2"))
            .build();

        assert!(prompt.text().contains("Highlights:\n- Pool\n- Gym\n"));
        assert!(prompt.text().contains("## Deep edit instructions\nRewrite page 2"));
    }

    #[test]
    fn attachments_are_labelled_not_inlined() {
        let uris = [PNG.to_owned(), PDF.to_owned()];
        let prompt = PromptBuilder::new("Describe.")
            .attachments("Attachment", &uris)
            .build();

        assert!(prompt.text().contains("[Attachment 1 (image/png)]"));
        assert!(prompt.text().contains("[Attachment 2 (application/pdf)]"));
        assert!(!prompt.text().contains("Attachment 0"));
        assert!(!prompt.text().contains("base64,"));

        let mimes: Vec<_> = prompt.attachments().iter().map(DataUri::mime_type).collect();
        assert_eq!(mimes, ["image/png", "application/pdf"]);
    }

    #[test]
    fn unparsable_attachments_keep_numbering_dense() {
        let uris = ["not a data uri".to_owned(), PDF.to_owned()];
        let prompt = PromptBuilder::new("Describe.")
            .attachments("Attachment", &uris)
            .build();

        assert!(prompt.text().contains("[Attachment 1 (application/pdf)]"));
        assert_eq!(prompt.attachments().len(), 1);
    }

    #[test]
    fn output_schema_is_embedded() {
        let prompt = PromptBuilder::new("Answer.")
            .output_schema::<Answer>()
            .unwrap()
            .build();
        assert!(prompt.text().contains("Schema:"));
        assert!(prompt.text().contains("\"text\""));
    }
}
