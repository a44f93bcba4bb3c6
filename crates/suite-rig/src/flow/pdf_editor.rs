//! `pdf-editor`: proposes text edits to a PDF brochure.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Flow, FlowContext};
use crate::prompt::{Prompt, PromptBuilder};
use crate::schema::constraint;
use crate::{Result, ToolId};

const PREAMBLE: &str = "\
You are an editor for real-estate sales collateral.
You only propose edits that the instructions ask for and quote the original text exactly.";

const PROMPT_PDF_EDITOR: &str = "\
Review the attached PDF and apply the edit instructions. Summarize the changes
and list every edit with its page number when known, the original text and the revision.";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PdfEditorInput {
    /// The document as an `application/pdf` data URI.
    #[validate(custom(function = "constraint::pdf_data_uri"))]
    pub document_data_uri: String,
    #[validate(length(min = 1))]
    pub edit_instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_edit_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PdfEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    pub original: String,
    pub revised: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PdfEditorOutput {
    #[validate(length(min = 1))]
    pub summary: String,
    #[serde(default)]
    #[validate(nested)]
    pub edits: Vec<PdfEdit>,
}

/// PDF edit proposer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfEditor;

impl PdfEditor {
    fn prompt(input: &PdfEditorInput) -> Result<Prompt> {
        Ok(PromptBuilder::new(PROMPT_PDF_EDITOR)
            .field("Edit instructions", &input.edit_instructions)
            .section(
                "Deep edit instructions",
                input.deep_edit_instructions.as_deref(),
            )
            .attachments("Document", [&input.document_data_uri])
            .output_schema::<PdfEditorOutput>()?
            .build())
    }

    fn offline(input: &PdfEditorInput) -> PdfEditorOutput {
        PdfEditorOutput {
            summary: format!(
                "No model configured; requested changes were not applied: {}",
                input.edit_instructions.trim()
            ),
            edits: Vec::new(),
        }
    }
}

impl Flow for PdfEditor {
    const ID: ToolId = ToolId::PdfEditor;
    const TITLE: &'static str = "PDF Editor";
    const DESCRIPTION: &'static str = "Proposes page-level text edits to a PDF brochure.";

    type Input = PdfEditorInput;
    type Output = PdfEditorOutput;

    async fn run(&self, ctx: &FlowContext, input: PdfEditorInput) -> Result<PdfEditorOutput> {
        let prompt = Self::prompt(&input)?;
        ctx.generate(Self::ID, PREAMBLE, prompt, || Self::offline(&input))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use suite_core::DataUri;

    use super::*;
    use crate::ScriptedBackend;
    use crate::flow::test_support::{self, PDF};

    fn input(deep: Option<&str>) -> PdfEditorInput {
        PdfEditorInput {
            document_data_uri: PDF.into(),
            edit_instructions: "Update the handover date".into(),
            deep_edit_instructions: deep.map(str::to_owned),
        }
    }

    #[test]
    fn deep_edit_section_is_conditional() {
        let with = PdfEditor::prompt(&input(Some("Also fix the floor plans"))).unwrap();
        assert!(with.text().contains("## Deep edit instructions\nAlso fix the floor plans"));

        let without = PdfEditor::prompt(&input(None)).unwrap();
        assert!(!without.text().contains("Deep edit instructions"));
        assert!(without.text().contains("[Document 1 (application/pdf)]"));
    }

    #[tokio::test]
    async fn edits_are_decoded() -> anyhow::Result<()> {
        let backend = Arc::new(ScriptedBackend::new([r#"{
            "summary": "Handover moved",
            "edits": [{"page": 2, "original": "Q4 2025", "revised": "Q2 2026"}]
        }"#]));

        let output = PdfEditor
            .run(&test_support::scripted(&backend), input(None))
            .await?;
        assert_eq!(output.edits[0].page, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn document_is_sent_as_attachment() -> anyhow::Result<()> {
        let backend = Arc::new(ScriptedBackend::new([
            r#"{"summary": "Handover moved", "edits": []}"#,
        ]));

        PdfEditor
            .run(&test_support::scripted(&backend), input(None))
            .await?;

        let prompts = backend.prompts().await;
        assert!(prompts[0].contains("[Document 1 (application/pdf)]"));
        assert!(!prompts[0].contains(PDF));
        assert_eq!(backend.attachments().await, [vec![DataUri::parse(PDF)?]]);
        Ok(())
    }
}
