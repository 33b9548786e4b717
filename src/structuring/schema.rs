//! Training document schema and validation of model output.

use crate::error::{KursError, Result};
use serde::{Deserialize, Serialize};

/// Longest excerpt of bad model output quoted in an error.
const EXCERPT_CHARS: usize = 300;

/// One step of a procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Step {
    pub step_number: i64,
    pub instruction: String,
    pub purpose: String,
    pub example: String,
}

/// The structured training document extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrainingDocument {
    pub title: String,
    pub objective: String,
    pub target_audience: String,
    pub key_concepts: Vec<String>,
    pub tools_mentioned: Vec<String>,
    pub step_by_step_instructions: Vec<Step>,
    pub important_notes: String,
}

impl TrainingDocument {
    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(KursError::Structuring("Title is empty".to_string()));
        }
        if self.step_by_step_instructions.is_empty() {
            return Err(KursError::Structuring(
                "StepByStepInstructions has no entries".to_string(),
            ));
        }
        for step in &self.step_by_step_instructions {
            if step.step_number < 1 {
                return Err(KursError::Structuring(format!(
                    "StepNumber must be positive, got {}",
                    step.step_number
                )));
            }
            if step.instruction.trim().is_empty() {
                return Err(KursError::Structuring(format!(
                    "step {} has an empty Instruction",
                    step.step_number
                )));
            }
        }
        Ok(())
    }
}

/// A validated training document together with its canonical JSON text.
///
/// `text` is what gets persisted and chunked; downstream stages treat it as
/// opaque text.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDocument {
    document: TrainingDocument,
    text: String,
}

impl StructuredDocument {
    /// Parse and validate model output.
    ///
    /// Models sometimes wrap the object in prose or a fenced code block, so
    /// the outermost `{...}` span is parsed.
    pub fn parse(raw: &str) -> Result<Self> {
        let json = extract_json_object(raw).ok_or_else(|| {
            KursError::Structuring(format!(
                "no JSON object in model output: {}",
                excerpt(raw)
            ))
        })?;

        let document: TrainingDocument = serde_json::from_str(json).map_err(|e| {
            KursError::Structuring(format!(
                "output does not match the document schema: {}. Output was: {}",
                e,
                excerpt(raw)
            ))
        })?;

        Self::from_document(document)
    }

    /// Validate an in-memory document and render its canonical text.
    pub fn from_document(document: TrainingDocument) -> Result<Self> {
        document.validate()?;
        let text = serde_json::to_string_pretty(&document)?;
        Ok(Self { document, text })
    }

    pub fn document(&self) -> &TrainingDocument {
        &self.document
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Slice out the outermost JSON object.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn excerpt(raw: &str) -> String {
    let mut out: String = raw.chars().take(EXCERPT_CHARS).collect();
    if raw.chars().count() > EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "Title": "Resetting a Password",
        "Objective": "Reset a locked account",
        "TargetAudience": "Support staff",
        "KeyConcepts": ["Identity verification"],
        "ToolsMentioned": ["Admin console"],
        "StepByStepInstructions": [
            {"StepNumber": 1, "Instruction": "Open the admin console", "Purpose": "Access accounts", "Example": "console.example.com"}
        ],
        "ImportantNotes": "Never read passwords aloud"
    }"#;

    /// `VALID` with one top-level field replaced, or removed when `value` is None.
    fn with_field(field: &str, value: Option<serde_json::Value>) -> String {
        let mut doc: serde_json::Value = serde_json::from_str(VALID).unwrap();
        let obj = doc.as_object_mut().unwrap();
        match value {
            Some(v) => obj.insert(field.to_string(), v),
            None => obj.remove(field),
        };
        doc.to_string()
    }

    /// `VALID` with one field of the first step replaced, or removed when `value` is None.
    fn with_step_field(field: &str, value: Option<serde_json::Value>) -> String {
        let mut doc: serde_json::Value = serde_json::from_str(VALID).unwrap();
        let step = doc["StepByStepInstructions"][0].as_object_mut().unwrap();
        match value {
            Some(v) => step.insert(field.to_string(), v),
            None => step.remove(field),
        };
        doc.to_string()
    }

    #[test]
    fn test_parse_valid_document() {
        let doc = StructuredDocument::parse(VALID).unwrap();
        assert_eq!(doc.document().title, "Resetting a Password");
        assert_eq!(doc.document().step_by_step_instructions.len(), 1);
        assert!(doc.text().contains("\"StepByStepInstructions\""));
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = format!("Here is the document:\n```json\n{}\n```\nLet me know!", VALID);
        let doc = StructuredDocument::parse(&raw).unwrap();
        assert_eq!(doc.document().tools_mentioned, vec!["Admin console"]);
    }

    #[test]
    fn test_canonical_text_round_trips() {
        let doc = StructuredDocument::parse(VALID).unwrap();
        let again = StructuredDocument::parse(doc.text()).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_missing_steps_rejected() {
        let raw = with_field("StepByStepInstructions", Some(serde_json::json!([])));
        let err = StructuredDocument::parse(&raw).unwrap_err();
        assert!(matches!(err, KursError::Structuring(_)));
    }

    #[test]
    fn test_empty_title_rejected() {
        let raw = with_field("Title", Some(serde_json::json!(" ")));
        let err = StructuredDocument::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("Title is empty"));
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let raw = with_field("KeyConcepts", Some(serde_json::json!("not a list")));
        let err = StructuredDocument::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("schema"));
    }

    #[test]
    fn test_missing_objective_rejected() {
        let err = StructuredDocument::parse(&with_field("Objective", None)).unwrap_err();
        assert!(matches!(err, KursError::Structuring(_)));
        assert!(err.to_string().contains("Objective"));
    }

    #[test]
    fn test_every_field_is_required() {
        for field in [
            "Title",
            "Objective",
            "TargetAudience",
            "KeyConcepts",
            "ToolsMentioned",
            "StepByStepInstructions",
            "ImportantNotes",
        ] {
            assert!(
                matches!(
                    StructuredDocument::parse(&with_field(field, None)),
                    Err(KursError::Structuring(_))
                ),
                "accepted a document without {}",
                field
            );
        }
        for field in ["StepNumber", "Instruction", "Purpose", "Example"] {
            assert!(
                StructuredDocument::parse(&with_step_field(field, None)).is_err(),
                "accepted a step without {}",
                field
            );
        }
    }

    #[test]
    fn test_empty_optional_content_accepted() {
        let mut raw = with_field("KeyConcepts", Some(serde_json::json!([])));
        raw = {
            let mut doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
            doc["Objective"] = serde_json::json!("");
            doc["StepByStepInstructions"][0]["Example"] = serde_json::json!("");
            doc.to_string()
        };
        let doc = StructuredDocument::parse(&raw).unwrap();
        assert!(doc.document().key_concepts.is_empty());
        assert!(doc.document().objective.is_empty());
    }

    #[test]
    fn test_truncated_json_rejected() {
        let raw = &VALID[..VALID.len() / 2];
        assert!(matches!(
            StructuredDocument::parse(raw),
            Err(KursError::Structuring(_))
        ));
    }

    #[test]
    fn test_prose_only_rejected() {
        let err = StructuredDocument::parse("I could not process this transcript.").unwrap_err();
        assert!(err.to_string().contains("no JSON object"));
    }

    #[test]
    fn test_non_positive_step_number_rejected() {
        let raw = with_step_field("StepNumber", Some(serde_json::json!(0)));
        let err = StructuredDocument::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("StepNumber must be positive"));
    }
}
