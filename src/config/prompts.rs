//! Prompt templates for Kurs.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub structuring: StructuringPrompts,
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for transcript-to-document structuring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuringPrompts {
    pub system: String,
    pub user: String,
}

impl Default for StructuringPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an assistant that turns subject-matter-expert recordings into structured training content.

Convert the transcript you are given into a clean learning document that can be used to train employees.
Be precise, instructional, and clear. Use a professional tone suitable for an internal corporate learning platform.

Respond with a single JSON object and nothing else. It must have exactly these fields:

{
  "Title": "",
  "Objective": "",
  "TargetAudience": "",
  "KeyConcepts": ["", ""],
  "ToolsMentioned": ["", ""],
  "StepByStepInstructions": [
    {"StepNumber": 1, "Instruction": "", "Purpose": "", "Example": ""}
  ],
  "ImportantNotes": ""
}

Rules:
- "Title" must not be empty
- Include at least one entry in "StepByStepInstructions", numbered from 1
- Use empty arrays when no concepts or tools are mentioned
- Never invent facts that are not supported by the transcript"#
                .to_string(),

            user: r#"Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

/// Prompts for RAG response generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful assistant that answers questions about a training document.

Guidelines:
- Answer using only the provided excerpts from the document
- If the excerpts don't contain the answer, say so clearly
- Refer to step numbers when the answer involves a procedure
- Be concise but complete"#
                .to_string(),

            user: r#"Excerpts from the training document:

{{context}}

Question: {{question}}

Answer the question based on the excerpts above."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let structuring_path = custom_path.join("structuring.toml");
            if structuring_path.exists() {
                let content = std::fs::read_to_string(&structuring_path)?;
                prompts.structuring = toml::from_str(&content)?;
            }

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are substituted in one left-to-right pass. Substituted
    /// values are never scanned again, and unknown placeholders are kept as is.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                break;
            };
            result.push_str(&rest[..open]);
            match vars.get(&after[..close]) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[open..open + close + 4]),
            }
            rest = &after[close + 2..];
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.structuring.system.contains("StepByStepInstructions"));
        assert!(prompts.structuring.user.contains("{{transcript}}"));
        assert!(prompts.rag.user.contains("{{context}}"));
        assert!(prompts.rag.user.contains("{{question}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut prompts = Prompts::default();
        prompts.variables.insert("team".to_string(), "Support".to_string());
        prompts.variables.insert("question".to_string(), "ignored".to_string());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "How do I reset a password?".to_string());

        let rendered = prompts.render_with_custom("{{team}}: {{question}}", &vars);
        assert_eq!(rendered, "Support: How do I reset a password?");
    }

    #[test]
    fn test_load_custom_rag_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "system = \"Answer tersely.\"\nuser = \"{{context}} / {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.rag.system, "Answer tersely.");
        assert!(prompts.structuring.system.contains("JSON"));
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let template = "Context:\n{{context}}\n\nQuestion: {{question}}";
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "what is {{context}}?".to_string());
        vars.insert("context".to_string(), "notes about {{question}}".to_string());

        let expected = "Context:\nnotes about {{question}}\n\nQuestion: what is {{context}}?";
        for _ in 0..8 {
            assert_eq!(Prompts::render(template, &vars), expected);
        }
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_kept() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Ada".to_string());

        assert_eq!(
            Prompts::render("{{name}} {{missing}} {{name", &vars),
            "Ada {{missing}} {{name"
        );
    }
}
