//! Transcript-to-document structuring via a generative model.

use super::StructuredDocument;
use crate::config::{Prompts, StructuringSettings};
use crate::error::{KursError, Result};
use crate::llm::{GenerationRequest, Generator};
use crate::transcription::Transcript;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Schema extraction always samples greedily.
const STRUCTURING_TEMPERATURE: f32 = 0.0;

/// Reshapes a transcript into a validated [`StructuredDocument`].
///
/// One generation call per transcript, no automatic retries beyond the
/// generator's own policy. Malformed or truncated output fails with
/// [`KursError::Structuring`] rather than reaching the index.
pub struct StructuringEngine {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    max_output_tokens: u32,
}

impl StructuringEngine {
    pub fn new(generator: Arc<dyn Generator>, settings: &StructuringSettings) -> Self {
        Self {
            generator,
            prompts: Prompts::default(),
            max_output_tokens: settings.max_output_tokens,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn build_request(&self, transcript: &Transcript) -> GenerationRequest {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.text().to_string());

        GenerationRequest {
            system: Some(
                self.prompts
                    .render_with_custom(&self.prompts.structuring.system, &HashMap::new()),
            ),
            prompt: self
                .prompts
                .render_with_custom(&self.prompts.structuring.user, &vars),
            max_tokens: self.max_output_tokens,
            temperature: STRUCTURING_TEMPERATURE,
        }
    }

    /// Produce a structured document from a transcript.
    #[instrument(skip(self, transcript), fields(model = %self.generator.model(), transcript_chars = transcript.len()))]
    pub async fn structure(&self, transcript: &Transcript) -> Result<StructuredDocument> {
        let request = self.build_request(transcript);

        let generation = self
            .generator
            .generate(&request)
            .await
            .map_err(|e| KursError::Structuring(format!("model call failed: {}", e)))?;

        if generation.truncated {
            warn!(
                "Structured output hit the {} token budget",
                self.max_output_tokens
            );
            return Err(KursError::Structuring(format!(
                "model output was cut off at the {} token budget; raise structuring.max_output_tokens",
                self.max_output_tokens
            )));
        }

        let document = StructuredDocument::parse(&generation.text)?;
        info!(
            "Structured document '{}' with {} steps",
            document.document().title,
            document.document().step_by_step_instructions.len()
        );
        Ok(document)
    }
}
