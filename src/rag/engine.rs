//! Question answering over an indexed training document.

use super::context::build_context;
use crate::config::{Prompts, RagSettings};
use crate::embedding::Embedder;
use crate::error::{KursError, QueryError, QueryStage, Result};
use crate::index::{ScoredChunk, VectorIndex};
use crate::llm::{GenerationRequest, Generator};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

type QueryResult<T> = std::result::Result<T, QueryError>;

/// Answer to one question, with the excerpts it was grounded on.
#[derive(Debug, Clone)]
pub struct RagResponse {
    pub answer: String,
    /// Chunks sent to the model, highest similarity first.
    pub sources: Vec<ScoredChunk>,
    /// Retrieved chunks left out of the context to stay within budget.
    pub dropped: usize,
    /// The model stopped at its output token budget.
    pub truncated: bool,
}

impl RagResponse {
    /// Format the response for terminal display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.trim().to_string();

        if self.truncated {
            output.push_str("\n\n(answer cut off at the output token limit)");
        }

        if !self.sources.is_empty() {
            let refs: Vec<String> = self
                .sources
                .iter()
                .map(|s| format!("excerpt {} ({:.2})", s.chunk.index + 1, s.score))
                .collect();
            output.push_str(&format!("\n\nSources: {}", refs.join(", ")));
        }

        output
    }
}

/// RAG engine for question answering.
///
/// Owns a read-only handle to the index and the same embedder that built it.
pub struct RagEngine {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    top_k: usize,
    temperature: f32,
    max_output_tokens: u32,
    max_context_chars: usize,
    prompts: Prompts,
}

impl RagEngine {
    /// Create a new RAG engine.
    ///
    /// Fails if the embedder does not produce vectors in the index's space.
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        settings: &RagSettings,
    ) -> Result<Self> {
        let space = embedder.space();
        if &space != index.space() {
            return Err(KursError::Config(format!(
                "query embedder uses {} but the index was built with {}",
                space,
                index.space()
            )));
        }

        Ok(Self {
            index,
            embedder,
            generator,
            top_k: settings.top_k,
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            max_context_chars: settings.max_context_chars,
            prompts: Prompts::default(),
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Answer a question using the configured number of excerpts.
    pub async fn answer(&self, question: &str) -> QueryResult<RagResponse> {
        self.answer_with_k(question, self.top_k).await
    }

    /// Answer a question grounded on the `k` most similar chunks.
    #[instrument(skip(self))]
    pub async fn answer_with_k(&self, question: &str, k: usize) -> QueryResult<RagResponse> {
        info!("Processing question");

        let query_vector = self
            .embedder
            .embed_query(question)
            .await
            .map_err(|e| QueryError::new(QueryStage::Embedding, e))?;

        let ranked = self
            .index
            .query(&query_vector, k)
            .map_err(|e| QueryError::new(QueryStage::Retrieval, e))?;
        let retrieved = ranked.len();

        let context = build_context(ranked, self.max_context_chars);
        if context.is_empty() {
            return Err(QueryError::new(
                QueryStage::Retrieval,
                KursError::Retrieval(format!(
                    "no excerpt fits the {} character context budget",
                    self.max_context_chars
                )),
            ));
        }
        if context.dropped > 0 {
            debug!(
                "Dropped {} of {} excerpts to fit the context budget",
                context.dropped, retrieved
            );
        }

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context.text);
        let prompt = self.prompts.render_with_custom(&self.prompts.rag.user, &vars);

        let request = GenerationRequest {
            system: Some(self.prompts.rag.system.clone()),
            prompt,
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        };

        let generation = self
            .generator
            .generate(&request)
            .await
            .map_err(|e| QueryError::new(QueryStage::Generation, e))?;

        if generation.truncated {
            warn!("Answer hit the {} token output limit", self.max_output_tokens);
        }

        debug!("Generated answer from {} excerpts", context.included.len());

        Ok(RagResponse {
            answer: generation.text,
            sources: context.included,
            dropped: context.dropped,
            truncated: generation.truncated,
        })
    }
}
