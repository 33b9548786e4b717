//! Embedding generation for indexing and querying.
//!
//! A single [`Embedder`] instance is shared by the indexing path and the
//! question path so document and query vectors live in one space.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::{KursError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an embedding space. Vectors are only comparable within one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbeddingSpace {
    pub model: String,
    pub dimensions: usize,
}

impl fmt::Display for EmbeddingSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} dims)", self.model, self.dimensions)
    }
}

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of document texts. Output order matches input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query with the same configuration as documents.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_documents(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| KursError::Embedding("Empty embedding response".to_string()))
    }

    /// The space this embedder produces vectors in.
    fn space(&self) -> EmbeddingSpace;
}

/// Check a batch before sending it to a provider.
pub fn validate_inputs(texts: &[String], max_input_chars: usize) -> Result<()> {
    if texts.is_empty() {
        return Err(KursError::Embedding("no texts to embed".to_string()));
    }
    for (i, text) in texts.iter().enumerate() {
        if text.trim().is_empty() {
            return Err(KursError::Embedding(format!("input {} is empty", i)));
        }
        let chars = text.chars().count();
        if chars > max_input_chars {
            return Err(KursError::Embedding(format!(
                "input {} is {} characters, above the {} character limit",
                i, chars, max_input_chars
            )));
        }
    }
    Ok(())
}

/// Check that a provider returned one vector per input, all of the expected size.
pub fn validate_outputs(
    vectors: &[Vec<f32>],
    expected_count: usize,
    dimensions: usize,
) -> Result<()> {
    if vectors.len() != expected_count {
        return Err(KursError::Embedding(format!(
            "expected {} embeddings, got {}",
            expected_count,
            vectors.len()
        )));
    }
    if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimensions) {
        return Err(KursError::Embedding(format!(
            "embedding {} has {} dimensions, expected {}",
            i,
            v.len(),
            dimensions
        )));
    }
    Ok(())
}
