//! Generative language model invocation.
//!
//! Both the structuring step and question answering go through the
//! [`Generator`] trait, so each can be handed any backend (or a test fake).

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// A single-turn generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Optional system instructions.
    pub system: Option<String>,
    /// User prompt.
    pub prompt: String,
    /// Output token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Text produced by a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    /// The model stopped because it hit `max_tokens`.
    pub truncated: bool,
}

/// Trait for generative model backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation request.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
