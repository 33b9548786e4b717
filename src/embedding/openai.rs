//! OpenAI embeddings implementation.

use super::{validate_inputs, validate_outputs, Embedder, EmbeddingSpace};
use crate::config::EmbeddingSettings;
use crate::error::{KursError, Result};
use crate::openai::classify_error;
use crate::retry::RetryPolicy;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequest, CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Provider limit on inputs per request.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
    max_input_chars: usize,
    retry: RetryPolicy,
}

impl OpenAIEmbedder {
    pub fn new(client: Client<OpenAIConfig>, settings: &EmbeddingSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            dimensions: settings.dimensions as usize,
            max_input_chars: settings.max_input_chars,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Only the text-embedding-3 family accepts a `dimensions` parameter;
    /// older models reject it and always return their native size.
    fn supports_dimensions(&self) -> bool {
        self.model.starts_with("text-embedding-3")
    }

    fn build_request(&self, batch: &[String]) -> Result<CreateEmbeddingRequest> {
        let mut builder = CreateEmbeddingRequestArgs::default();
        builder
            .model(&self.model)
            .input(EmbeddingInput::StringArray(batch.to_vec()));
        if self.supports_dimensions() {
            builder.dimensions(self.dimensions as u32);
        }
        builder
            .build()
            .map_err(|e| KursError::Embedding(format!("Failed to build request: {}", e)))
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = self.build_request(batch)?;

        let response = self
            .retry
            .run("embedding", || {
                let request = request.clone();
                async move {
                    self.client
                        .embeddings()
                        .create(request)
                        .await
                        .map_err(|e| classify_error("Embedding API error", e))
                }
            })
            .await?;

        // Place by index so output order never depends on response order.
        let mut vectors = vec![Vec::new(); batch.len()];
        for item in response.data {
            let slot = vectors.get_mut(item.index as usize).ok_or_else(|| {
                KursError::Embedding(format!("response index {} out of range", item.index))
            })?;
            *slot = item.embedding;
        }
        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len(), model = %self.model))]
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        validate_inputs(texts, self.max_input_chars)?;

        debug!("Generating embeddings for {} texts", texts.len());
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let vectors = self.embed_batch(batch).await.map_err(|e| match e {
                KursError::Embedding(_) => e,
                other => KursError::Embedding(other.to_string()),
            })?;
            all_embeddings.extend(vectors);
        }

        validate_outputs(&all_embeddings, texts.len(), self.dimensions)?;
        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn space(&self) -> EmbeddingSpace {
        EmbeddingSpace {
            model: self.model.clone(),
            dimensions: self.dimensions,
        }
    }
}
