//! OpenAI chat completions backend.

use super::{Generation, GenerationRequest, Generator};
use crate::error::{KursError, Result};
use crate::openai::classify_error;
use crate::retry::RetryPolicy;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, FinishReason,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat-completions generator bound to one model.
pub struct OpenAIGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    retry: RetryPolicy,
}

impl OpenAIGenerator {
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            retry: RetryPolicy::none(),
        }
    }

    /// Set the retry policy for transient failures.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_request(&self, request: &GenerationRequest) -> Result<CreateChatCompletionRequest> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = &request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.clone())
                    .build()
                    .map_err(|e| KursError::InvalidInput(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.clone())
                .build()
                .map_err(|e| KursError::InvalidInput(e.to_string()))?
                .into(),
        );

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_completion_tokens(request.max_tokens)
            .build()
            .map_err(|e| KursError::InvalidInput(e.to_string()))
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, request), fields(model = %self.model, prompt_chars = request.prompt.len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let chat_request = self.build_request(request)?;

        let response = self
            .retry
            .run("chat completion", || {
                let chat_request = chat_request.clone();
                async move {
                    self.client
                        .chat()
                        .create(chat_request)
                        .await
                        .map_err(|e| classify_error("Chat API error", e))
                }
            })
            .await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| KursError::Provider("Response contained no choices".to_string()))?;

        let text = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| KursError::Provider("Empty response from LLM".to_string()))?;

        let truncated = matches!(choice.finish_reason, Some(FinishReason::Length));
        debug!("Generated {} chars (truncated: {})", text.len(), truncated);

        Ok(Generation { text, truncated })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
