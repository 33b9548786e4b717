//! Configuration settings for Kurs.

use crate::error::{KursError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub network: NetworkSettings,
    pub transcription: TranscriptionSettings,
    pub structuring: StructuringSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub rag: RagSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where structured documents are written.
    pub docs_dir: String,
    /// Directory scanned for recordings when no file is given.
    pub inputs_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            docs_dir: "docs".to_string(),
            inputs_dir: "inputs".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Transport settings shared by every external call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Retries for transient failures. Zero disables retrying.
    pub max_retries: u32,
    /// First backoff delay in milliseconds; doubles per attempt.
    pub initial_backoff_ms: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
            initial_backoff_ms: 1000,
        }
    }
}

impl NetworkSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Transcription model.
    pub model: String,
    /// Optional ISO-639-1 language hint.
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: None,
        }
    }
}

/// Settings for turning a transcript into a training document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuringSettings {
    /// Model used for schema extraction.
    pub model: String,
    /// Output token budget. Sized to the model's output ceiling so long
    /// documents are not truncated.
    pub max_output_tokens: u32,
}

impl Default for StructuringSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_output_tokens: 16384,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Longest accepted input per item, in characters.
    pub max_input_chars: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            // 8192 tokens at roughly 4 characters per token
            max_input_chars: 8192 * 4,
        }
    }
}

/// Document chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between adjacent chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for answer generation.
    pub model: String,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Sampling temperature for answers.
    pub temperature: f32,
    /// Output token budget for answers.
    pub max_output_tokens: u32,
    /// Largest grounding context sent to the model, in characters.
    pub max_context_chars: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            top_k: 4,
            temperature: 0.2,
            max_output_tokens: 2048,
            max_context_chars: 12_000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(KursError::Config("chunking.chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(KursError::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.embedding.dimensions == 0 {
            return Err(KursError::Config("embedding.dimensions must be positive".to_string()));
        }
        if self.embedding.max_input_chars < self.chunking.chunk_size {
            return Err(KursError::Config(format!(
                "embedding.max_input_chars ({}) is smaller than chunking.chunk_size ({})",
                self.embedding.max_input_chars, self.chunking.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(KursError::Config("rag.top_k must be at least 1".to_string()));
        }
        if self.structuring.max_output_tokens == 0 || self.rag.max_output_tokens == 0 {
            return Err(KursError::Config("output token budgets must be positive".to_string()));
        }
        if !(0.0..=2.0).contains(&self.rag.temperature) {
            return Err(KursError::Config(format!(
                "rag.temperature must be between 0 and 2, got {}",
                self.rag.temperature
            )));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kurs")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded docs directory path.
    pub fn docs_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.docs_dir)
    }

    /// Get the expanded inputs directory path.
    pub fn inputs_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.inputs_dir)
    }
}
