//! Deterministic fakes for the external services.

use crate::embedding::{validate_inputs, Embedder, EmbeddingSpace};
use crate::error::{KursError, Result};
use crate::llm::{Generation, GenerationRequest, Generator};
use crate::transcription::{Transcriber, Transcript};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Bag-of-words embedder: each word adds weight to a hashed dimension.
pub struct HashEmbedder {
    dimensions: usize,
    pub calls: AtomicUsize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
            v[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        validate_inputs(texts, 100_000)?;
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn space(&self) -> EmbeddingSpace {
        EmbeddingSpace {
            model: "hash".to_string(),
            dimensions: self.dimensions,
        }
    }
}

/// Embedder whose every call fails.
pub struct FailingEmbedder {
    pub dimensions: usize,
}

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(KursError::Embedding("provider unavailable".to_string()))
    }

    fn space(&self) -> EmbeddingSpace {
        EmbeddingSpace {
            model: "hash".to_string(),
            dimensions: self.dimensions,
        }
    }
}

/// Generator that replays queued replies and records requests.
/// When the queue is empty it echoes a fixed answer.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<Generation>>>,
    pub seen: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(Generation {
            text: text.to_string(),
            truncated: false,
        }));
        self
    }

    pub fn reply_truncated(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(Generation {
            text: text.to_string(),
            truncated: true,
        }));
        self
    }

    pub fn fail(self, error: KursError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(Generation {
                    text: "Follow the documented steps.".to_string(),
                    truncated: false,
                })
            })
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Transcriber returning fixed text.
pub struct StaticTranscriber(pub String);

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
        Transcript::new(self.0.clone())
    }
}

/// A schema-conformant document as a model would return it.
pub const SAMPLE_DOCUMENT: &str = r#"{
  "Title": "Password Resets for New Support Staff",
  "Objective": "Reset a locked employee account safely",
  "TargetAudience": "New service desk hires",
  "KeyConcepts": ["Identity verification", "Temporary passwords"],
  "ToolsMentioned": ["Admin console", "Ticketing system"],
  "StepByStepInstructions": [
    {"StepNumber": 1, "Instruction": "Verify the caller's identity with their employee ID", "Purpose": "Prevent account takeover", "Example": "Ask for the ID printed on the badge"},
    {"StepNumber": 2, "Instruction": "Open the admin console and search for the account", "Purpose": "Locate the locked user", "Example": "Search by email address"},
    {"StepNumber": 3, "Instruction": "Issue a temporary password and force a change at next login", "Purpose": "Restore access without knowing the final password", "Example": "Tick 'require change' before saving"}
  ],
  "ImportantNotes": "Never read a password aloud. Log every reset in the ticketing system."
}"#;
