//! Speech-to-text boundary.
//!
//! The pipeline only needs the full transcript text; sentence and timestamp
//! structure is not carried.

mod whisper;

pub use whisper::{WhisperTranscriber, SUPPORTED_EXTENSIONS};

use crate::error::{KursError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full text of a transcribed recording. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    /// Wrap transcript text, rejecting blank input.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(KursError::Transcription(
                "transcript is empty".to_string(),
            ));
        }
        Ok(Self { text })
    }

    /// Load a transcript from a plain text file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio or video file into plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}
