//! OpenAI Whisper transcription implementation.

use super::{Transcriber, Transcript};
use crate::error::{KursError, Result};
use crate::openai::classify_error;
use crate::retry::RetryPolicy;
use async_openai::config::OpenAIConfig;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, instrument};

/// File extensions the transcription endpoint accepts without transcoding.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "mp4", "mpeg", "mpga", "m4a", "wav", "webm", "ogg", "flac",
];

/// Largest file the transcription endpoint accepts (25 MB).
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
    language: Option<String>,
    retry: RetryPolicy,
}

impl WhisperTranscriber {
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            language: None,
            retry: RetryPolicy::none(),
        }
    }

    /// Set a language hint (ISO-639-1).
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check if the path has an extension the endpoint accepts.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display(), model = %self.model))]
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        if !audio_path.exists() {
            return Err(KursError::Transcription(format!(
                "File not found: {}",
                audio_path.display()
            )));
        }
        if !Self::is_supported(audio_path) {
            return Err(KursError::Transcription(format!(
                "Unsupported media type: {} (expected one of {})",
                audio_path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        let size = tokio::fs::metadata(audio_path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(KursError::Transcription(format!(
                "{} is {:.1} MB; the transcription endpoint accepts at most 25 MB",
                audio_path.display(),
                size as f64 / (1024.0 * 1024.0)
            )));
        }

        let file_bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();
        debug!("Uploading {} bytes", file_bytes.len());

        let response = self
            .retry
            .run("transcription", || {
                let mut builder = CreateTranscriptionRequestArgs::default();
                builder
                    .file(AudioInput::from_vec_u8(file_name.clone(), file_bytes.clone()))
                    .model(&self.model)
                    .response_format(AudioResponseFormat::Json);
                if let Some(lang) = &self.language {
                    builder.language(lang);
                }
                let request = builder.build();

                async move {
                    let request = request.map_err(|e| {
                        KursError::Transcription(format!("Failed to build request: {}", e))
                    })?;
                    self.client
                        .audio()
                        .transcribe(request)
                        .await
                        .map_err(|e| classify_error("Transcription API error", e))
                }
            })
            .await
            .map_err(|e| match e {
                KursError::Transcription(_) => e,
                other => KursError::Transcription(other.to_string()),
            })?;

        let transcript = Transcript::new(response.text.trim())?;
        info!("Transcribed {} characters", transcript.len());
        Ok(transcript)
    }
}
