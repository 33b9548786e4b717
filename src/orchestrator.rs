//! Pipeline orchestrator for Kurs.
//!
//! Coordinates the one-shot stages (transcription, structuring, persistence,
//! chunking, embedding, indexing) and hands the finished index to the
//! question engine. Every stage completes before the next begins, and any
//! stage error aborts the run before a session starts.

use crate::chunking::{ChunkingConfig, TextChunker};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{KursError, Result};
use crate::index::VectorIndex;
use crate::llm::{Generator, OpenAIGenerator};
use crate::openai::create_client_with_timeout;
use crate::persist;
use crate::rag::RagEngine;
use crate::retry::RetryPolicy;
use crate::structuring::{StructuredDocument, StructuringEngine};
use crate::transcription::{Transcriber, Transcript, WhisperTranscriber};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// A structured document that has been saved and indexed.
pub struct Prepared {
    pub document: StructuredDocument,
    /// Where the document lives on disk.
    pub path: PathBuf,
    pub index: Arc<VectorIndex>,
}

/// The main orchestrator for the Kurs pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    transcriber: Arc<dyn Transcriber>,
    structuring: StructuringEngine,
    embedder: Arc<dyn Embedder>,
    answer_generator: Arc<dyn Generator>,
    chunker: TextChunker,
}

impl Orchestrator {
    /// Create an orchestrator backed by the OpenAI services.
    ///
    /// One HTTP client and one embedder are built here and shared by every
    /// stage, so indexing and querying always use the same embedding space.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let client = create_client_with_timeout(settings.network.request_timeout())?;
        let retry = RetryPolicy::from_settings(&settings.network);

        let transcriber: Arc<dyn Transcriber> = Arc::new(
            WhisperTranscriber::new(client.clone(), &settings.transcription.model)
                .with_language(settings.transcription.language.clone())
                .with_retry(retry),
        );
        let structuring_generator: Arc<dyn Generator> = Arc::new(
            OpenAIGenerator::new(client.clone(), &settings.structuring.model).with_retry(retry),
        );
        let answer_generator: Arc<dyn Generator> =
            Arc::new(OpenAIGenerator::new(client.clone(), &settings.rag.model).with_retry(retry));
        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::new(client, &settings.embedding).with_retry(retry));

        info!(
            "Using {} for structuring, {} for answers, {} for embeddings",
            settings.structuring.model, settings.rag.model, settings.embedding.model
        );

        Self::with_components(
            settings,
            prompts,
            transcriber,
            structuring_generator,
            answer_generator,
            embedder,
        )
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        transcriber: Arc<dyn Transcriber>,
        structuring_generator: Arc<dyn Generator>,
        answer_generator: Arc<dyn Generator>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        settings.validate()?;
        let chunker = TextChunker::new(ChunkingConfig::from_settings(&settings.chunking)?);
        let structuring = StructuringEngine::new(structuring_generator, &settings.structuring)
            .with_prompts(prompts.clone());

        Ok(Self {
            settings,
            prompts,
            transcriber,
            structuring,
            embedder,
            answer_generator,
            chunker,
        })
    }

    /// Transcribe a recording.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        self.transcriber.transcribe(audio_path).await
    }

    /// Reshape a transcript into a validated document.
    pub async fn structure(&self, transcript: &Transcript) -> Result<StructuredDocument> {
        self.structuring.structure(transcript).await
    }

    /// Persist a document under the configured docs directory.
    pub fn save(&self, document: &StructuredDocument) -> Result<PathBuf> {
        persist::save_structured(document, &self.settings.docs_dir(), Local::now())
    }

    /// Chunk, embed, and index a document's canonical text.
    #[instrument(skip_all, fields(title = %document.document().title))]
    pub async fn index_document(&self, document: &StructuredDocument) -> Result<Arc<VectorIndex>> {
        let chunks = self.chunker.split(document.text());
        if chunks.is_empty() {
            return Err(KursError::IndexBuild("document produced no chunks".to_string()));
        }
        info!("Split document into {} chunks", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;

        let index = VectorIndex::build(chunks, vectors, self.embedder.space())?;
        Ok(Arc::new(index))
    }

    /// Run a recording through every stage up to a ready index.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    pub async fn process_recording(&self, audio_path: &Path) -> Result<Prepared> {
        let transcript = self.transcribe(audio_path).await?;
        info!("Transcribed {} characters", transcript.len());
        self.process_transcript(&transcript).await
    }

    /// Structure, save, and index an existing transcript.
    pub async fn process_transcript(&self, transcript: &Transcript) -> Result<Prepared> {
        let document = self.structure(transcript).await?;
        let path = self.save(&document)?;
        let index = self.index_document(&document).await?;
        Ok(Prepared {
            document,
            path,
            index,
        })
    }

    /// Load a previously saved document and index it.
    pub async fn open_document(&self, path: &Path) -> Result<Prepared> {
        let document = persist::load_structured(path)?;
        let index = self.index_document(&document).await?;
        Ok(Prepared {
            document,
            path: path.to_path_buf(),
            index,
        })
    }

    /// Question engine over `index`, sharing this orchestrator's embedder.
    pub fn rag_engine(&self, index: Arc<VectorIndex>) -> Result<RagEngine> {
        Ok(RagEngine::new(
            index,
            self.embedder.clone(),
            self.answer_generator.clone(),
            &self.settings.rag,
        )?
        .with_prompts(self.prompts.clone()))
    }
}
