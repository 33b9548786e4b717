//! Error types for Kurs.

use std::fmt;
use thiserror::Error;

/// Library-level error type for Kurs operations.
#[derive(Error, Debug)]
pub enum KursError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Structuring failed: {0}")]
    Structuring(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Index build failed: {0}")]
    IndexBuild(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport, rate-limit, or server-side failure; worth retrying.
    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    /// The provider answered but refused or could not serve the request.
    #[error("OpenAI rejected the request: {0}")]
    Provider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl KursError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            KursError::OpenAI(_) => true,
            KursError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Stage of the question-answering path that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Embedding,
    Retrieval,
    Generation,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStage::Embedding => write!(f, "embedding"),
            QueryStage::Retrieval => write!(f, "retrieval"),
            QueryStage::Generation => write!(f, "generation"),
        }
    }
}

/// A failure answering one question, tagged with the stage it happened in.
#[derive(Error, Debug)]
#[error("Query failed during {stage}: {source}")]
pub struct QueryError {
    pub stage: QueryStage,
    #[source]
    pub source: Box<KursError>,
}

impl QueryError {
    pub fn new(stage: QueryStage, source: KursError) -> Self {
        Self {
            stage,
            source: Box::new(source),
        }
    }
}

/// Result type alias for Kurs operations.
pub type Result<T> = std::result::Result<T, KursError>;
