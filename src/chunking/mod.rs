//! Document chunking for retrieval.
//!
//! Splits a structured document into overlapping, order-preserving text
//! segments sized for embedding.

mod splitter;

pub use splitter::{chunk_text, TextChunker};

use crate::config::ChunkingSettings;
use crate::error::{KursError, Result};
use serde::{Deserialize, Serialize};

/// A contiguous slice of the source document.
///
/// Offsets are character positions, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in document order.
    pub index: usize,
    /// Text content of this chunk.
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Chunk size limits, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum chunk length.
    pub max_len: usize,
    /// Minimum characters shared by adjacent chunks.
    pub overlap: usize,
}

impl ChunkingConfig {
    /// Create a config, requiring `max_len > overlap`.
    pub fn new(max_len: usize, overlap: usize) -> Result<Self> {
        if max_len == 0 || overlap >= max_len {
            return Err(KursError::InvalidInput(format!(
                "chunk size ({}) must be greater than overlap ({})",
                max_len, overlap
            )));
        }
        Ok(Self { max_len, overlap })
    }

    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }

    /// Fewest chunks that can cover `len` characters under these limits.
    pub fn min_chunks(&self, len: usize) -> usize {
        if len <= self.max_len {
            1
        } else {
            1 + (len - self.max_len).div_ceil(self.max_len - self.overlap)
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_len: 1000,
            overlap: 100,
        }
    }
}
