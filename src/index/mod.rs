//! In-memory vector index over document chunks.
//!
//! Built once from `(chunk, vector)` pairs and read-only afterwards. Search is
//! exact (brute force), which is plenty for the tens to hundreds of chunks a
//! single document produces and keeps ranking deterministic: equal scores are
//! ordered by chunk position.

use crate::chunking::Chunk;
use crate::embedding::EmbeddingSpace;
use crate::error::{KursError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Similarity metric, fixed when the index is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    DotProduct,
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

struct Entry {
    chunk: Chunk,
    vector: Vec<f32>,
    norm: f32,
}

/// Immutable nearest-neighbour index.
pub struct VectorIndex {
    entries: Vec<Entry>,
    space: EmbeddingSpace,
    metric: SimilarityMetric,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("chunks", &self.entries.len())
            .field("space", &self.space)
            .field("metric", &self.metric)
            .finish()
    }
}

impl VectorIndex {
    /// Build a cosine-similarity index.
    pub fn build(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>, space: EmbeddingSpace) -> Result<Self> {
        Self::build_with_metric(chunks, vectors, space, SimilarityMetric::Cosine)
    }

    /// Build an index with an explicit metric.
    ///
    /// Fails with [`KursError::IndexBuild`] on an empty corpus, mismatched
    /// lengths, vectors outside `space`, or non-finite components. No partial
    /// index is ever returned.
    pub fn build_with_metric(
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
        space: EmbeddingSpace,
        metric: SimilarityMetric,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(KursError::IndexBuild("no chunks to index".to_string()));
        }
        if chunks.len() != vectors.len() {
            return Err(KursError::IndexBuild(format!(
                "{} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }
        if space.dimensions == 0 {
            return Err(KursError::IndexBuild("embedding space has zero dimensions".to_string()));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (position, (chunk, vector)) in chunks.into_iter().zip(vectors).enumerate() {
            if vector.len() != space.dimensions {
                return Err(KursError::IndexBuild(format!(
                    "vector {} has {} dimensions, index space is {}",
                    position,
                    vector.len(),
                    space
                )));
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(KursError::IndexBuild(format!(
                    "vector {} contains non-finite values",
                    position
                )));
            }
            let norm = l2_norm(&vector);
            entries.push(Entry { chunk, vector, norm });
        }

        info!("Built {:?} index of {} chunks in {}", metric, entries.len(), space);
        Ok(Self {
            entries,
            space,
            metric,
        })
    }

    /// Return the `k` most similar chunks, best first.
    ///
    /// `k` larger than the corpus is clamped to the corpus size.
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(KursError::Retrieval("k must be at least 1".to_string()));
        }
        if query.len() != self.space.dimensions {
            return Err(KursError::Retrieval(format!(
                "query vector has {} dimensions, index space is {}",
                query.len(),
                self.space
            )));
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(KursError::Retrieval("query vector contains non-finite values".to_string()));
        }

        let query_norm = l2_norm(query);
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, self.score(entry, query, query_norm)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(k.min(self.entries.len()));

        debug!("Retrieved {} of {} chunks", scored.len(), self.entries.len());
        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect())
    }

    fn score(&self, entry: &Entry, query: &[f32], query_norm: f32) -> f32 {
        let dot = dot(&entry.vector, query);
        match self.metric {
            SimilarityMetric::DotProduct => dot,
            SimilarityMetric::Cosine => cosine(dot, entry.norm, query_norm),
        }
    }

    /// Number of indexed chunks. Always at least one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn space(&self) -> &EmbeddingSpace {
        &self.space
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    /// Indexed chunks in insertion (document) order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|e| &e.chunk)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Zero-length vectors score 0 against everything.
fn cosine(dot: f32, norm_a: f32, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
