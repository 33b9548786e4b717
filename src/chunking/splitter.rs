//! Boundary-aware fixed-size splitter.
//!
//! Each chunk ends at the strongest natural boundary (paragraph, line,
//! sentence, word) that still leaves the remaining text coverable by the
//! minimum number of chunks, and falls back to a hard cut at `max_len`.
//! The next chunk starts at least `overlap` characters before the previous
//! end, snapped back to a word start when one is close.
//!
//! Guarantees:
//! - every chunk is a contiguous substring of at most `max_len` characters
//! - adjacent chunks share at least `overlap` characters, with no gaps
//! - the chunk count equals [`ChunkingConfig::min_chunks`]
//! - output is a pure function of the input

use super::{Chunk, ChunkingConfig};
use crate::error::Result;
use tracing::debug;

/// Boundary kinds, strongest first.
const BOUNDARY_RANKS: usize = 4;

/// Splits documents with a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split a document into ordered, overlapping chunks.
    pub fn split(&self, document: &str) -> Vec<Chunk> {
        let chars: Vec<char> = document.chars().collect();
        let offsets: Vec<usize> = document
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(document.len()))
            .collect();
        let n = chars.len();
        let ChunkingConfig { max_len, overlap } = self.config;

        let make = |index: usize, start: usize, end: usize| Chunk {
            index,
            text: document[offsets[start]..offsets[end]].to_string(),
            start,
            end,
        };

        let total = self.config.min_chunks(n);
        let step = max_len - overlap;
        let mut chunks = Vec::with_capacity(total);
        let mut start = 0;

        loop {
            if n - start <= max_len {
                chunks.push(make(chunks.len(), start, n));
                break;
            }

            // Characters the chunks after this one can still cover.
            let remaining = total.saturating_sub(chunks.len() + 1).max(1);
            let capacity = max_len + (remaining - 1) * step;

            let next_start_min = n.saturating_sub(capacity).max(start + 1);
            let end_min = next_start_min + overlap;
            let end_max = start + max_len;

            let end = find_end(&chars, end_min, end_max).unwrap_or(end_max);
            let next_start_max = end - overlap;
            let next_start = find_start(
                &chars,
                next_start_min.max(next_start_max.saturating_sub(overlap)),
                next_start_max,
            )
            .unwrap_or(next_start_max);

            chunks.push(make(chunks.len(), start, end));
            start = next_start;
        }

        debug!(
            "Split {} chars into {} chunks (max {}, overlap {})",
            n,
            chunks.len(),
            max_len,
            overlap
        );
        chunks
    }
}

/// Split `document` into chunks of at most `max_len` characters sharing
/// `overlap` characters with their predecessor.
pub fn chunk_text(document: &str, max_len: usize, overlap: usize) -> Result<Vec<Chunk>> {
    let config = ChunkingConfig::new(max_len, overlap)?;
    Ok(TextChunker::new(config).split(document))
}

/// Boundary rank of an end position, if it is a boundary at all.
fn end_rank(chars: &[char], end: usize) -> Option<usize> {
    let last = chars[end - 1];
    let before = end.checked_sub(2).map(|i| chars[i]);

    if last == '\n' && before == Some('\n') {
        Some(0)
    } else if last == '\n' {
        Some(1)
    } else if last.is_whitespace() && matches!(before, Some('.' | '!' | '?')) {
        Some(2)
    } else if last.is_whitespace() {
        Some(3)
    } else {
        None
    }
}

/// Latest end in `[lo, hi]` with the strongest available boundary.
fn find_end(chars: &[char], lo: usize, hi: usize) -> Option<usize> {
    let lo = lo.max(1);
    if lo > hi {
        return None;
    }
    (0..BOUNDARY_RANKS)
        .find_map(|rank| (lo..=hi).rev().find(|&end| end_rank(chars, end) == Some(rank)))
}

/// Latest position in `[lo, hi]` that begins a word.
fn find_start(chars: &[char], lo: usize, hi: usize) -> Option<usize> {
    let lo = lo.max(1);
    if lo > hi {
        return None;
    }
    (lo..=hi)
        .rev()
        .find(|&start| chars[start - 1].is_whitespace() && !chars[start].is_whitespace())
}
