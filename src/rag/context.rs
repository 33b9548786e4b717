//! Grounding context assembly under a size budget.

use crate::index::ScoredChunk;

const SEPARATOR: &str = "\n\n";

/// Context text plus the retrieved chunks that made it in.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundingContext {
    /// Formatted excerpts, highest similarity first.
    pub text: String,
    /// Chunks included, in rank order.
    pub included: Vec<ScoredChunk>,
    /// Lower-ranked chunks left out to stay within budget.
    pub dropped: usize,
}

impl GroundingContext {
    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }
}

fn format_excerpt(rank: usize, result: &ScoredChunk) -> String {
    format!(
        "---\n[{}] Excerpt {} (relevance {:.2})\n{}\n---",
        rank,
        result.chunk.index + 1,
        result.score,
        result.chunk.text
    )
}

/// Concatenate ranked chunks, whole chunks only, within `max_chars`.
///
/// Chunks are taken in rank order; the first one that would overflow the
/// budget and every chunk ranked below it are dropped. No chunk is cut.
pub fn build_context(ranked: Vec<ScoredChunk>, max_chars: usize) -> GroundingContext {
    let total = ranked.len();
    let mut text = String::new();
    let mut used = 0;
    let mut included = Vec::with_capacity(total);

    for result in ranked {
        let excerpt = format_excerpt(included.len() + 1, &result);
        let sep = if included.is_empty() { 0 } else { SEPARATOR.len() };
        let cost = sep + excerpt.chars().count();
        if used + cost > max_chars {
            break;
        }
        if sep > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(&excerpt);
        used += cost;
        included.push(result);
    }

    GroundingContext {
        text,
        dropped: total - included.len(),
        included,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;

    fn scored(index: usize, text: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                index,
                text: text.to_string(),
                start: 0,
                end: text.chars().count(),
            },
            score,
        }
    }

    #[test]
    fn test_keeps_rank_order() {
        let ctx = build_context(
            vec![scored(4, "best", 0.9), scored(0, "second", 0.5)],
            10_000,
        );
        assert_eq!(ctx.included.len(), 2);
        assert!(ctx.text.find("best").unwrap() < ctx.text.find("second").unwrap());
        assert!(ctx.text.starts_with("---\n[1] Excerpt 5"));
        assert_eq!(ctx.dropped, 0);
    }

    #[test]
    fn test_drops_lowest_ranked_whole_chunks() {
        let long = "x".repeat(300);
        let ranked = vec![
            scored(0, &long, 0.9),
            scored(1, &long, 0.8),
            scored(2, "tiny", 0.1),
        ];
        let one = format_excerpt(1, &ranked[0]).chars().count();

        let ctx = build_context(ranked, one + 10);
        assert_eq!(ctx.included.len(), 1);
        assert_eq!(ctx.included[0].chunk.index, 0);
        assert_eq!(ctx.dropped, 2);
        assert!(ctx.text.contains(&long));
        assert!(ctx.text.chars().count() <= one + 10);
    }

    #[test]
    fn test_budget_below_first_chunk_yields_empty_context() {
        let ctx = build_context(vec![scored(0, "some text", 0.9)], 5);
        assert!(ctx.is_empty());
        assert!(ctx.text.is_empty());
        assert_eq!(ctx.dropped, 1);
    }
}
