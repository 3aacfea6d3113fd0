//! Word-set overlap matcher
//!
//! Scores each block by the number of distinct lowercase words it shares with
//! the citation and returns the best one. The metric, the first-seen tie-break
//! and the early exit on full coverage are all observable behavior that
//! citation links depend on; keep them exactly as they are.

use std::collections::HashSet;

use crate::document::{Block, MatchResult};

/// Distinct lowercase words of `text`, split on runs of whitespace
///
/// Lowercasing is Unicode-aware and locale-independent.
pub fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Number of distinct words shared by `citation_words` and `text`
pub fn overlap_score(citation_words: &HashSet<String>, text: &str) -> usize {
    let block_words = word_set(text);
    citation_words
        .iter()
        .filter(|word| block_words.contains(*word))
        .count()
}

/// Find the block that best matches `citation`
///
/// Blocks are scanned in document order (page, then position on the page)
/// whatever order the slice holds them in. A later block only wins with a
/// strictly greater score, and the scan stops at the first block that contains
/// every distinct citation word.
pub fn locate(blocks: &[Block], citation: &str) -> MatchResult {
    let citation_words = word_set(citation);
    if citation_words.is_empty() {
        return MatchResult::not_found();
    }
    let perfect = citation_words.len();

    let mut ordered: Vec<&Block> = blocks.iter().collect();
    ordered.sort_by_key(|block| block.position());

    let mut best: Option<(usize, &Block)> = None;
    for block in ordered {
        let score = overlap_score(&citation_words, &block.text);
        let best_score = best.map_or(0, |(s, _)| s);

        if score > best_score {
            best = Some((score, block));
        }
        if score == perfect {
            break;
        }
    }

    match best {
        Some((score, block)) => MatchResult::from_block(block, score),
        None => MatchResult::not_found(),
    }
}
