//! Token-sequence matching.
//!
//! Every pattern is tried at every start position. A pattern of length `k`
//! matches at `i` when `tokens[i..i + k]` exists and each predicate accepts
//! the token at the same offset. There are no optional or skipping
//! positions: one predicate always consumes exactly one token.

use super::match_refine::resolve_overlaps;
use super::models::{Span, TokenAttrs};
use super::pattern::{Pattern, PatternSet};

/// Find all labeled, non-overlapping spans of `patterns` in `tokens`.
///
/// Candidates are generated exhaustively, then resolved leftmost-longest
/// with pattern order breaking remaining ties (see
/// [`resolve_overlaps`](super::match_refine::resolve_overlaps)). The result
/// is sorted by start position and is empty when either input is empty.
pub fn find_matches<T: TokenAttrs>(patterns: &PatternSet, tokens: &[T]) -> Vec<Span> {
    let candidates = find_candidates(patterns, tokens);
    let spans = resolve_overlaps(candidates);

    debug_assert!(
        spans.windows(2).all(|w| w[0].end <= w[1].start),
        "resolved spans must be disjoint and ordered"
    );

    spans
}

/// All candidate spans before overlap resolution.
///
/// Ordered by start position, then by pattern input order.
pub fn find_candidates<T: TokenAttrs>(patterns: &PatternSet, tokens: &[T]) -> Vec<Span> {
    let mut candidates = Vec::new();

    for start in 0..tokens.len() {
        for pattern in patterns.patterns() {
            if let Some(end) = match_at(pattern, tokens, start) {
                debug_assert!(start < end && end <= tokens.len());
                candidates.push(Span {
                    start,
                    end,
                    label: pattern.label.clone(),
                    id: pattern.id.clone(),
                });
            }
        }
    }

    candidates
}

/// Test `pattern` against the window starting at `start`.
///
/// Returns the exclusive end index on success. A window that would run past
/// the last token never matches.
fn match_at<T: TokenAttrs>(pattern: &Pattern, tokens: &[T], start: usize) -> Option<usize> {
    let end = start.checked_add(pattern.len())?;
    let window = tokens.get(start..end)?;

    let accepted = pattern
        .predicates()
        .iter()
        .zip(window)
        .all(|(predicate, token)| predicate.matches(token));

    accepted.then_some(end)
}
