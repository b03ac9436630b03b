//! Overlap resolution - turn raw candidates into the final span set.
//!
//! Candidates are ranked leftmost first, then longest first. Ties on both
//! keep the order in which candidates were generated, which is pattern input
//! order. Ranked candidates are accepted greedily; a candidate touching any
//! token already claimed by an accepted span is dropped.

use bit_set::BitSet;

use super::models::Span;

/// Resolve overlapping candidates into pairwise disjoint spans.
///
/// `candidates` must be in generation order (start position, then pattern
/// order) for the pattern-order tie-break to hold. The returned spans are
/// sorted by `start`.
pub fn resolve_overlaps(mut candidates: Vec<Span>) -> Vec<Span> {
    if candidates.len() < 2 {
        return candidates;
    }

    // Stable sort: equal (start, len) keep generation order.
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.len().cmp(&a.len())));

    let mut claimed = BitSet::new();
    let mut accepted = Vec::new();

    for candidate in candidates {
        if (candidate.start..candidate.end).any(|i| claimed.contains(i)) {
            continue;
        }
        claimed.extend(candidate.start..candidate.end);
        accepted.push(candidate);
    }

    accepted
}
