//! Rule-based entity recognition.
//!
//! Finds labeled spans in tokenized text using declarative token patterns:
//! 1. Rule records are loaded and compiled into an immutable [`PatternSet`]
//! 2. Text is tokenized (any [`TokenAttrs`] implementation will do)
//! 3. Every pattern is tried at every token position
//! 4. Overlapping candidates are resolved leftmost, then longest, then by
//!    pattern order
//!
//! Matching itself never fails; all validation happens when the pattern set
//! is built.

mod error;
mod match_refine;
mod matcher;
mod models;
mod pattern;
mod predicate;
pub mod rules;
#[cfg(test)]
mod test_utils;
mod tokenize;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

pub use error::InvalidPatternError;
pub use match_refine::resolve_overlaps;
pub use matcher::{find_candidates, find_matches};
pub use models::{Entity, PosTag, Span, Token, TokenAttrs};
pub use pattern::{Pattern, PatternSet};
pub use predicate::{FullMatchRegex, Predicate};
pub use rules::{PatternBody, PatternRecord, TokenSpec, load_pattern_set};
pub use tokenize::{Tokenizer, tokenize};

/// A pattern set paired with the default tokenizer.
///
/// Cloning is cheap; the patterns are shared.
#[derive(Debug, Clone)]
pub struct EntityRuler {
    patterns: Arc<PatternSet>,
    tokenizer: Tokenizer,
}

impl EntityRuler {
    pub fn new(patterns: PatternSet) -> Self {
        Self {
            patterns: Arc::new(patterns),
            tokenizer: Tokenizer::new(),
        }
    }

    /// Create a ruler from a rule file or a directory of rule files.
    ///
    /// # Arguments
    /// * `rules_path` - `.jsonl`, `.json`, `.yml`/`.yaml` file, or a directory of them
    ///
    /// # Returns
    /// A Result containing the ruler or an error
    pub fn from_path(rules_path: &Path) -> Result<Self> {
        Ok(Self::new(load_pattern_set(rules_path)?))
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Tokenize `text` and return the entities found, in text order.
    ///
    /// Entity offsets are byte offsets into `text`.
    pub fn annotate(&self, text: &str) -> Vec<Entity> {
        let tokens = self.tokenizer.tokenize(text);
        let spans = find_matches(&self.patterns, &tokens);
        spans
            .into_iter()
            .map(|span| span_to_entity(text, &tokens, span))
            .collect()
    }
}

fn span_to_entity(text: &str, tokens: &[Token], span: Span) -> Entity {
    let start_char = tokens[span.start].idx;
    let end_char = tokens[span.end - 1].end_idx();
    Entity {
        label: span.label,
        id: span.id,
        text: Some(text[start_char..end_char].to_string()),
        start_token: span.start,
        end_token: span.end,
        start_char,
        end_char,
    }
}
