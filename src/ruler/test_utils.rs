//! Shared test utilities for entity matching tests.

use crate::ruler::models::Token;
use crate::ruler::pattern::PatternSet;
use crate::ruler::rules::{PatternRecord, TokenSpec};

/// Builds a token spec from a JSON object literal.
///
/// Panics if `value` is not a JSON object.
pub fn spec(value: serde_json::Value) -> TokenSpec {
    serde_json::from_value(value).expect("token spec must be a JSON object")
}

/// Creates a token pattern record.
pub fn record(label: &str, specs: Vec<TokenSpec>) -> PatternRecord {
    PatternRecord::tokens(label, specs)
}

/// Creates a pattern of `LOWER` literals, one per word.
pub fn lower_record(label: &str, words: &[&str]) -> PatternRecord {
    record(
        label,
        words
            .iter()
            .map(|w| spec(serde_json::json!({ "LOWER": w })))
            .collect(),
    )
}

/// Builds a pattern set, panicking on invalid records.
pub fn pattern_set(records: &[PatternRecord]) -> PatternSet {
    PatternSet::build(records).expect("test patterns must compile")
}

/// Creates tokens from whitespace-separated words, offsets included.
pub fn tokens(words: &[&str]) -> Vec<Token> {
    let mut idx = 0;
    words
        .iter()
        .map(|word| {
            let token = Token::new(*word, idx);
            idx += word.len() + 1;
            token
        })
        .collect()
}
