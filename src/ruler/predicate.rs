//! Single-token predicates.
//!
//! A [`Predicate`] is a closed set of token tests. Record keys such as
//! `"LOWER"` or `"REGEX"` are resolved into variants once, when the pattern
//! set is built; evaluation is a plain `match` with no string dispatch.

use std::collections::HashSet;

use regex::Regex;

use super::models::{PosTag, TokenAttrs};

#[derive(Debug, Clone)]
pub enum Predicate {
    /// `token.lower == value`
    ExactLower(String),
    /// `token.lower` is one of the values
    LowerIn(HashSet<String>),
    /// Regex matches the whole of `token.lower`
    LowerRegex(FullMatchRegex),
    /// Regex matches the whole of `token.text`
    TextRegex(FullMatchRegex),
    /// `token.text == value`
    ExactText(String),
    /// `token.text` is one of the values
    TextIn(HashSet<String>),
    /// Token carries this POS tag
    PosIs(PosTag),
    /// Token carries one of these POS tags
    PosIn(HashSet<PosTag>),
    /// Every inner predicate accepts the token
    All(Vec<Predicate>),
}

impl Predicate {
    /// Test a single token.
    pub fn matches<T: TokenAttrs + ?Sized>(&self, token: &T) -> bool {
        match self {
            Predicate::ExactLower(value) => token.lower() == value,
            Predicate::LowerIn(values) => values.contains(token.lower()),
            Predicate::LowerRegex(regex) => regex.is_full_match(token.lower()),
            Predicate::TextRegex(regex) => regex.is_full_match(token.text()),
            Predicate::ExactText(value) => token.text() == value,
            Predicate::TextIn(values) => values.contains(token.text()),
            Predicate::PosIs(tag) => token.pos() == Some(*tag),
            Predicate::PosIn(tags) => token.pos().is_some_and(|pos| tags.contains(&pos)),
            Predicate::All(predicates) => predicates.iter().all(|p| p.matches(token)),
        }
    }
}

/// A regex that only accepts input it matches from first to last byte.
///
/// The source expression is wrapped as `^(?:...)$` at compile time so
/// evaluation is a single `is_match` call.
#[derive(Debug, Clone)]
pub struct FullMatchRegex {
    source: String,
    regex: Regex,
}

impl FullMatchRegex {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        // The source must stand alone; an unbalanced `)` could otherwise
        // close the anchoring group early.
        Regex::new(source)?;
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The expression as written in the rule file.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}
