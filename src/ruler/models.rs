//! Core data structures for entity matching.
//!
//! This module defines:
//! - The [`TokenAttrs`] trait through which the matcher reads tokens
//! - The default [`Token`] produced by the bundled tokenizer
//! - The Universal POS tag enum ([`PosTag`])
//! - Match results: token-level [`Span`]s and text-level [`Entity`]s

use serde::Serialize;
use strum::{Display, EnumString};

/// Read access to the token attributes predicates are evaluated against.
///
/// Any tokenizer can feed the matcher as long as its tokens expose these
/// three projections. The lowercase form is precomputed by the tokenizer;
/// predicates never change casing themselves.
pub trait TokenAttrs {
    /// Raw token text as it appears in the source.
    fn text(&self) -> &str;

    /// Lowercase projection of the token text.
    fn lower(&self) -> &str;

    /// Part-of-speech tag, if the tokenizer assigns one.
    fn pos(&self) -> Option<PosTag> {
        None
    }
}

/// Universal part-of-speech tag (type-safe, not stringly-typed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Adj,   // adjective
    Adp,   // adposition
    Adv,   // adverb
    Aux,   // auxiliary
    Cconj, // coordinating conjunction
    Det,   // determiner
    Intj,  // interjection
    Noun,  // noun
    Num,   // numeral
    Part,  // particle
    Pron,  // pronoun
    Propn, // proper noun
    Punct, // punctuation
    Sconj, // subordinating conjunction
    Sym,   // symbol
    Verb,  // verb
    X,     // other
    Space, // whitespace
}

/// A token produced by the default tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text (e.g., "Python", "3.11").
    pub text: String,
    /// Lowercase form of `text`.
    pub lower: String,
    /// Optional POS tag. The default tokenizer never assigns one.
    pub pos: Option<PosTag>,
    /// Byte offset of the token in the source text.
    pub idx: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, idx: usize) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        Self {
            text,
            lower,
            pos: None,
            idx,
        }
    }

    pub fn with_pos(mut self, pos: PosTag) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Byte offset one past the end of the token.
    pub fn end_idx(&self) -> usize {
        self.idx + self.text.len()
    }
}

impl TokenAttrs for Token {
    fn text(&self) -> &str {
        &self.text
    }

    fn lower(&self) -> &str {
        &self.lower
    }

    fn pos(&self) -> Option<PosTag> {
        self.pos
    }
}

/// A labeled, half-open range of token indices `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    /// Identifier of the pattern that produced this span, if it declared one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Span {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        debug_assert!(start < end, "span must cover at least one token");
        Self {
            start,
            end,
            label: label.into(),
            id: None,
        }
    }

    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if the two spans share at least one token index.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A matched span mapped back onto the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Source text covered by the entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub start_token: usize,
    pub end_token: usize,
    /// Byte offset where the entity starts.
    pub start_char: usize,
    /// Byte offset one past the end of the entity.
    pub end_char: usize,
}
