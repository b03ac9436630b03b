//! Default tokenizer.
//!
//! Splits text on whitespace, then peels opening and closing punctuation off
//! each chunk as single-character tokens. Inner punctuation is never split,
//! so version numbers ("3.11"), identifiers ("node.js") and symbols ("C++")
//! stay whole. Every token remembers its byte offset in the source text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::Token;

/// Whitespace-delimited chunks.
static CHUNK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("Invalid regex pattern"));

/// Dotted abbreviations such as "e.g" or "U.S" (checked without the final dot).
static ABBREVIATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\p{L}\.)+\p{L}$").expect("Invalid regex pattern"));

const PREFIXES: &[char] = &['(', '[', '{', '"', '\'', '«', '“', '‘', '¿', '¡'];
const SUFFIXES: &[char] = &[
    ')', ']', '}', '"', '\'', '»', '”', '’', ',', ';', ':', '!', '?', '.',
];

/// Stateless tokenizer producing [`Token`]s with byte offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize `text`. Same input always yields the same tokens.
    ///
    /// # Examples
    /// ```
    /// # use entity_ruler::ruler::Tokenizer;
    /// let tokens = Tokenizer::new().tokenize("I like Python 3.11.");
    /// let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, vec!["I", "like", "Python", "3.11", "."]);
    /// ```
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for chunk in CHUNK_PATTERN.find_iter(text) {
            split_chunk(chunk.as_str(), chunk.start(), &mut tokens);
        }
        tokens
    }
}

/// Convenience wrapper over [`Tokenizer::tokenize`].
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer.tokenize(text)
}

fn split_chunk(chunk: &str, offset: usize, tokens: &mut Vec<Token>) {
    if chunk.chars().all(is_punctuation) {
        tokens.push(Token::new(chunk, offset));
        return;
    }

    let mut start = 0;
    let mut end = chunk.len();

    // Leading punctuation, one token per character.
    while let Some(c) = chunk[start..end].chars().next() {
        if !PREFIXES.contains(&c) || start + c.len_utf8() >= end {
            break;
        }
        tokens.push(Token::new(c.to_string(), offset + start));
        start += c.len_utf8();
    }

    // Trailing punctuation is collected back to front and emitted after the core.
    let mut suffixes = Vec::new();
    while let Some(c) = chunk[start..end].chars().next_back() {
        if !SUFFIXES.contains(&c) || end - c.len_utf8() <= start {
            break;
        }
        let core = &chunk[start..end - c.len_utf8()];
        if c == '.' && ABBREVIATION_PATTERN.is_match(core) {
            break;
        }
        end -= c.len_utf8();
        suffixes.push(Token::new(c.to_string(), offset + end));
    }

    tokens.push(Token::new(&chunk[start..end], offset + start));
    tokens.extend(suffixes.into_iter().rev());
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || PREFIXES.contains(&c) || SUFFIXES.contains(&c)
}
