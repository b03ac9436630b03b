//! Compiled patterns and the pattern set.
//!
//! [`PatternSet::build`] turns declarative [`PatternRecord`]s into
//! [`Pattern`]s: every token spec is resolved into a [`Predicate`] and every
//! regex is compiled here, so malformed rules are reported before any text
//! is scanned and the scanning loop never touches a regex compiler.

use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use serde_json::Value;

use super::error::InvalidPatternError;
use super::models::PosTag;
use super::predicate::{FullMatchRegex, Predicate};
use super::rules::{PatternBody, PatternRecord, TokenSpec};
use super::tokenize::Tokenizer;

/// A labeled sequence of predicates, one per consecutive token.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub label: String,
    pub id: Option<String>,
    predicates: Vec<Predicate>,
}

impl Pattern {
    /// Never empty; [`PatternSet::build`] rejects empty patterns.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of tokens a match of this pattern covers.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Ordered, immutable collection of patterns.
///
/// Order only matters as a tie-break between candidates with the same start
/// and length: the earlier pattern wins.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile records into a pattern set.
    ///
    /// Fails on the first record that has no token specs, an empty label, an
    /// unknown attribute or operator, a malformed value, or a regex that does
    /// not compile. No partial set is returned.
    pub fn build<'a, I>(records: I) -> Result<Self, InvalidPatternError>
    where
        I: IntoIterator<Item = &'a PatternRecord>,
    {
        let tokenizer = Tokenizer::new();
        let patterns = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| compile_record(index, record, &tokenizer))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Distinct labels, sorted.
    pub fn labels(&self) -> Vec<String> {
        self.patterns
            .iter()
            .map(|p| p.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Length of the longest pattern, 0 for an empty set.
    pub fn max_pattern_len(&self) -> usize {
        self.patterns.iter().map(Pattern::len).max().unwrap_or(0)
    }
}

fn compile_record(
    index: usize,
    record: &PatternRecord,
    tokenizer: &Tokenizer,
) -> Result<Pattern, InvalidPatternError> {
    if record.label.trim().is_empty() {
        return Err(InvalidPatternError::EmptyLabel { record: index });
    }

    let predicates = match &record.pattern {
        PatternBody::Phrase(phrase) => {
            let predicates: Vec<Predicate> = tokenizer
                .tokenize(phrase)
                .into_iter()
                .map(|token| Predicate::ExactText(token.text))
                .collect();
            if predicates.is_empty() {
                return Err(InvalidPatternError::EmptyPhrase { record: index });
            }
            predicates
        }
        PatternBody::Tokens(specs) => {
            if specs.is_empty() {
                return Err(InvalidPatternError::EmptyPattern { record: index });
            }
            specs
                .iter()
                .enumerate()
                .map(|(position, spec)| {
                    SpecCompiler {
                        record: index,
                        position,
                    }
                    .compile(spec)
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(Pattern {
        label: record.label.clone(),
        id: record.id.clone(),
        predicates,
    })
}

/// Attributes a token spec may test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Lower,
    Text,
    Pos,
}

/// Compiles one token spec; carries its location for error reporting.
struct SpecCompiler {
    record: usize,
    position: usize,
}

impl SpecCompiler {
    fn compile(&self, spec: &TokenSpec) -> Result<Predicate, InvalidPatternError> {
        if spec.is_empty() {
            return Err(InvalidPatternError::EmptyTokenSpec {
                record: self.record,
                position: self.position,
            });
        }

        let mut predicates = spec
            .iter()
            .map(|(key, value)| self.compile_entry(key, value))
            .collect::<Result<Vec<_>, _>>()?;

        if predicates.len() == 1 {
            Ok(predicates.remove(0))
        } else {
            Ok(Predicate::All(predicates))
        }
    }

    fn compile_entry(&self, key: &str, value: &Value) -> Result<Predicate, InvalidPatternError> {
        match key.to_ascii_uppercase().as_str() {
            "LOWER" => self.compile_attribute(Attribute::Lower, value),
            "TEXT" | "ORTH" => self.compile_attribute(Attribute::Text, value),
            "POS" => self.compile_attribute(Attribute::Pos, value),
            // Bare REGEX tests the raw token text.
            "REGEX" => {
                let source = self.expect_str(value, "REGEX")?;
                Ok(Predicate::TextRegex(self.compile_regex(source)?))
            }
            _ => Err(InvalidPatternError::UnknownAttribute {
                record: self.record,
                position: self.position,
                attribute: key.to_string(),
            }),
        }
    }

    fn compile_attribute(
        &self,
        attribute: Attribute,
        value: &Value,
    ) -> Result<Predicate, InvalidPatternError> {
        match value {
            Value::String(literal) => self.literal(attribute, literal),
            Value::Object(operators) => {
                if operators.is_empty() {
                    return Err(self.invalid("operator map is empty"));
                }
                let mut predicates = operators
                    .iter()
                    .map(|(op, arg)| self.operator(attribute, op, arg))
                    .collect::<Result<Vec<_>, _>>()?;
                if predicates.len() == 1 {
                    Ok(predicates.remove(0))
                } else {
                    Ok(Predicate::All(predicates))
                }
            }
            other => Err(self.invalid(&format!(
                "expected a string or an operator map, found {}",
                other
            ))),
        }
    }

    fn literal(&self, attribute: Attribute, literal: &str) -> Result<Predicate, InvalidPatternError> {
        match attribute {
            Attribute::Lower => Ok(Predicate::ExactLower(literal.to_string())),
            Attribute::Text => Ok(Predicate::ExactText(literal.to_string())),
            Attribute::Pos => Ok(Predicate::PosIs(self.pos_tag(literal)?)),
        }
    }

    fn operator(
        &self,
        attribute: Attribute,
        op: &str,
        arg: &Value,
    ) -> Result<Predicate, InvalidPatternError> {
        match (op.to_ascii_uppercase().as_str(), attribute) {
            ("IN", Attribute::Pos) => {
                let tags = self
                    .string_list(arg)?
                    .into_iter()
                    .map(|tag| self.pos_tag(tag))
                    .collect::<Result<HashSet<_>, _>>()?;
                Ok(Predicate::PosIn(tags))
            }
            ("IN", Attribute::Lower) => Ok(Predicate::LowerIn(self.string_set(arg)?)),
            ("IN", Attribute::Text) => Ok(Predicate::TextIn(self.string_set(arg)?)),
            ("REGEX", Attribute::Lower) => {
                let source = self.expect_str(arg, "REGEX")?;
                Ok(Predicate::LowerRegex(self.compile_regex(source)?))
            }
            ("REGEX", Attribute::Text) => {
                let source = self.expect_str(arg, "REGEX")?;
                Ok(Predicate::TextRegex(self.compile_regex(source)?))
            }
            _ => Err(InvalidPatternError::UnknownOperator {
                record: self.record,
                position: self.position,
                operator: op.to_string(),
            }),
        }
    }

    fn compile_regex(&self, source: &str) -> Result<FullMatchRegex, InvalidPatternError> {
        FullMatchRegex::new(source).map_err(|e| InvalidPatternError::InvalidRegex {
            record: self.record,
            position: self.position,
            pattern: source.to_string(),
            message: e.to_string(),
        })
    }

    fn pos_tag(&self, tag: &str) -> Result<PosTag, InvalidPatternError> {
        PosTag::from_str(tag).map_err(|_| InvalidPatternError::UnknownPosTag {
            record: self.record,
            position: self.position,
            tag: tag.to_string(),
        })
    }

    fn expect_str<'v>(&self, value: &'v Value, what: &str) -> Result<&'v str, InvalidPatternError> {
        value
            .as_str()
            .ok_or_else(|| self.invalid(&format!("{} expects a string, found {}", what, value)))
    }

    fn string_list<'v>(&self, value: &'v Value) -> Result<Vec<&'v str>, InvalidPatternError> {
        let items = value
            .as_array()
            .ok_or_else(|| self.invalid(&format!("IN expects a list, found {}", value)))?;
        if items.is_empty() {
            return Err(self.invalid("IN list is empty"));
        }
        items
            .iter()
            .map(|item| self.expect_str(item, "IN"))
            .collect()
    }

    fn string_set(&self, value: &Value) -> Result<HashSet<String>, InvalidPatternError> {
        Ok(self
            .string_list(value)?
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn invalid(&self, message: &str) -> InvalidPatternError {
        InvalidPatternError::InvalidValue {
            record: self.record,
            position: self.position,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruler::models::Token;
    use crate::ruler::test_utils::{record, spec};
    use serde_json::json;

    fn build_one(value: serde_json::Value) -> Result<PatternSet, InvalidPatternError> {
        let record: PatternRecord = serde_json::from_value(value).unwrap();
        PatternSet::build(&[record])
    }

    fn first_predicate(value: serde_json::Value) -> Predicate {
        let set = build_one(value).unwrap();
        set.patterns()[0].predicates()[0].clone()
    }

    #[test]
    fn test_build_keeps_input_order() {
        let records = vec![
            record("PROGLANG", vec![spec(json!({"LOWER": "python"}))]),
            record("FRAMEWORK", vec![spec(json!({"LOWER": "django"}))]),
        ];
        let set = PatternSet::build(&records).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.patterns()[0].label, "PROGLANG");
        assert_eq!(set.patterns()[1].label, "FRAMEWORK");
        assert_eq!(set.labels(), vec!["FRAMEWORK", "PROGLANG"]);
        assert_eq!(set.max_pattern_len(), 1);
    }

    #[test]
    fn test_empty_record_list_builds_empty_set() {
        let records: Vec<PatternRecord> = Vec::new();
        let set = PatternSet::build(&records).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.max_pattern_len(), 0);
    }

    #[test]
    fn test_lower_literal() {
        let p = first_predicate(json!({"label": "L", "pattern": [{"LOWER": "python"}]}));
        assert!(matches!(p, Predicate::ExactLower(ref v) if v == "python"));
    }

    #[test]
    fn test_lower_in() {
        let p = first_predicate(
            json!({"label": "L", "pattern": [{"LOWER": {"IN": ["node", "nodejs", "js", "javascript"]}}]}),
        );
        let Predicate::LowerIn(values) = p else {
            panic!("expected LowerIn, got {:?}", p);
        };
        assert_eq!(values.len(), 4);
        assert!(values.contains("js"));
    }

    #[test]
    fn test_regex_variants() {
        let p = first_predicate(json!({"label": "L", "pattern": [{"LOWER": {"REGEX": "py.*"}}]}));
        assert!(matches!(p, Predicate::LowerRegex(_)));

        let p = first_predicate(json!({"label": "L", "pattern": [{"TEXT": {"REGEX": "\\d+"}}]}));
        assert!(matches!(p, Predicate::TextRegex(_)));

        let p = first_predicate(json!({"label": "L", "pattern": [{"REGEX": "\\d+"}]}));
        assert!(matches!(p, Predicate::TextRegex(_)));
    }

    #[test]
    fn test_text_and_orth_literals() {
        let p = first_predicate(json!({"label": "L", "pattern": [{"TEXT": "Go"}]}));
        assert!(matches!(p, Predicate::ExactText(ref v) if v == "Go"));

        let p = first_predicate(json!({"label": "L", "pattern": [{"ORTH": "Go"}]}));
        assert!(matches!(p, Predicate::ExactText(ref v) if v == "Go"));

        let p = first_predicate(json!({"label": "L", "pattern": [{"TEXT": {"IN": ["C", "C++"]}}]}));
        assert!(matches!(p, Predicate::TextIn(_)));
    }

    #[test]
    fn test_attribute_keys_are_case_insensitive() {
        let p = first_predicate(json!({"label": "L", "pattern": [{"lower": {"in": ["a"]}}]}));
        assert!(matches!(p, Predicate::LowerIn(_)));
    }

    #[test]
    fn test_pos_attribute() {
        let p = first_predicate(json!({"label": "L", "pattern": [{"POS": "PROPN"}]}));
        assert!(matches!(p, Predicate::PosIs(PosTag::Propn)));

        let p = first_predicate(json!({"label": "L", "pattern": [{"POS": {"IN": ["NOUN", "PROPN"]}}]}));
        let Predicate::PosIn(tags) = p else {
            panic!("expected PosIn, got {:?}", p);
        };
        assert!(tags.contains(&PosTag::Noun) && tags.contains(&PosTag::Propn));
    }

    #[test]
    fn test_multiple_attributes_become_conjunction() {
        let p = first_predicate(json!({"label": "L", "pattern": [{"LOWER": "rust", "POS": "PROPN"}]}));
        let Predicate::All(inner) = &p else {
            panic!("expected All, got {:?}", p);
        };
        assert_eq!(inner.len(), 2);
        assert!(p.matches(&Token::new("Rust", 0).with_pos(PosTag::Propn)));
        assert!(!p.matches(&Token::new("Rust", 0)));
    }

    #[test]
    fn test_phrase_pattern_tokenizes_into_exact_text() {
        let set = build_one(json!({"label": "ORG", "pattern": "Apple Inc.", "id": "apple"})).unwrap();
        let pattern = &set.patterns()[0];
        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern.id.as_deref(), Some("apple"));
        assert!(
            pattern
                .predicates()
                .iter()
                .all(|p| matches!(p, Predicate::ExactText(_)))
        );
    }

    #[test]
    fn test_rejects_empty_pattern() {
        let err = build_one(json!({"label": "L", "pattern": []})).unwrap_err();
        assert_eq!(err, InvalidPatternError::EmptyPattern { record: 0 });
    }

    #[test]
    fn test_rejects_empty_phrase() {
        let err = build_one(json!({"label": "L", "pattern": "   "})).unwrap_err();
        assert_eq!(err, InvalidPatternError::EmptyPhrase { record: 0 });
    }

    #[test]
    fn test_rejects_empty_label() {
        let err = build_one(json!({"label": " ", "pattern": [{"LOWER": "x"}]})).unwrap_err();
        assert_eq!(err, InvalidPatternError::EmptyLabel { record: 0 });
    }

    #[test]
    fn test_rejects_empty_token_spec() {
        let err = build_one(json!({"label": "L", "pattern": [{"LOWER": "x"}, {}]})).unwrap_err();
        assert_eq!(
            err,
            InvalidPatternError::EmptyTokenSpec {
                record: 0,
                position: 1
            }
        );
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let err = build_one(json!({"label": "L", "pattern": [{"SHAPE": "Xxxx"}]})).unwrap_err();
        assert!(matches!(err, InvalidPatternError::UnknownAttribute { ref attribute, .. } if attribute == "SHAPE"));
    }

    #[test]
    fn test_rejects_unknown_operator() {
        let err =
            build_one(json!({"label": "L", "pattern": [{"LOWER": {"NOT_IN": ["x"]}}]})).unwrap_err();
        assert!(matches!(err, InvalidPatternError::UnknownOperator { ref operator, .. } if operator == "NOT_IN"));

        // REGEX is not defined for POS.
        let err = build_one(json!({"label": "L", "pattern": [{"POS": {"REGEX": "N.*"}}]})).unwrap_err();
        assert!(matches!(err, InvalidPatternError::UnknownOperator { .. }));
    }

    #[test]
    fn test_rejects_malformed_values() {
        for pattern in [
            json!([{"LOWER": 3}]),
            json!([{"LOWER": {"IN": "python"}}]),
            json!([{"LOWER": {"IN": []}}]),
            json!([{"LOWER": {"IN": ["a", 1]}}]),
            json!([{"LOWER": {}}]),
            json!([{"REGEX": ["a"]}]),
        ] {
            let err = build_one(json!({"label": "L", "pattern": pattern.clone()})).unwrap_err();
            assert!(
                matches!(err, InvalidPatternError::InvalidValue { .. }),
                "{pattern}: {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_unknown_pos_tag() {
        let err = build_one(json!({"label": "L", "pattern": [{"POS": "NOUNISH"}]})).unwrap_err();
        assert!(matches!(err, InvalidPatternError::UnknownPosTag { ref tag, .. } if tag == "NOUNISH"));
    }

    #[test]
    fn test_rejects_uncompilable_regex() {
        let err =
            build_one(json!({"label": "L", "pattern": [{"LOWER": {"REGEX": "(python"}}]})).unwrap_err();
        assert!(matches!(err, InvalidPatternError::InvalidRegex { ref pattern, .. } if pattern == "(python"));
    }

    #[test]
    fn test_rejects_regex_that_only_compiles_when_wrapped() {
        let err =
            build_one(json!({"label": "L", "pattern": [{"LOWER": {"REGEX": "a)|(b"}}]})).unwrap_err();
        assert!(matches!(err, InvalidPatternError::InvalidRegex { ref pattern, .. } if pattern == "a)|(b"));
    }

    #[test]
    fn test_error_names_the_failing_record() {
        let records = vec![
            record("OK", vec![spec(json!({"LOWER": "python"}))]),
            record("BAD", vec![spec(json!({"TEXT": {"REGEX": "[unclosed"}}))]),
        ];
        let err = PatternSet::build(&records).unwrap_err();
        assert_eq!(err.record(), 1);
    }
}
