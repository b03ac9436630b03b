//! Declarative pattern records as written by rule authors.
//!
//! A record is either a token pattern:
//!
//! ```json
//! {"label": "PROGLANG", "pattern": [{"LOWER": "python"}, {"TEXT": {"REGEX": "\\d+(\\.\\d+)*"}}]}
//! ```
//!
//! or a phrase pattern, which is tokenized and matched token by token:
//!
//! ```json
//! {"label": "ORG", "pattern": "Apple Inc", "id": "apple"}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One element of a token pattern: attribute name to attribute value.
///
/// Values are either a literal (`"python"`) or an operator map
/// (`{"IN": [...]}`, `{"REGEX": "..."}`). Interpretation happens when the
/// pattern set is built.
pub type TokenSpec = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub label: String,
    pub pattern: PatternBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternBody {
    Phrase(String),
    Tokens(Vec<TokenSpec>),
}

impl PatternRecord {
    pub fn tokens(label: impl Into<String>, specs: Vec<TokenSpec>) -> Self {
        Self {
            label: label.into(),
            pattern: PatternBody::Tokens(specs),
            id: None,
        }
    }

    pub fn phrase(label: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: PatternBody::Phrase(phrase.into()),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
