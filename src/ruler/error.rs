//! Errors raised while compiling pattern records into a pattern set.

/// Error type for pattern compilation.
///
/// Every variant carries `record`, the 0-based position of the offending
/// record in the input list.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidPatternError {
    /// Record has no token specs
    EmptyPattern { record: usize },

    /// Record has a blank label
    EmptyLabel { record: usize },

    /// Phrase pattern that produced no tokens
    EmptyPhrase { record: usize },

    /// Token spec with no attributes (`{}`)
    EmptyTokenSpec { record: usize, position: usize },

    /// Attribute key not understood (e.g. `"SHAPE"`)
    UnknownAttribute {
        record: usize,
        position: usize,
        attribute: String,
    },

    /// Operator key not understood (e.g. `{"LOWER": {"NOT_IN": [...]}}`)
    UnknownOperator {
        record: usize,
        position: usize,
        operator: String,
    },

    /// Attribute or operator value of the wrong shape
    InvalidValue {
        record: usize,
        position: usize,
        message: String,
    },

    /// POS value outside the Universal POS tag set
    UnknownPosTag {
        record: usize,
        position: usize,
        tag: String,
    },

    /// Regex that failed to compile
    InvalidRegex {
        record: usize,
        position: usize,
        pattern: String,
        message: String,
    },
}

impl InvalidPatternError {
    /// Index of the record that failed to compile.
    pub fn record(&self) -> usize {
        match self {
            Self::EmptyPattern { record }
            | Self::EmptyLabel { record }
            | Self::EmptyPhrase { record }
            | Self::EmptyTokenSpec { record, .. }
            | Self::UnknownAttribute { record, .. }
            | Self::UnknownOperator { record, .. }
            | Self::InvalidValue { record, .. }
            | Self::UnknownPosTag { record, .. }
            | Self::InvalidRegex { record, .. } => *record,
        }
    }
}

impl std::fmt::Display for InvalidPatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPattern { record } => {
                write!(f, "Pattern record {} has no token specs", record)
            }
            Self::EmptyLabel { record } => write!(f, "Pattern record {} has an empty label", record),
            Self::EmptyPhrase { record } => {
                write!(f, "Phrase pattern in record {} produced no tokens", record)
            }
            Self::EmptyTokenSpec { record, position } => write!(
                f,
                "Empty token spec at position {} in pattern record {}",
                position, record
            ),
            Self::UnknownAttribute {
                record,
                position,
                attribute,
            } => write!(
                f,
                "Unknown attribute '{}' at position {} in pattern record {}",
                attribute, position, record
            ),
            Self::UnknownOperator {
                record,
                position,
                operator,
            } => write!(
                f,
                "Unknown operator '{}' at position {} in pattern record {}",
                operator, position, record
            ),
            Self::InvalidValue {
                record,
                position,
                message,
            } => write!(
                f,
                "Invalid value at position {} in pattern record {}: {}",
                position, record, message
            ),
            Self::UnknownPosTag {
                record,
                position,
                tag,
            } => write!(
                f,
                "Unknown POS tag '{}' at position {} in pattern record {}",
                tag, position, record
            ),
            Self::InvalidRegex {
                record,
                position,
                pattern,
                message,
            } => write!(
                f,
                "Invalid regex '{}' at position {} in pattern record {}: {}",
                pattern, position, record, message
            ),
        }
    }
}

impl std::error::Error for InvalidPatternError {}
