use crate::fields::FieldKind;
use crate::query::Operator;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid predicate found: <{predicate}>. {reason}. Correct syntax is {{quantor}}{{feature}}().{{operator}}(values).")]
    Syntax { predicate: String, reason: String },

    #[error("invalid predicate found: <{predicate}>. Invalid operator found: <{operator}>. Correct syntax is {{quantor}}{{feature}}().{{operator}}(values).")]
    UnknownOperator { predicate: String, operator: String },

    #[error("operator {operator} requires at least one value")]
    MissingOperand { operator: Operator },

    #[error("operator {operator} is not implemented for {kind} values{}", hint_suffix(.hint))]
    UnsupportedOperator {
        operator: Operator,
        kind: FieldKind,
        hint: Option<&'static str>,
    },

    #[error("query contains incorrect {kind} value <{value}>; must be {expected}")]
    InvalidValue {
        value: String,
        kind: FieldKind,
        expected: &'static str,
    },

    #[error("unknown feature: <{0}>")]
    UnknownFeature(String),

    #[error("invalid sort predicate: {0}")]
    InvalidSort(String),

    #[error("invalid page window: {0}")]
    InvalidWindow(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Returns true when the error was caused by the caller's request rather
    /// than by the host's configuration.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Io(_))
    }

    pub(crate) fn syntax(predicate: &str, reason: impl Into<String>) -> Self {
        Self::Syntax {
            predicate: predicate.to_string(),
            reason: reason.into(),
        }
    }
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    hint.map(|value| format!(": {value}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, QueryError>;
