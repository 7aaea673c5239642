//! Operator and quantor vocabulary of the predicate language.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison applied by a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    EqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    NotEqualTo,
    IsLike,
    None,
}

// ---------------------------------------------------------------------------
// Operator name table
// ---------------------------------------------------------------------------

/// Upper-cased operator names as they are matched by the parser.
const OPERATOR_NAMES: &[(&str, Operator)] = &[
    ("EQUALTO", Operator::EqualTo),
    ("GREATERTHAN", Operator::GreaterThan),
    ("GREATERTHANOREQUALTO", Operator::GreaterThanOrEqualTo),
    ("LESSTHAN", Operator::LessThan),
    ("LESSTHANOREQUALTO", Operator::LessThanOrEqualTo),
    ("NOTEQUALTO", Operator::NotEqualTo),
    ("ISLIKE", Operator::IsLike),
    ("NONE", Operator::None),
];

impl Operator {
    /// Looks up an operator by name, ignoring case.
    pub fn lookup(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        OPERATOR_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == upper)
            .map(|(_, operator)| *operator)
    }

    /// Upper-cased name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::EqualTo => "EQUALTO",
            Self::GreaterThan => "GREATERTHAN",
            Self::GreaterThanOrEqualTo => "GREATERTHANOREQUALTO",
            Self::LessThan => "LESSTHAN",
            Self::LessThanOrEqualTo => "LESSTHANOREQUALTO",
            Self::NotEqualTo => "NOTEQUALTO",
            Self::IsLike => "ISLIKE",
            Self::None => "NONE",
        }
    }

    /// Name as written in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EqualTo => "equalTo",
            Self::GreaterThan => "greaterThan",
            Self::GreaterThanOrEqualTo => "greaterThanOrEqualTo",
            Self::LessThan => "lessThan",
            Self::LessThanOrEqualTo => "lessThanOrEqualTo",
            Self::NotEqualTo => "notEqualTo",
            Self::IsLike => "isLike",
            Self::None => "none",
        }
    }

    /// Returns true for the four ordering operators.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::GreaterThan
                | Self::GreaterThanOrEqualTo
                | Self::LessThan
                | Self::LessThanOrEqualTo
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Quantor
// ---------------------------------------------------------------------------

/// Quantifier prefix of a predicate.
///
/// Carried as metadata only: evaluation treats all quantors alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Quantor {
    ForAll,
    ThereExists,
    #[default]
    None,
}

const QUANTOR_PREFIXES: &[(&str, Quantor)] = &[
    ("forAll", Quantor::ForAll),
    ("thereExists", Quantor::ThereExists),
];

impl Quantor {
    /// Detects the quantor prefix of a raw predicate.
    pub fn detect(predicate: &str) -> Self {
        QUANTOR_PREFIXES
            .iter()
            .find(|(prefix, _)| predicate.starts_with(prefix))
            .map(|(_, quantor)| *quantor)
            .unwrap_or(Self::None)
    }

    /// Byte offset at which the feature name starts.
    pub fn offset(self) -> usize {
        self.as_str().len()
    }

    /// Prefix as written in query strings; empty for [`Quantor::None`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForAll => "forAll",
            Self::ThereExists => "thereExists",
            Self::None => "",
        }
    }
}

impl fmt::Display for Quantor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForAll => f.write_str("FOR_ALL"),
            Self::ThereExists => f.write_str("THERE_EXISTS"),
            Self::None => f.write_str("NONE"),
        }
    }
}
