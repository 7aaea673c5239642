//! Sort predicate parsing.
//!
//! Sort clauses are `;`-separated. Each clause is a feature name, optionally
//! followed by `:asc` or `:desc`; a leading `-` is shorthand for `:desc`.

use std::fmt;

use serde::Serialize;

use crate::error::{QueryError, Result};

/// A feature name and direction used to order result sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortPredicate {
    feature: String,
    ascending: bool,
}

impl SortPredicate {
    pub fn new(feature: impl Into<String>, ascending: bool) -> Self {
        Self {
            feature: feature.into(),
            ascending,
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::InvalidSort("empty sort clause".to_string()));
        }

        let (feature, ascending) = if let Some(feature) = trimmed.strip_prefix('-') {
            (feature, false)
        } else if let Some((feature, direction)) = trimmed.split_once(':') {
            let ascending = match direction.to_ascii_lowercase().as_str() {
                "asc" => true,
                "desc" => false,
                _ => {
                    return Err(QueryError::InvalidSort(format!(
                        "unknown direction <{direction}> in <{raw}> (expected asc or desc)"
                    )))
                }
            };
            (feature, ascending)
        } else {
            (trimmed, true)
        };

        if feature.is_empty()
            || !feature
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(QueryError::InvalidSort(format!(
                "malformed feature in <{raw}>"
            )));
        }

        Ok(Self::new(feature, ascending))
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }
}

impl fmt::Display for SortPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.ascending { "asc" } else { "desc" };
        write!(f, "{}:{direction}", self.feature)
    }
}

/// Parses every `;`-separated clause of a sort expression.
pub fn parse_sort(expression: &str) -> Result<Vec<SortPredicate>> {
    expression
        .split(';')
        .filter(|clause| !clause.trim().is_empty())
        .map(SortPredicate::parse)
        .collect()
}
