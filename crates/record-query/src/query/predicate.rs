//! Predicate parser.
//!
//! A predicate has the shape `[quantor]{feature}().{operator}({value},...)`.
//! The grammar has no nesting and no escaping, so the parser is a single
//! left-to-right scan over byte offsets rather than a tokenizer.

use std::fmt;

use serde::Serialize;

use crate::error::{QueryError, Result};

use super::operator::{Operator, Quantor};

const FEATURE_MARKER: &str = "()";

/// One parsed filter clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPredicate {
    quantor: Quantor,
    feature: String,
    operator: Operator,
    values: Vec<String>,
    raw: String,
}

impl QueryPredicate {
    /// Parses a single predicate.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(QueryError::syntax(raw, "Empty predicate found"));
        }

        let quantor = Quantor::detect(raw);
        let offset = quantor.offset();
        log::debug!("parse_quantor({raw}) -> {quantor}, offset {offset}");

        let (feature, rest) = parse_feature(raw, offset)?;
        let (operator, values_token) = parse_operator(raw, rest)?;
        let values = parse_values(values_token);
        log::debug!(
            "parse({raw}) -> feature {feature}, operator {operator}, {} value(s)",
            values.len()
        );

        Ok(Self {
            quantor,
            feature: feature.to_string(),
            operator,
            values,
            raw: raw.to_string(),
        })
    }

    /// Builds a predicate from its parts, as if it had been parsed from its
    /// serialized form.
    pub fn new(
        quantor: Quantor,
        feature: impl Into<String>,
        operator: Operator,
        values: Vec<String>,
    ) -> Self {
        let mut predicate = Self {
            quantor,
            feature: feature.into(),
            operator,
            values,
            raw: String::new(),
        };
        predicate.raw = predicate.to_string();
        predicate
    }

    pub fn quantor(&self) -> Quantor {
        self.quantor
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The predicate text as it appeared in the query.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for QueryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{FEATURE_MARKER}.{}({})",
            self.quantor.as_str(),
            self.feature,
            self.operator.as_str(),
            self.values.join(",")
        )
    }
}

/// Parses every `;`-separated clause of a filter expression.
///
/// Blank clauses are skipped, so an empty expression yields no predicates.
pub fn parse_filter(expression: &str) -> Result<Vec<QueryPredicate>> {
    expression
        .split(';')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(QueryPredicate::parse)
        .collect()
}

// ---------------------------------------------------------------------------
// Segment parsing
// ---------------------------------------------------------------------------

/// Extracts the feature name and returns the text following its `()` marker.
fn parse_feature(raw: &str, offset: usize) -> Result<(&str, &str)> {
    let token_end = raw[offset..]
        .find('(')
        .map(|index| offset + index + FEATURE_MARKER.len())
        .ok_or_else(|| QueryError::syntax(raw, "Feature missing"))?;

    if token_end < offset + FEATURE_MARKER.len() + 1 {
        return Err(QueryError::syntax(raw, "Feature missing"));
    }
    let Some(token) = raw.get(..token_end).filter(|t| t.ends_with(FEATURE_MARKER)) else {
        return Err(QueryError::syntax(
            raw,
            format!("Feature marker '{FEATURE_MARKER}' missing near byte {offset}"),
        ));
    };

    let feature = &token[offset..token.len() - FEATURE_MARKER.len()];
    if !is_identifier(feature) {
        return Err(QueryError::syntax(
            raw,
            format!("Malformed feature <{feature}> near byte {offset}"),
        ));
    }

    Ok((feature, &raw[token_end..]))
}

/// Extracts the operator following the `.` separator and returns the contents
/// of its parentheses.
fn parse_operator<'a>(raw: &str, rest: &'a str) -> Result<(Operator, &'a str)> {
    let position = raw.len() - rest.len();
    let Some(rest) = rest.strip_prefix('.') else {
        return Err(QueryError::syntax(
            raw,
            format!("Expected '.' after feature near byte {position}"),
        ));
    };

    let Some(open) = rest.find('(') else {
        return Err(QueryError::syntax(
            raw,
            format!("Missing '(' after operator near byte {}", position + 1),
        ));
    };
    let token = &rest[..open];
    if token.is_empty() {
        return Err(QueryError::syntax(raw, "Operator missing"));
    }

    let operator = Operator::lookup(token).ok_or_else(|| QueryError::UnknownOperator {
        predicate: raw.to_string(),
        operator: token.to_string(),
    })?;
    log::debug!("parse_operator({raw}, {token}) -> {operator}");

    let Some(values) = rest[open + 1..].strip_suffix(')') else {
        return Err(QueryError::syntax(
            raw,
            format!("Missing closing ')' near byte {}", raw.len()),
        ));
    };
    Ok((operator, values))
}

/// Splits the value list on `,`; an empty list yields no values.
fn parse_values(token: &str) -> Vec<String> {
    if token.is_empty() {
        return Vec::new();
    }
    token.split(',').map(str::to_string).collect()
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> QueryPredicate {
        QueryPredicate::parse(raw).expect("parse")
    }

    #[test]
    fn parses_plain_predicate() {
        let predicate = parse("name().equalTo(Hello)");
        assert_eq!(predicate.quantor(), Quantor::None);
        assert_eq!(predicate.feature(), "name");
        assert_eq!(predicate.operator(), Operator::EqualTo);
        assert_eq!(predicate.values(), ["Hello"]);
        assert_eq!(predicate.raw(), "name().equalTo(Hello)");
    }

    #[test]
    fn parses_quantified_predicates() {
        let predicate = parse("forAllname().isLike(ell)");
        assert_eq!(predicate.quantor(), Quantor::ForAll);
        assert_eq!(predicate.feature(), "name");
        assert_eq!(predicate.operator(), Operator::IsLike);

        let predicate = parse("thereExiststag().notEqualTo(x)");
        assert_eq!(predicate.quantor(), Quantor::ThereExists);
        assert_eq!(predicate.feature(), "tag");
    }

    #[test]
    fn accepts_single_character_features() {
        assert_eq!(parse("x().none()").feature(), "x");
        assert_eq!(parse("forAllx().none()").feature(), "x");
    }

    #[test]
    fn operator_names_ignore_case() {
        for raw in ["a().EQUALTO(1)", "a().equalTo(1)", "a().EqualTo(1)"] {
            assert_eq!(parse(raw).operator(), Operator::EqualTo, "{raw}");
        }
    }

    #[test]
    fn splits_values_without_trimming() {
        let predicate = parse("city().equalTo(Bern, Basel,Zug)");
        assert_eq!(predicate.values(), ["Bern", " Basel", "Zug"]);
    }

    #[test]
    fn empty_value_list_is_accepted() {
        assert!(parse("name().none()").values().is_empty());
        assert_eq!(parse("name().equalTo(,)").values(), ["", ""]);
    }

    #[test]
    fn values_may_contain_parentheses_and_dots() {
        let predicate = parse("title().isLike(v1.2 (beta))");
        assert_eq!(predicate.values(), ["v1.2 (beta)"]);
    }

    #[test]
    fn rejects_empty_predicate() {
        for raw in ["", "   "] {
            let err = QueryPredicate::parse(raw).expect_err("empty");
            assert!(matches!(err, QueryError::Syntax { .. }));
        }
    }

    #[test]
    fn rejects_missing_feature() {
        for raw in [
            "().equalTo(x)",
            "forAll().equalTo(x)",
            "thereExists().equalTo(x)",
            "name",
            "forAll",
        ] {
            let err = QueryPredicate::parse(raw).expect_err(raw);
            assert!(matches!(err, QueryError::Syntax { .. }), "{raw}: {err}");
        }
    }

    #[test]
    fn rejects_missing_feature_marker() {
        for raw in ["name(x).equalTo(y)", "name.equalTo(y)", "name(.equalTo(y)"] {
            let err = QueryPredicate::parse(raw).expect_err(raw);
            assert!(matches!(err, QueryError::Syntax { .. }), "{raw}: {err}");
        }
    }

    #[test]
    fn rejects_malformed_feature() {
        let err = QueryPredicate::parse("first name().equalTo(x)").expect_err("space");
        assert!(err.to_string().contains("Malformed feature"), "{err}");
    }

    #[test]
    fn rejects_missing_or_unknown_operator() {
        let err = QueryPredicate::parse("name().(x)").expect_err("empty operator");
        assert!(err.to_string().contains("Operator missing"), "{err}");

        let err = QueryPredicate::parse("name().contains(x)").expect_err("unknown");
        match err {
            QueryError::UnknownOperator { operator, .. } => assert_eq!(operator, "contains"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        for raw in ["name().equalTo(x", "name().equalTo", "name()equalTo(x)", "name().equalTo(x) "] {
            let err = QueryPredicate::parse(raw).expect_err(raw);
            assert!(matches!(err, QueryError::Syntax { .. }), "{raw}: {err}");
        }
    }

    #[test]
    fn error_message_names_predicate() {
        let err = QueryPredicate::parse("name().bogus(x)").expect_err("unknown");
        let message = err.to_string();
        assert!(message.contains("<name().bogus(x)>"), "{message}");
        assert!(message.contains("<bogus>"), "{message}");
    }

    #[test]
    fn serialized_form_reparses_to_equivalent_predicate() {
        for raw in [
            "name().equalTo(Hello)",
            "forAllname().isLike(ell)",
            "thereExistsTag().NOTEQUALTO(a,b,c)",
            "created().greaterThanOrEqualTo(20200115)",
            "flag().none()",
            "note().equalTo(, spaced ,)",
        ] {
            let predicate = parse(raw);
            let reparsed = parse(&predicate.to_string());
            assert_eq!(reparsed.quantor(), predicate.quantor(), "{raw}");
            assert_eq!(reparsed.feature(), predicate.feature(), "{raw}");
            assert_eq!(reparsed.operator(), predicate.operator(), "{raw}");
            assert_eq!(reparsed.values(), predicate.values(), "{raw}");
        }
    }

    #[test]
    fn constructed_predicate_carries_serialized_raw() {
        let predicate = QueryPredicate::new(
            Quantor::ThereExists,
            "tag",
            Operator::IsLike,
            vec!["red".to_string()],
        );
        assert_eq!(predicate.raw(), "thereExiststag().isLike(red)");
        assert_eq!(parse(predicate.raw()), predicate);
    }

    #[test]
    fn parse_filter_splits_clauses() {
        let predicates =
            parse_filter("name().isLike(a); age().greaterThan(3);;").expect("filter");
        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[1].feature(), "age");
        assert!(parse_filter("").expect("empty filter").is_empty());
    }

    #[test]
    fn parse_filter_fails_wholesale_on_one_bad_clause() {
        let err = parse_filter("name().isLike(a);age().between(1)").expect_err("bad clause");
        assert!(matches!(err, QueryError::UnknownOperator { .. }));
    }
}
