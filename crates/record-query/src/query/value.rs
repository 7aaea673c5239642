//! Conversion of textual operands into typed values.
//!
//! An operand may carry a type tag such as `:integer:42` or
//! `:dateTime:20240131`. A tag is optional; when present it must agree with
//! the kind of the field the predicate is evaluated against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::fields::FieldKind;

/// Date pattern accepted in operands, in the notation used in diagnostics.
pub const DATE_PATTERN: &str = "yyyyMMdd";

const DATE_FORMAT: &str = "%Y%m%d";

const VALUE_TAGS: &[(&str, FieldKind)] = &[
    (":dateTime:", FieldKind::Date),
    (":integer:", FieldKind::Integer),
    (":decimal:", FieldKind::Decimal),
    (":string:", FieldKind::String),
    (":boolean:", FieldKind::Boolean),
];

/// How boolean operands are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanParsing {
    /// `true` (any case) is true, every other literal is false.
    #[default]
    Lenient,
    /// Only `true` and `false` (any case) are accepted.
    Strict,
}

/// Splits an optional type tag off an operand.
pub fn split_value_tag(raw: &str) -> (Option<FieldKind>, &str) {
    for (tag, kind) in VALUE_TAGS {
        if let Some(prefix) = raw.get(..tag.len()) {
            if prefix.eq_ignore_ascii_case(tag) {
                return (Some(*kind), &raw[tag.len()..]);
            }
        }
    }
    (None, raw)
}

/// Strips the type tag of an operand, checking it against the field kind.
pub fn untagged_operand(raw: &str, kind: FieldKind) -> Result<&str> {
    match split_value_tag(raw) {
        (Some(tagged), _) if tagged != kind => Err(QueryError::InvalidValue {
            value: raw.to_string(),
            kind,
            expected: tag_expectation(kind),
        }),
        (_, operand) => Ok(operand),
    }
}

fn tag_expectation(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "untagged or tagged :string:",
        FieldKind::Date => "untagged or tagged :dateTime:",
        FieldKind::Boolean => "untagged or tagged :boolean:",
        FieldKind::Integer => "untagged or tagged :integer:",
        FieldKind::Decimal => "untagged or tagged :decimal:",
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let invalid = || QueryError::InvalidValue {
        value: raw.to_string(),
        kind: FieldKind::Date,
        expected: DATE_PATTERN,
    };
    if raw.len() != DATE_PATTERN.len() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

pub fn parse_boolean(raw: &str, parsing: BooleanParsing) -> Result<bool> {
    if raw.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    match parsing {
        BooleanParsing::Lenient => Ok(false),
        BooleanParsing::Strict if raw.eq_ignore_ascii_case("false") => Ok(false),
        BooleanParsing::Strict => Err(QueryError::InvalidValue {
            value: raw.to_string(),
            kind: FieldKind::Boolean,
            expected: "true or false",
        }),
    }
}

pub fn parse_integer(raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| QueryError::InvalidValue {
        value: raw.to_string(),
        kind: FieldKind::Integer,
        expected: "a base-10 integer",
    })
}

pub fn parse_decimal(raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(QueryError::InvalidValue {
            value: raw.to_string(),
            kind: FieldKind::Decimal,
            expected: "a finite decimal number",
        }),
    }
}
