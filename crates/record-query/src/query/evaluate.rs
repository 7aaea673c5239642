//! Typed evaluation of predicates against field values.
//!
//! | kind    | equality | ordering | isLike |
//! |---------|----------|----------|--------|
//! | string  | yes      | yes      | yes    |
//! | date    | yes      | yes      | no     |
//! | boolean | yes      | no       | no     |
//! | integer | yes      | yes      | no     |
//! | decimal | yes      | yes      | no     |
//!
//! `none` places no constraint and matches every value. String and date
//! fields without a value never match, whatever the operator.
//! [`check_supported`] applies this table without looking at a value.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::error::{QueryError, Result};
use crate::fields::{FieldKind, FieldValue};

use super::operator::Operator;
use super::predicate::QueryPredicate;
use super::text_match::{compare_ignore_case, contains_ignore_case};
use super::value::{
    parse_boolean, parse_date, parse_decimal, parse_integer, untagged_operand, BooleanParsing,
};

/// Evaluates predicates against typed field values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    boolean_parsing: BooleanParsing,
}

impl Evaluator {
    pub fn new(boolean_parsing: BooleanParsing) -> Self {
        Self { boolean_parsing }
    }

    pub fn boolean_parsing(&self) -> BooleanParsing {
        self.boolean_parsing
    }

    /// Evaluates a parsed predicate against a field value.
    pub fn matches(&self, predicate: &QueryPredicate, actual: FieldValue<'_>) -> Result<bool> {
        self.evaluate(actual, predicate.operator(), predicate.values())
    }

    /// Dispatches to the comparison rule of the value's kind.
    pub fn evaluate(
        &self,
        actual: FieldValue<'_>,
        operator: Operator,
        expected: &[String],
    ) -> Result<bool> {
        let matched = match actual {
            FieldValue::String(value) => evaluate_string(value, operator, expected)?,
            FieldValue::Date(value) => evaluate_date(value, operator, expected)?,
            FieldValue::Boolean(value) => {
                evaluate_boolean(value, operator, expected, self.boolean_parsing)?
            }
            FieldValue::Integer(value) => evaluate_integer(value, operator, expected)?,
            FieldValue::Decimal(value) => evaluate_decimal(value, operator, expected)?,
        };
        log::trace!(
            "evaluate({actual:?}.{operator}({})) -> {matched}",
            expected.join(",")
        );
        Ok(matched)
    }
}

pub fn evaluate_string(actual: Option<&str>, operator: Operator, expected: &[String]) -> Result<bool> {
    let Some(actual) = actual else {
        return Ok(false);
    };
    if operator == Operator::None {
        return Ok(true);
    }
    let operand = untagged_operand(first_operand(operator, expected)?, FieldKind::String)?;
    if operator == Operator::IsLike {
        return Ok(contains_ignore_case(actual, operand));
    }
    Ok(ordering_matches(operator, compare_ignore_case(actual, operand)))
}

pub fn evaluate_date(
    actual: Option<NaiveDate>,
    operator: Operator,
    expected: &[String],
) -> Result<bool> {
    let Some(actual) = actual else {
        return Ok(false);
    };
    check_supported(FieldKind::Date, operator)?;
    if operator == Operator::None {
        return Ok(true);
    }
    let operand = parse_date(untagged_operand(
        first_operand(operator, expected)?,
        FieldKind::Date,
    )?)?;
    Ok(ordering_matches(operator, actual.cmp(&operand)))
}

pub fn evaluate_boolean(
    actual: bool,
    operator: Operator,
    expected: &[String],
    parsing: BooleanParsing,
) -> Result<bool> {
    check_supported(FieldKind::Boolean, operator)?;
    if operator == Operator::None {
        return Ok(true);
    }
    let operand = parse_boolean(
        untagged_operand(first_operand(operator, expected)?, FieldKind::Boolean)?,
        parsing,
    )?;
    Ok((actual == operand) == (operator == Operator::EqualTo))
}

pub fn evaluate_integer(actual: i64, operator: Operator, expected: &[String]) -> Result<bool> {
    check_supported(FieldKind::Integer, operator)?;
    if operator == Operator::None {
        return Ok(true);
    }
    let operand = parse_integer(untagged_operand(
        first_operand(operator, expected)?,
        FieldKind::Integer,
    )?)?;
    Ok(ordering_matches(operator, actual.cmp(&operand)))
}

pub fn evaluate_decimal(actual: f64, operator: Operator, expected: &[String]) -> Result<bool> {
    check_supported(FieldKind::Decimal, operator)?;
    if operator == Operator::None {
        return Ok(true);
    }
    let operand = parse_decimal(untagged_operand(
        first_operand(operator, expected)?,
        FieldKind::Decimal,
    )?)?;
    // A NaN field value is unordered and only satisfies notEqualTo.
    Ok(match actual.partial_cmp(&operand) {
        Some(ordering) => ordering_matches(operator, ordering),
        None => operator == Operator::NotEqualTo,
    })
}

/// Rejects operators that have no meaning for values of `kind`.
///
/// Depends only on the field kind, so it can run before any record is read.
pub fn check_supported(kind: FieldKind, operator: Operator) -> Result<()> {
    let hint = match (kind, operator) {
        (_, Operator::None) | (FieldKind::String, _) => return Ok(()),
        (FieldKind::Date, Operator::IsLike) => Some("substring matching on dates is undefined"),
        (FieldKind::Integer | FieldKind::Decimal, Operator::IsLike) => None,
        (FieldKind::Boolean, op) if op.is_ordering() || op == Operator::IsLike => None,
        _ => return Ok(()),
    };
    Err(QueryError::UnsupportedOperator {
        operator,
        kind,
        hint,
    })
}

fn first_operand(operator: Operator, expected: &[String]) -> Result<&str> {
    expected
        .first()
        .map(String::as_str)
        .ok_or(QueryError::MissingOperand { operator })
}

/// Applies an equality or ordering operator to a comparison result.
fn ordering_matches(operator: Operator, ordering: Ordering) -> bool {
    match operator {
        Operator::EqualTo => ordering == Ordering::Equal,
        Operator::NotEqualTo => ordering != Ordering::Equal,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::GreaterThanOrEqualTo => ordering != Ordering::Less,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::LessThanOrEqualTo => ordering != Ordering::Greater,
        Operator::IsLike | Operator::None => true,
    }
}
