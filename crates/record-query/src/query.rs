//! Predicate language: parsing and typed evaluation.
//!
//! This module provides:
//! - The operator and quantor vocabulary
//! - Predicate and sort clause parsing
//! - Operand conversion (dates, booleans, numbers, type tags)
//! - Per-kind evaluation of predicates against field values

mod evaluate;
mod operator;
mod predicate;
mod sort;
mod text_match;
mod value;

// Re-export public types
pub use evaluate::{
    check_supported, evaluate_boolean, evaluate_date, evaluate_decimal, evaluate_integer,
    evaluate_string, Evaluator,
};
pub use operator::{Operator, Quantor};
pub use predicate::{parse_filter, QueryPredicate};
pub use sort::{parse_sort, SortPredicate};
pub use text_match::{compare_ignore_case, contains_ignore_case};
pub use value::{split_value_tag, BooleanParsing, DATE_PATTERN};
