//! Predicate-based filtering, sorting and pagination for record collections.
//!
//! This crate provides:
//! - A parser for the `{quantor}{feature}().{operator}(values)` predicate language
//! - Typed evaluation of predicates against string, date, boolean and numeric fields
//! - Feature registration mapping names onto record accessors
//! - A query handler that filters, sorts and pages in-memory collections

pub mod config;
pub mod error;
pub mod fields;
pub mod handler;
pub mod query;
pub mod types;

// Re-export main types
pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use fields::{FieldAccessor, FieldKind, FieldMap, FieldValue};
pub use handler::QueryHandler;
pub use query::{
    parse_filter, parse_sort, BooleanParsing, Evaluator, Operator, Quantor, QueryPredicate,
    SortPredicate,
};
pub use types::{ListRequest, Page, PageWindow};
