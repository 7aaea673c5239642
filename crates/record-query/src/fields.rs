//! Typed field accessors for record types.
//!
//! A [`FieldMap`] is built once per record type and maps each queryable
//! feature name to a function extracting the field's current value.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::query::compare_ignore_case;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Date,
    Boolean,
    Integer,
    Decimal,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current value of a field, borrowed from its record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    String(Option<&'a str>),
    Date(Option<NaiveDate>),
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Date(_) => FieldKind::Date,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Integer(_) => FieldKind::Integer,
            Self::Decimal(_) => FieldKind::Decimal,
        }
    }

    /// Orders two values of the same field for sorting.
    ///
    /// Strings compare ignoring case, absent values sort first. Values of
    /// different kinds are ordered by kind so the ordering stays total.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::String(left), Self::String(right)) => match (left, right) {
                (Some(left), Some(right)) => compare_ignore_case(left, right),
                _ => left.is_some().cmp(&right.is_some()),
            },
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            (Self::Boolean(left), Self::Boolean(right)) => left.cmp(right),
            (Self::Integer(left), Self::Integer(right)) => left.cmp(right),
            (Self::Decimal(left), Self::Decimal(right)) => left.total_cmp(right),
            _ => (self.kind() as u8).cmp(&(other.kind() as u8)),
        }
    }
}

/// Extraction function for one field of `R`.
pub enum FieldAccessor<R> {
    String(fn(&R) -> Option<&str>),
    Date(fn(&R) -> Option<NaiveDate>),
    Boolean(fn(&R) -> bool),
    Integer(fn(&R) -> i64),
    Decimal(fn(&R) -> f64),
}

// Derived impls would require `R: Clone`.
impl<R> Clone for FieldAccessor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldAccessor<R> {}

impl<R> FieldAccessor<R> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Date(_) => FieldKind::Date,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Integer(_) => FieldKind::Integer,
            Self::Decimal(_) => FieldKind::Decimal,
        }
    }

    pub fn extract<'a>(&self, record: &'a R) -> FieldValue<'a> {
        match self {
            Self::String(get) => FieldValue::String(get(record)),
            Self::Date(get) => FieldValue::Date(get(record)),
            Self::Boolean(get) => FieldValue::Boolean(get(record)),
            Self::Integer(get) => FieldValue::Integer(get(record)),
            Self::Decimal(get) => FieldValue::Decimal(get(record)),
        }
    }
}

impl<R> fmt::Debug for FieldAccessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldAccessor::{}", self.kind())
    }
}

/// Mapping from feature name to typed accessor for a record type.
///
/// Name the record type when building, so the accessor closures can be
/// typed:
///
/// ```
/// use record_query::FieldMap;
///
/// struct Contact {
///     name: String,
///     visits: i64,
/// }
///
/// let fields = FieldMap::<Contact>::new()
///     .string("name", |c| Some(c.name.as_str()))
///     .integer("visits", |c| c.visits);
/// assert_eq!(fields.names().collect::<Vec<_>>(), ["name", "visits"]);
/// ```
pub struct FieldMap<R> {
    fields: BTreeMap<String, FieldAccessor<R>>,
}

impl<R> Default for FieldMap<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> FieldMap<R> {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Registers an accessor, replacing any accessor with the same name.
    pub fn insert(&mut self, name: impl Into<String>, accessor: FieldAccessor<R>) {
        self.fields.insert(name.into(), accessor);
    }

    pub fn string(mut self, name: &str, get: fn(&R) -> Option<&str>) -> Self {
        self.insert(name, FieldAccessor::String(get));
        self
    }

    pub fn date(mut self, name: &str, get: fn(&R) -> Option<NaiveDate>) -> Self {
        self.insert(name, FieldAccessor::Date(get));
        self
    }

    pub fn boolean(mut self, name: &str, get: fn(&R) -> bool) -> Self {
        self.insert(name, FieldAccessor::Boolean(get));
        self
    }

    pub fn integer(mut self, name: &str, get: fn(&R) -> i64) -> Self {
        self.insert(name, FieldAccessor::Integer(get));
        self
    }

    pub fn decimal(mut self, name: &str, get: fn(&R) -> f64) -> Self {
        self.insert(name, FieldAccessor::Decimal(get));
        self
    }

    /// Resolves a feature name.
    ///
    /// An exact match wins; otherwise names are compared ignoring ASCII case,
    /// so `forAllName()` resolves a field registered as `name`.
    pub fn get(&self, feature: &str) -> Option<&FieldAccessor<R>> {
        self.fields.get(feature).or_else(|| {
            self.fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(feature))
                .map(|(_, accessor)| accessor)
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R> fmt::Debug for FieldMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}
