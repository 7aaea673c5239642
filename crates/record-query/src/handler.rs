//! Filtering, sorting and pagination of record collections.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::fields::{FieldAccessor, FieldMap};
use crate::query::{
    check_supported, parse_filter, parse_sort, Evaluator, Quantor, QueryPredicate, SortPredicate,
};
use crate::types::{ListRequest, Page, PageWindow};

/// A predicate resolved against the accessor of its feature.
struct BoundPredicate<'p, R> {
    predicate: &'p QueryPredicate,
    accessor: FieldAccessor<R>,
}

/// A sort clause resolved against the accessor of its feature.
struct SortKey<R> {
    accessor: FieldAccessor<R>,
    ascending: bool,
}

/// Runs list requests over collections of `R`.
///
/// The handler holds no per-request state and can serve concurrent requests.
#[derive(Debug)]
pub struct QueryHandler<'f, R> {
    fields: &'f FieldMap<R>,
    config: QueryConfig,
    evaluator: Evaluator,
}

impl<'f, R: Sync> QueryHandler<'f, R> {
    pub fn new(fields: &'f FieldMap<R>, config: QueryConfig) -> Self {
        let evaluator = config.evaluator();
        Self {
            fields,
            config,
            evaluator,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Filters, sorts and slices `records` as described by `request`.
    ///
    /// Any malformed clause, unknown feature, operator the field's kind does
    /// not support or invalid window fails the whole request, whether or not
    /// any record is evaluated.
    pub fn list<'a>(&self, records: &'a [R], request: &ListRequest) -> Result<Page<&'a R>> {
        let window = request.window(&self.config)?;
        let predicates = parse_filter(request.query.as_deref().unwrap_or_default())?;
        let sorts = parse_sort(request.sort.as_deref().unwrap_or_default())?;
        self.execute(records, &predicates, &sorts, window)
    }

    /// Runs already parsed predicates and sort clauses.
    pub fn execute<'a>(
        &self,
        records: &'a [R],
        predicates: &[QueryPredicate],
        sorts: &[SortPredicate],
        window: PageWindow,
    ) -> Result<Page<&'a R>> {
        let mut matched = self.filter(records, predicates)?;
        self.sort(&mut matched, sorts)?;

        let total = matched.len();
        let has_more = total > window.end();
        let items = matched
            .into_iter()
            .skip(window.position)
            .take(window.size)
            .collect::<Vec<_>>();
        log::debug!(
            "list: {total} of {} records matched, returning {} from position {} (has_more: {has_more})",
            records.len(),
            items.len(),
            window.position
        );

        Ok(Page {
            items,
            position: window.position,
            size: window.size,
            total,
            has_more,
        })
    }

    /// Returns the records matching every predicate, in input order.
    pub fn filter<'a>(&self, records: &'a [R], predicates: &[QueryPredicate]) -> Result<Vec<&'a R>> {
        let bound = self.bind_predicates(predicates)?;
        if bound.is_empty() {
            return Ok(records.iter().collect());
        }

        let keep = |record: &'a R| match self.matches_all(record, &bound) {
            Ok(true) => Some(Ok(record)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        };

        if records.len() >= self.config.parallel_threshold {
            log::debug!("filtering {} records in parallel", records.len());
            records.par_iter().filter_map(keep).collect()
        } else {
            records.iter().filter_map(keep).collect()
        }
    }

    /// Stable multi-key sort; the first clause is the primary key.
    pub fn sort(&self, records: &mut [&R], sorts: &[SortPredicate]) -> Result<()> {
        if sorts.is_empty() {
            return Ok(());
        }
        let keys = sorts
            .iter()
            .map(|sort| {
                Ok(SortKey {
                    accessor: self.resolve(sort.feature())?,
                    ascending: sort.ascending(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        records.sort_by(|left, right| compare_records(*left, *right, &keys));
        Ok(())
    }

    fn bind_predicates<'p>(
        &self,
        predicates: &'p [QueryPredicate],
    ) -> Result<Vec<BoundPredicate<'p, R>>> {
        predicates
            .iter()
            .map(|predicate| {
                if predicate.quantor() != Quantor::None {
                    log::debug!(
                        "quantor {} on <{}> is evaluated like a plain predicate",
                        predicate.quantor(),
                        predicate.raw()
                    );
                }
                let accessor = self.resolve(predicate.feature())?;
                check_supported(accessor.kind(), predicate.operator())?;
                Ok(BoundPredicate {
                    predicate,
                    accessor,
                })
            })
            .collect()
    }

    fn resolve(&self, feature: &str) -> Result<FieldAccessor<R>> {
        self.fields
            .get(feature)
            .copied()
            .ok_or_else(|| QueryError::UnknownFeature(feature.to_string()))
    }

    fn matches_all(&self, record: &R, bound: &[BoundPredicate<'_, R>]) -> Result<bool> {
        for entry in bound {
            let value = entry.accessor.extract(record);
            if !self.evaluator.matches(entry.predicate, value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn compare_records<R>(left: &R, right: &R, keys: &[SortKey<R>]) -> Ordering {
    for key in keys {
        let ordering = key
            .accessor
            .extract(left)
            .sort_cmp(&key.accessor.extract(right));
        let ordering = if key.ascending {
            ordering
        } else {
            ordering.reverse()
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
