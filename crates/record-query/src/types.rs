//! Request and result types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};

/// Parameters of a list request as received from the boundary layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// `;`-separated filter predicates. Defaults to no filter.
    pub query: Option<String>,
    /// `;`-separated sort clauses. Defaults to the input order.
    pub sort: Option<String>,
    /// Index of the first record returned. Defaults to 0.
    pub position: Option<i64>,
    /// Number of records returned. Defaults to the configured page size.
    pub size: Option<i64>,
}

impl ListRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_window(mut self, position: i64, size: i64) -> Self {
        self.position = Some(position);
        self.size = Some(size);
        self
    }

    /// Resolves the page window against the configured defaults.
    pub fn window(&self, config: &QueryConfig) -> Result<PageWindow> {
        let position = self.position.unwrap_or(0);
        let size = self
            .size
            .unwrap_or(config.default_page_size.try_into().unwrap_or(i64::MAX));
        PageWindow::new(position, size, config.max_page_size)
    }
}

/// A validated `[position, position + size)` slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub position: usize,
    pub size: usize,
}

impl PageWindow {
    /// Validates a window; sizes above `max_size` are clamped.
    pub fn new(position: i64, size: i64, max_size: usize) -> Result<Self> {
        let position = usize::try_from(position).map_err(|_| {
            QueryError::InvalidWindow(format!("position must not be negative, got {position}"))
        })?;
        if size <= 0 {
            return Err(QueryError::InvalidWindow(format!(
                "size must be positive, got {size}"
            )));
        }
        let size = usize::try_from(size).unwrap_or(usize::MAX).min(max_size);
        Ok(Self { position, size })
    }

    pub fn end(&self) -> usize {
        self.position.saturating_add(self.size)
    }
}

/// One page of matching records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub position: usize,
    pub size: usize,
    /// Number of records matching the filter, across all pages.
    pub total: usize,
    /// Whether matching records remain beyond this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            position: self.position,
            size: self.size,
            total: self.total,
            has_more: self.has_more,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Page<&T> {
    pub fn cloned(self) -> Page<T> {
        self.map(T::clone)
    }
}
