//! Query settings and their JSON file format.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::query::{BooleanParsing, Evaluator};

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const MAX_PAGE_SIZE: usize = 500;
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Settings for list requests, usually read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryConfig {
    /// Page size used when a request does not name one.
    pub default_page_size: usize,
    /// Requested page sizes above this are clamped.
    pub max_page_size: usize,
    pub boolean_parsing: BooleanParsing,
    /// Candidate sets at least this large are filtered on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            boolean_parsing: BooleanParsing::default(),
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl QueryConfig {
    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        log::info!("loaded query config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| QueryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(QueryError::Config(
                "defaultPageSize must be at least 1".to_string(),
            ));
        }
        if self.max_page_size < self.default_page_size {
            return Err(QueryError::Config(format!(
                "maxPageSize {} is smaller than defaultPageSize {}",
                self.max_page_size, self.default_page_size
            )));
        }
        Ok(())
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.boolean_parsing)
    }
}
