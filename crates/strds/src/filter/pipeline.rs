use super::{registry, Filter};
use crate::error::{DatasetError, Result};
use crate::model::Repository;
use log::debug;
use std::str::FromStr;

/// Filters applied when no explicit list is configured
pub const DEFAULT_PIPELINE: &str = "NoStringTypeFilter,EmptyFilter";

/// An ordered chain of filters
#[derive(Debug, Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline from a comma separated list of filter names.
    ///
    /// Names are trimmed and blank entries skipped. The first unknown name
    /// fails the whole pipeline.
    pub fn from_names(names: &str) -> Result<Self> {
        let filters = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(registry::from_name)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { filters })
    }

    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn with_filter(mut self, filter: Box<dyn Filter>) -> Self {
        self.push(filter);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter in order, feeding each one the previous result
    pub fn apply(&self, repository: Repository) -> Repository {
        self.filters.iter().fold(repository, |repo, filter| {
            let before = repo.modules.len();
            let repo = filter.apply(repo);
            debug!(
                "{} on {}: {} -> {} modules",
                filter.name(),
                repo.name,
                before,
                repo.modules.len()
            );
            repo
        })
    }
}

impl FromStr for FilterPipeline {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_names(s)
    }
}
