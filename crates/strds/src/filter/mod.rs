//! Repository filters.
//!
//! A filter takes a [`Repository`] by value and hands back the pruned
//! repository. Filters only ever replace child collections, so every result is
//! a complete repository that the next filter (or an exporter) can consume.
//! Filters are looked up by name in a static registry ([`FILTERS`]) and chained with a
//! [`FilterPipeline`]; order matters whenever one filter can empty out what
//! another one inspects.

mod modules;
mod pipeline;
mod registry;
mod structural;

use crate::model::Repository;

pub use modules::{
    ExampleModuleFilter, InitModuleFilter, NonCoreModuleFilter, PrivateModuleFilter,
    TestModuleFilter, SOURCES_ROOT,
};
pub use pipeline::{FilterPipeline, DEFAULT_PIPELINE};
pub use registry::{filter_names, from_name, FilterEntry, FILTERS};
pub use structural::{EmptyFilter, NoStringTypeFilter, STRING_TYPE};

/// A named `Repository -> Repository` transform
pub trait Filter: Send + Sync {
    /// Registry name of the filter (its type name)
    fn name(&self) -> &'static str;

    /// Apply the filter and return the resulting repository
    fn apply(&self, repository: Repository) -> Repository;
}

impl std::fmt::Debug for dyn Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
