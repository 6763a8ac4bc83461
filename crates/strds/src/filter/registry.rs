use super::{
    EmptyFilter, ExampleModuleFilter, Filter, InitModuleFilter, NonCoreModuleFilter,
    NoStringTypeFilter, PrivateModuleFilter, TestModuleFilter,
};
use crate::error::{DatasetError, Result};

/// Registry row: a filter name and how to build it
#[derive(Clone, Copy)]
pub struct FilterEntry {
    pub name: &'static str,
    pub build: fn() -> Box<dyn Filter>,
}

impl std::fmt::Debug for FilterEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEntry").field("name", &self.name).finish()
    }
}

fn build<F: Filter + Default + 'static>() -> Box<dyn Filter> {
    Box::new(F::default())
}

/// Every known filter, keyed by type name
pub const FILTERS: &[FilterEntry] = &[
    FilterEntry {
        name: "EmptyFilter",
        build: build::<EmptyFilter>,
    },
    FilterEntry {
        name: "NoStringTypeFilter",
        build: build::<NoStringTypeFilter>,
    },
    FilterEntry {
        name: "PrivateModuleFilter",
        build: build::<PrivateModuleFilter>,
    },
    FilterEntry {
        name: "TestModuleFilter",
        build: build::<TestModuleFilter>,
    },
    FilterEntry {
        name: "ExampleModuleFilter",
        build: build::<ExampleModuleFilter>,
    },
    FilterEntry {
        name: "InitModuleFilter",
        build: build::<InitModuleFilter>,
    },
    FilterEntry {
        name: "NonCoreModuleFilter",
        build: build::<NonCoreModuleFilter>,
    },
];

/// Build the filter registered under `name` (ASCII case-insensitive)
pub fn from_name(name: &str) -> Result<Box<dyn Filter>> {
    FILTERS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
        .map(|entry| (entry.build)())
        .ok_or_else(|| DatasetError::unknown_filter(name))
}

pub fn filter_names() -> impl Iterator<Item = &'static str> {
    FILTERS.iter().map(|entry| entry.name)
}
