//! strds
//!
//! Structural model of Python repositories and the filter pipeline that
//! prunes it.
//!
//! This crate provides:
//!
//! - **Entity model**: `Repository → Module → {Function, Class → Method} → Parameter`
//! - **Dataset**: an ordered list of repositories with JSON persistence
//! - **Filters**: named `Repository -> Repository` transforms, a static
//!   registry and an ordered pipeline
//! - **Error handling**: [`DatasetError`] for I/O, serialization and lookup failures
//!
//! Extraction of the model from Python sources lives in `strds-python`.
//!
//! # Example
//!
//! ```rust
//! use strds::filter::{FilterPipeline, DEFAULT_PIPELINE};
//! use strds::model::{Callable, Function, Module, Parameter, Repository};
//!
//! let func = Function::new(
//!     Callable::new("greet", 1, 5)
//!         .with_parameters(vec![Parameter::new("name", 1, 11).with_type("str")]),
//! );
//! let repo = Repository::new("pkg", "https://github.com/o/pkg", "1.0", "abc")
//!     .with_modules(vec![Module::new("core", "pkg/core.py").with_functions(vec![func])]);
//!
//! let pipeline = FilterPipeline::from_names(DEFAULT_PIPELINE).unwrap();
//! let filtered = pipeline.apply(repo);
//! assert_eq!(filtered.callable_count(), 1);
//! ```

#![deny(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod filter;
pub mod model;

// Re-export commonly used types
pub use dataset::Dataset;
pub use error::{DatasetError, Result};
pub use filter::{Filter, FilterPipeline};
pub use model::{Callable, CallableRef, Class, Function, Method, Module, Parameter, Repository};
