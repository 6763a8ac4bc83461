//! # strds-python
//!
//! Python front end for strds - turns Python repositories into the strds
//! structural model.
//!
//! ## Features
//!
//! - Extract modules, functions, classes, methods and parameters with
//!   cursor-aligned positions, annotation text and literal bodies
//! - Walk whole repositories, skipping unreadable or broken files
//! - Build filtered datasets from checked-out projects
//! - Export callable bodies as files, optionally without type annotations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strds::filter::{FilterPipeline, DEFAULT_PIPELINE};
//! use strds_python::{build_dataset, LocalProject, PythonExtractor};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = FilterPipeline::from_names(DEFAULT_PIPELINE)?;
//! let projects = vec![LocalProject::new(
//!     "mylib",
//!     "https://github.com/owner/mylib",
//!     "/tmp/checkouts/mylib",
//!     "0123abcd",
//! )];
//!
//! let dataset = build_dataset(&projects, &pipeline, &PythonExtractor::new())?;
//! dataset.save(Path::new("output.json"))?;
//! # Ok(())
//! # }
//! ```

pub mod annotations;
pub mod config;
pub mod error;
pub mod position;
pub mod project;
pub mod provide;
pub mod signature;

mod extractor;
mod repository;
mod unparse;
mod visitor;

pub use annotations::strip_type_annotations;
pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use extractor::PythonExtractor;
pub use project::{LocalProject, FALLBACK_TAG};
pub use provide::extract_callables;
pub use repository::{build_dataset, RepositoryExtraction};
pub use signature::craft_signature;
