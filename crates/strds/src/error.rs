//! Error types for dataset operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Error type for the structural model, its persistence and the filter pipeline.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Reading or writing a dataset file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A filter name that is not in the registry
    #[error("Unknown filter: {name}")]
    UnknownFilter {
        /// The name as it was requested
        name: String,
    },

    /// A module path that is not relative to its repository root
    #[error("Module path must be relative to the repository root: {path}")]
    AbsolutePath {
        /// The offending path
        path: PathBuf,
    },
}

impl DatasetError {
    /// Create an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create an unknown-filter error.
    pub fn unknown_filter(name: impl Into<String>) -> Self {
        Self::UnknownFilter { name: name.into() }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string(), Some(err))
    }
}
