use std::path::PathBuf;
use strds::DatasetError;
use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting Python sources
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Failed to read file (including invalid UTF-8)
    #[error("IO error reading {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    /// Syntax error in source code
    #[error("Syntax error in {0}:{1}:{2}: {3}")]
    SyntaxError(PathBuf, usize, usize, String),

    /// File too large
    #[error("File {0} exceeds maximum size ({1} bytes)")]
    FileTooLarge(PathBuf, usize),

    /// A syntax node without source coordinates
    #[error("Missing position for {1} node in {0}")]
    MissingPosition(PathBuf, String),

    /// A discovered file that does not live below the repository root
    #[error("File {0} is outside the repository root {1}")]
    PathOutsideRoot(PathBuf, PathBuf),

    /// The Python grammar could not be loaded
    #[error("Failed to load Python grammar: {0}")]
    Language(String),

    /// Directory traversal failed
    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, String),

    /// Invalid extractor configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the dataset layer
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl ExtractError {
    /// Whether repository extraction may skip the affected file and continue.
    ///
    /// Read, size and syntax failures are local to one file. Everything else
    /// means the extractor or its inputs are broken.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExtractError::IoError(..)
                | ExtractError::SyntaxError(..)
                | ExtractError::FileTooLarge(..)
                | ExtractError::Walk(..)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = ExtractError::SyntaxError(
            PathBuf::from("pkg/a.py"),
            3,
            7,
            "unexpected syntax".into(),
        );
        assert_eq!(err.to_string(), "Syntax error in pkg/a.py:3:7: unexpected syntax");
    }

    #[test]
    fn test_recoverability() {
        let io = ExtractError::IoError(
            PathBuf::from("a.py"),
            std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8"),
        );
        assert!(io.is_recoverable());
        assert!(ExtractError::FileTooLarge(PathBuf::from("a.py"), 10).is_recoverable());
        assert!(!ExtractError::MissingPosition(PathBuf::from("a.py"), "identifier".into())
            .is_recoverable());
        assert!(!ExtractError::PathOutsideRoot(PathBuf::from("/x/a.py"), PathBuf::from("/r"))
            .is_recoverable());
        assert!(!ExtractError::Language("version mismatch".into()).is_recoverable());
    }

    #[test]
    fn test_dataset_error_converts() {
        let err: ExtractError = DatasetError::unknown_filter("Nope").into();
        assert_eq!(err.to_string(), "Unknown filter: Nope");
        assert!(!err.is_recoverable());
    }
}
