use serde::{Deserialize, Serialize};

/// Configuration for Python extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// File extensions to extract (default: [".py"])
    pub file_extensions: Vec<String>,

    /// Directory names skipped while walking a repository
    pub exclude_dirs: Vec<String>,

    /// Maximum file size in bytes (larger files are reported and skipped)
    pub max_file_size: usize,

    /// Extract files of a repository on the rayon pool
    pub parallel: bool,

    /// Number of threads for parallel extraction (None = rayon default)
    pub num_threads: Option<usize>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            file_extensions: vec![".py".to_string()],
            exclude_dirs: vec![".git".to_string(), "__pycache__".to_string()],
            max_file_size: 10 * 1024 * 1024, // 10MB default
            parallel: false,
            num_threads: None,
        }
    }
}

impl ExtractorConfig {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    pub fn with_file_extensions(mut self, extensions: Vec<String>) -> Self {
        self.file_extensions = extensions;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.num_threads == Some(0) {
            return Err("num_threads must be greater than 0".to_string());
        }

        if self.max_file_size == 0 {
            return Err("max_file_size must be greater than 0".to_string());
        }

        if self.file_extensions.is_empty() {
            return Err("file_extensions cannot be empty".to_string());
        }

        Ok(())
    }

    /// Check if a file extension should be extracted
    pub fn should_parse_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.file_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.') == extension)
    }

    /// Check if a directory should be skipped
    pub fn should_exclude_dir(&self, dir_name: &str) -> bool {
        self.exclude_dirs.iter().any(|excluded| {
            // Handle glob patterns like *.egg-info
            if excluded.contains('*') {
                dir_name.contains(&excluded.replace('*', ""))
            } else {
                dir_name == excluded
            }
        })
    }
}
