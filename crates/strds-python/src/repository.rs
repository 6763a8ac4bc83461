//! Repository walking and dataset assembly

use crate::error::{ExtractError, Result};
use crate::extractor::PythonExtractor;
use crate::project::LocalProject;
use std::path::{Path, PathBuf};
use strds::filter::FilterPipeline;
use strds::model::{Module, Repository};
use strds::Dataset;
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

/// Result of extracting one repository
#[derive(Debug, Clone)]
pub struct RepositoryExtraction {
    pub repository: Repository,

    /// Files that were skipped, with the reason
    pub failed_files: Vec<(PathBuf, String)>,
}

impl RepositoryExtraction {
    /// Percentage of discovered files that were extracted
    pub fn success_rate(&self) -> f64 {
        let extracted = self.repository.modules.len();
        let total = extracted + self.failed_files.len();
        if total == 0 {
            return 100.0;
        }
        (extracted as f64 / total as f64) * 100.0
    }
}

impl PythonExtractor {
    /// Source files below `root` in walk order, plus entries that could not be read
    pub fn discover_files(&self, root: &Path) -> (Vec<PathBuf>, Vec<(PathBuf, String)>) {
        let mut files = Vec::new();
        let mut failures = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Skip excluded directories
                if e.depth() > 0 && e.file_type().is_dir() {
                    if let Some(name) = e.file_name().to_str() {
                        return !self.config().should_exclude_dir(name);
                    }
                }
                true
            })
        {
            match entry {
                Ok(entry) => {
                    let matches = entry
                        .path()
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| self.config().should_parse_extension(ext));
                    if entry.file_type().is_file() && matches {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    let err = ExtractError::Walk(path.clone(), e.to_string());
                    warn!("{}", err);
                    failures.push((path, err.to_string()));
                }
            }
        }

        (files, failures)
    }

    /// Extract every source file of a project.
    ///
    /// Unreadable, oversized and syntactically invalid files are recorded in
    /// `failed_files`; any other error aborts the repository.
    #[instrument(skip(self, project), fields(project = %project.project_name))]
    pub fn extract_repository(&self, project: &LocalProject) -> Result<RepositoryExtraction> {
        self.config().validate().map_err(ExtractError::InvalidConfig)?;

        let root = project.path.as_path();
        let (files, mut failed_files) = self.discover_files(root);
        info!(files = files.len(), "Starting repository extraction");

        let results = if self.config().parallel {
            self.extract_files_parallel(&files, root)?
        } else {
            files
                .iter()
                .map(|file| self.extract_module(file, root))
                .collect()
        };

        let mut modules = Vec::with_capacity(files.len());
        for (file, result) in files.into_iter().zip(results) {
            match result {
                Ok(module) => modules.push(module),
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping {}: {}", file.display(), e);
                    failed_files.push((file, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        let extraction = RepositoryExtraction {
            repository: Repository::new(
                project.project_name.as_str(),
                project.github_url.as_str(),
                project.pypi_tag(),
                project.git_commit_hash.as_str(),
            )
            .with_modules(modules),
            failed_files,
        };
        info!(
            modules = extraction.repository.modules.len(),
            files_failed = extraction.failed_files.len(),
            success_rate = extraction.success_rate(),
            "Repository extraction completed"
        );
        Ok(extraction)
    }

    /// Extract files on the rayon pool, keeping input order
    fn extract_files_parallel(
        &self,
        files: &[PathBuf],
        root: &Path,
    ) -> Result<Vec<Result<Module>>> {
        use rayon::prelude::*;

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(num_threads) = self.config().num_threads {
            builder = builder.num_threads(num_threads);
        }
        let pool = builder
            .build()
            .map_err(|e| {
                ExtractError::InvalidConfig(format!("Failed to create thread pool: {e}"))
            })?;

        Ok(pool.install(|| {
            files
                .par_iter()
                .map(|file| self.extract_module(file, root))
                .collect()
        }))
    }
}

/// Extract, filter and collect a set of projects.
///
/// Repositories left without modules after filtering are dropped.
#[instrument(skip_all, fields(projects = projects.len(), filters = ?pipeline.names()))]
pub fn build_dataset(
    projects: &[LocalProject],
    pipeline: &FilterPipeline,
    extractor: &PythonExtractor,
) -> Result<Dataset> {
    let mut dataset = Dataset::default();
    for project in projects {
        info!("Extracting {}", project.path.display());
        let extraction = extractor.extract_repository(project)?;
        let repository = pipeline.apply(extraction.repository);
        if repository.modules.is_empty() {
            info!("No modules left after filtering: {}", project.path.display());
        } else {
            dataset.push(repository);
        }
    }
    Ok(dataset)
}
