use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tag recorded when neither a matching source tag nor a registry tag is known
pub const FALLBACK_TAG: &str = "master";

/// A checked-out project ready for extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalProject {
    /// Distribution name, used as the repository name
    pub project_name: String,

    pub github_url: String,

    /// Source tag matching the released version, if one was found
    #[serde(default)]
    pub matching_github_tag: Option<String>,

    /// Latest version published on the package index
    #[serde(default)]
    pub pypi_latest_tag: Option<String>,

    /// Root of the checkout
    pub path: PathBuf,

    pub git_commit_hash: String,
}

impl LocalProject {
    pub fn new(
        project_name: impl Into<String>,
        github_url: impl Into<String>,
        path: impl Into<PathBuf>,
        git_commit_hash: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            github_url: github_url.into(),
            matching_github_tag: None,
            pypi_latest_tag: None,
            path: path.into(),
            git_commit_hash: git_commit_hash.into(),
        }
    }

    pub fn with_matching_github_tag(mut self, tag: impl Into<String>) -> Self {
        self.matching_github_tag = Some(tag.into());
        self
    }

    pub fn with_pypi_latest_tag(mut self, tag: impl Into<String>) -> Self {
        self.pypi_latest_tag = Some(tag.into());
        self
    }

    /// Version tag for the repository: the matching source tag, else the
    /// latest registry tag, else [`FALLBACK_TAG`]. Empty tags count as unknown.
    pub fn pypi_tag(&self) -> &str {
        [&self.matching_github_tag, &self.pypi_latest_tag]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|tag| !tag.is_empty())
            .unwrap_or(FALLBACK_TAG)
    }

    /// Read a JSON array of project descriptors
    pub fn load_manifest(path: &Path) -> Result<Vec<Self>> {
        let text =
            fs::read_to_string(path).map_err(|e| ExtractError::IoError(path.to_path_buf(), e))?;
        let projects = serde_json::from_str(&text).map_err(strds::DatasetError::from)?;
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> LocalProject {
        LocalProject::new("pkg", "https://github.com/o/pkg", "/tmp/pkg", "abc")
    }

    #[test]
    fn test_matching_tag_wins() {
        let p = project()
            .with_matching_github_tag("v1.2.0")
            .with_pypi_latest_tag("1.3.0");
        assert_eq!(p.pypi_tag(), "v1.2.0");
    }

    #[test]
    fn test_registry_tag_is_second_choice() {
        let p = project().with_pypi_latest_tag("1.3.0");
        assert_eq!(p.pypi_tag(), "1.3.0");

        let p = project()
            .with_matching_github_tag("")
            .with_pypi_latest_tag("1.3.0");
        assert_eq!(p.pypi_tag(), "1.3.0");
    }

    #[test]
    fn test_fallback_tag() {
        assert_eq!(project().pypi_tag(), FALLBACK_TAG);
        assert_eq!(project().with_pypi_latest_tag("").pypi_tag(), "master");
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        let projects = vec![project().with_pypi_latest_tag("0.9")];
        fs::write(&path, serde_json::to_string(&projects).unwrap()).unwrap();

        assert_eq!(LocalProject::load_manifest(&path).unwrap(), projects);
    }
}
