//! Dataset aggregate and its JSON persistence.
//!
//! A dataset is stored as a JSON array of repositories, indented with four
//! spaces and with non-ASCII text written verbatim. Documents wrapped as
//! `{"repositories": [...]}` are accepted on load as well.

use crate::error::{DatasetError, Result};
use crate::model::Repository;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A collection of analyzed repositories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub repositories: Vec<Repository>,
}

impl Dataset {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self { repositories }
    }

    pub fn push(&mut self, repository: Repository) {
        self.repositories.push(repository);
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn repository(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Order repositories and everything below them by name.
    ///
    /// Used to compare datasets independent of discovery order; loading and
    /// extraction never sort.
    pub fn sort(&mut self) -> &mut Self {
        for repo in &mut self.repositories {
            repo.sort();
        }
        self.repositories.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }

    /// Render the dataset document
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.repositories.serialize(&mut serializer)?;
        String::from_utf8(buf)
            .map_err(|e| DatasetError::serialization("dataset is not valid UTF-8", Some(e)))
    }

    /// Parse a dataset document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        let repositories = match document {
            Value::Array(_) => Vec::<Repository>::deserialize(document)?,
            Value::Object(mut fields) => match fields.remove("repositories") {
                Some(repos) => Vec::<Repository>::deserialize(repos)?,
                None => {
                    return Err(DatasetError::serialization(
                        "dataset object has no \"repositories\" key",
                        None::<serde_json::Error>,
                    ))
                }
            },
            other => {
                return Err(DatasetError::serialization(
                    format!("expected an array of repositories, found {other}"),
                    None::<serde_json::Error>,
                ))
            }
        };
        Ok(Self { repositories })
    }

    /// Write the dataset to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
        }
        let text = self.to_json_string()?;
        fs::write(path, text).map_err(|e| DatasetError::io(path, e))?;
        info!(
            "Saved {} repositories to {}",
            self.repositories.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a dataset previously written by [`Dataset::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        let dataset = Self::from_json_str(&text)?;
        debug!(
            "Loaded {} repositories from {}",
            dataset.repositories.len(),
            path.display()
        );
        Ok(dataset)
    }
}

impl FromIterator<Repository> for Dataset {
    fn from_iter<I: IntoIterator<Item = Repository>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Module;

    fn repo(name: &str) -> Repository {
        Repository::new(name, format!("https://github.com/test/{name}"), "v1.0.0", "abc123")
    }

    #[test]
    fn test_document_is_array_with_four_space_indent() {
        let text = Dataset::new(vec![repo("test-repo")]).to_json_string().unwrap();
        assert!(text.starts_with("[\n    {\n        \"name\": \"test-repo\""));
    }

    #[test]
    fn test_non_ascii_is_written_verbatim() {
        let mut r = repo("pkg");
        r.url = "https://example.org/über".into();
        let text = Dataset::new(vec![r]).to_json_string().unwrap();
        assert!(text.contains("über"));
    }

    #[test]
    fn test_wrapped_document_is_accepted() {
        let dataset = Dataset::from_json_str(
            r#"{"repositories": [{"name": "a", "url": "u", "pypi_tag": "1", "git_commit_hash": "h"}]}"#,
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(dataset.repositories[0].modules.is_empty());
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        assert!(matches!(
            Dataset::from_json_str("42"),
            Err(DatasetError::Serialization { .. })
        ));
        assert!(Dataset::from_json_str(r#"{"repos": []}"#).is_err());
    }

    #[test]
    fn test_sort_orders_repositories() {
        let mut dataset = Dataset::new(vec![repo("b"), repo("a")]);
        dataset.sort();
        assert_eq!(dataset.repositories[0].name, "a");
    }

    #[test]
    fn test_collect_and_lookup() {
        let dataset: Dataset = vec![repo("a").with_modules(vec![Module::new("m", "m.py")])]
            .into_iter()
            .collect();
        assert_eq!(dataset.repository("a").map(|r| r.modules.len()), Some(1));
        assert!(dataset.repository("zzz").is_none());
    }
}
