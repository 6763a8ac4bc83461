use super::callable::{CallableRef, Function};
use super::class::Class;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Represents a Python source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name (file stem)
    pub name: String,

    /// Path relative to the repository root
    #[serde(with = "relative_path")]
    pub file_path: PathBuf,

    /// Top-level functions in declaration order
    #[serde(default)]
    pub functions: Vec<Function>,

    /// Top-level classes in declaration order
    #[serde(default)]
    pub classes: Vec<Class>,
}

impl Module {
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn with_functions(mut self, functions: Vec<Function>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_classes(mut self, classes: Vec<Class>) -> Self {
        self.classes = classes;
        self
    }

    /// True when the module holds neither functions nor classes
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }

    /// The relative path with `/` separators on every platform
    pub fn path_string(&self) -> String {
        relative_path::to_string(&self.file_path)
    }

    /// Functions first, then methods class by class, each in declaration order
    pub fn callables(&self) -> impl Iterator<Item = CallableRef<'_>> {
        self.functions.iter().map(CallableRef::Function).chain(
            self.classes
                .iter()
                .flat_map(|class| class.methods.iter().map(move |m| CallableRef::Method(class, m))),
        )
    }

    /// Order functions and classes (and their contents) by name
    pub fn sort(&mut self) {
        for func in &mut self.functions {
            func.sort();
        }
        self.functions.sort_by(|a, b| a.name.cmp(&b.name));
        for class in &mut self.classes {
            class.sort();
        }
        self.classes.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// Returns true if `path` cannot be a path relative to a repository root
pub fn is_rooted(path: &Path) -> bool {
    path.is_absolute() || path.has_root()
}

// Helper module for serializing relative module paths
mod relative_path {
    use super::is_rooted;
    use crate::error::DatasetError;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::path::{Component, Path, PathBuf};

    pub fn to_string(path: &Path) -> String {
        path.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn serialize<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        to_string(path).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let path = PathBuf::from(raw);
        if is_rooted(&path) {
            return Err(de::Error::custom(DatasetError::AbsolutePath { path }));
        }
        Ok(path)
    }
}
