use super::module::Module;
use serde::{Deserialize, Serialize};

/// One analyzed project snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Distribution name; unique within a dataset
    pub name: String,

    /// Canonical source location
    pub url: String,

    /// Version tag the snapshot corresponds to
    pub pypi_tag: String,

    /// Exact commit of the snapshot
    pub git_commit_hash: String,

    /// Modules in discovery order
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Repository {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        pypi_tag: impl Into<String>,
        git_commit_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            pypi_tag: pypi_tag.into(),
            git_commit_hash: git_commit_hash.into(),
            modules: Vec::new(),
        }
    }

    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = modules;
        self
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Number of functions plus methods across all modules
    pub fn callable_count(&self) -> usize {
        self.modules.iter().map(|m| m.callables().count()).sum()
    }

    /// Order modules (and their contents) by name
    pub fn sort(&mut self) {
        for module in &mut self.modules {
            module.sort();
        }
        self.modules.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Callable, Class, Function, Method};

    #[test]
    fn test_callable_count_includes_methods() {
        let repo = Repository::new("pkg", "https://github.com/o/pkg", "1.0", "abc").with_modules(
            vec![Module::new("m", "pkg/m.py")
                .with_functions(vec![Function::new(Callable::new("f", 1, 5))])
                .with_classes(vec![Class::new("A")
                    .with_methods(vec![Method::new(Callable::new("g", 4, 9))])])],
        );
        assert_eq!(repo.callable_count(), 2);
        assert!(repo.module("m").is_some());
        assert!(repo.module("n").is_none());
    }

    #[test]
    fn test_sort_orders_modules() {
        let mut repo = Repository::new("pkg", "u", "1.0", "abc").with_modules(vec![
            Module::new("zeta", "zeta.py"),
            Module::new("alpha", "alpha.py"),
        ]);
        repo.sort();
        assert_eq!(repo.modules[0].name, "alpha");
    }
}
