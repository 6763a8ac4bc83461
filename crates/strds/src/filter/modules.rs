use super::Filter;
use crate::model::{Module, Repository};
use std::path::Component;

/// Conventional source-layout directory that may precede the package directory
pub const SOURCES_ROOT: &str = "src";

fn retain_modules(
    mut repository: Repository,
    keep: impl Fn(&Repository, &Module) -> bool,
) -> Repository {
    let modules = std::mem::take(&mut repository.modules);
    repository.modules = modules
        .into_iter()
        .filter(|module| keep(&repository, module))
        .collect();
    repository
}

fn mentions(module: &Module, marker: &str) -> bool {
    module.name.contains(marker) || module.path_string().contains(marker)
}

/// Removes modules that are private by name or live under a private directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateModuleFilter;

impl Filter for PrivateModuleFilter {
    fn name(&self) -> &'static str {
        "PrivateModuleFilter"
    }

    fn apply(&self, repository: Repository) -> Repository {
        retain_modules(repository, |_, module| {
            let private_segment = module.file_path.components().any(|c| match c {
                Component::Normal(part) => part.to_string_lossy().starts_with('_'),
                _ => false,
            });
            !module.name.starts_with('_') && !private_segment
        })
    }
}

/// Removes modules whose name or path contains `test`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestModuleFilter;

impl Filter for TestModuleFilter {
    fn name(&self) -> &'static str {
        "TestModuleFilter"
    }

    fn apply(&self, repository: Repository) -> Repository {
        retain_modules(repository, |_, module| !mentions(module, "test"))
    }
}

/// Removes modules whose name or path contains `example`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExampleModuleFilter;

impl Filter for ExampleModuleFilter {
    fn name(&self) -> &'static str {
        "ExampleModuleFilter"
    }

    fn apply(&self, repository: Repository) -> Repository {
        retain_modules(repository, |_, module| !mentions(module, "example"))
    }
}

/// Removes package initializer modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitModuleFilter;

impl Filter for InitModuleFilter {
    fn name(&self) -> &'static str {
        "InitModuleFilter"
    }

    fn apply(&self, repository: Repository) -> Repository {
        retain_modules(repository, |_, module| !mentions(module, "__init__"))
    }
}

/// Keeps modules whose path starts with the repository name, optionally
/// below [`SOURCES_ROOT`].
///
/// This is a literal prefix check: `pkg_extra/x.py` counts as core for `pkg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonCoreModuleFilter;

impl Filter for NonCoreModuleFilter {
    fn name(&self) -> &'static str {
        "NonCoreModuleFilter"
    }

    fn apply(&self, repository: Repository) -> Repository {
        retain_modules(repository, |repo, module| {
            let path = module.path_string();
            path.starts_with(&repo.name)
                || path.starts_with(&format!("{SOURCES_ROOT}/{}", repo.name))
        })
    }
}
