use super::Filter;
use crate::model::{Callable, Repository};

/// Annotation text that marks a string-typed parameter or return value
pub const STRING_TYPE: &str = "str";

/// Removes classes without methods, then modules without classes and functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyFilter;

impl Filter for EmptyFilter {
    fn name(&self) -> &'static str {
        "EmptyFilter"
    }

    fn apply(&self, mut repository: Repository) -> Repository {
        for module in &mut repository.modules {
            let classes = std::mem::take(&mut module.classes);
            module.classes = classes
                .into_iter()
                .filter(|class| !class.methods.is_empty())
                .collect();
        }
        repository.modules = std::mem::take(&mut repository.modules)
            .into_iter()
            .filter(|module| !module.is_empty())
            .collect();
        repository
    }
}

/// Keeps only functions and methods that take or return a plain `str`.
///
/// Composite annotations such as `list[str]` do not count.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStringTypeFilter;

fn uses_string_type(callable: &Callable) -> bool {
    callable
        .parameters
        .iter()
        .any(|p| p.type_text() == Some(STRING_TYPE))
        || callable.return_text() == Some(STRING_TYPE)
}

impl Filter for NoStringTypeFilter {
    fn name(&self) -> &'static str {
        "NoStringTypeFilter"
    }

    fn apply(&self, mut repository: Repository) -> Repository {
        for module in &mut repository.modules {
            module.functions = std::mem::take(&mut module.functions)
                .into_iter()
                .filter(|f| uses_string_type(f))
                .collect();
            for class in &mut module.classes {
                class.methods = std::mem::take(&mut class.methods)
                    .into_iter()
                    .filter(|m| uses_string_type(m))
                    .collect();
            }
        }
        repository
    }
}
