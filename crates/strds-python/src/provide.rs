//! Export of callable bodies as individual source files

use crate::annotations::strip_type_annotations;
use crate::error::{ExtractError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use strds::model::{CallableRef, Class, Function, Method, Module, Repository};
use strds::Dataset;
use tracing::{info, instrument};

/// `<repo>/<module>/<Class>/<method>.py`
pub fn method_path(repo: &Repository, module: &Module, class: &Class, method: &Method) -> PathBuf {
    Path::new(&repo.name)
        .join(&module.name)
        .join(&class.name)
        .join(format!("{}.py", method.name))
}

/// `<repo>/<module>/<function>.py`
pub fn function_path(repo: &Repository, module: &Module, function: &Function) -> PathBuf {
    Path::new(&repo.name)
        .join(&module.name)
        .join(format!("{}.py", function.name))
}

/// Write `code` to `output_dir/file_path`, creating directories as needed
pub fn save_callable(
    code: &str,
    output_dir: &Path,
    file_path: &Path,
    strip_annotations: bool,
) -> Result<()> {
    let code = if strip_annotations {
        strip_type_annotations(code)
    } else {
        code.to_string()
    };
    let output_file = output_dir.join(file_path);
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent).map_err(|e| ExtractError::IoError(parent.to_path_buf(), e))?;
    }
    fs::write(&output_file, code).map_err(|e| ExtractError::IoError(output_file, e))
}

/// Write the body of every method and function in `dataset` below
/// `output_dir`, returning the number of files written
#[instrument(skip(dataset), fields(repositories = dataset.len()))]
pub fn extract_callables(
    dataset: &Dataset,
    output_dir: &Path,
    strip_annotations: bool,
) -> Result<usize> {
    let mut written = 0;
    for repo in &dataset.repositories {
        for module in &repo.modules {
            for callable in module.callables() {
                let file_path = match callable {
                    CallableRef::Function(function) => function_path(repo, module, function),
                    CallableRef::Method(class, method) => method_path(repo, module, class, method),
                };
                save_callable(
                    &callable.callable().body,
                    output_dir,
                    &file_path,
                    strip_annotations,
                )?;
                written += 1;
            }
        }
    }
    info!(files = written, "Callables written to {}", output_dir.display());
    Ok(written)
}
