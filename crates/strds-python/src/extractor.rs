//! Module-level extraction from Python source

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::visitor::PythonVisitor;
use std::fs;
use std::path::{Path, PathBuf};
use strds::model::{is_rooted, Module};
use tracing::{debug, instrument, warn};
use tree_sitter::{Node, Parser, Tree};

/// Extracts the structural model from Python files
#[derive(Debug, Clone, Default)]
pub struct PythonExtractor {
    config: ExtractorConfig,
}

impl PythonExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Read and extract a single file below `repo_root`
    #[instrument(skip(self), fields(file = %file_path.display()))]
    pub fn extract_module(&self, file_path: &Path, repo_root: &Path) -> Result<Module> {
        let metadata =
            fs::metadata(file_path).map_err(|e| ExtractError::IoError(file_path.to_path_buf(), e))?;
        if metadata.len() > self.config.max_file_size as u64 {
            warn!("File too large: {} bytes", metadata.len());
            return Err(ExtractError::FileTooLarge(
                file_path.to_path_buf(),
                self.config.max_file_size,
            ));
        }

        let source = fs::read_to_string(file_path)
            .map_err(|e| ExtractError::IoError(file_path.to_path_buf(), e))?;
        self.extract_source(&source, file_path, repo_root)
    }

    /// Extract a module from source text that was read from `file_path`
    pub fn extract_source(
        &self,
        source: &str,
        file_path: &Path,
        repo_root: &Path,
    ) -> Result<Module> {
        let relative = relative_path(file_path, repo_root)?;
        let tree = parse(source, file_path)?;
        let root = tree.root_node();

        if root.has_error() {
            let (line, column, message) = match first_error(root) {
                Some(node) => {
                    let point = node.start_position();
                    let message = if node.is_missing() {
                        format!("missing {}", node.kind())
                    } else {
                        "invalid syntax".to_string()
                    };
                    (point.row + 1, point.column + 1, message)
                }
                None => (0, 0, "invalid syntax".to_string()),
            };
            return Err(ExtractError::SyntaxError(
                file_path.to_path_buf(),
                line,
                column,
                message,
            ));
        }
        if let Some((node, construct)) = first_python2_construct(root, source) {
            let point = node.start_position();
            return Err(ExtractError::SyntaxError(
                file_path.to_path_buf(),
                point.row + 1,
                point.column + 1,
                format!("invalid syntax: {construct}"),
            ));
        }

        let mut visitor = PythonVisitor::new(source, file_path);
        visitor.visit_module(root)?;

        let name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(
            functions = visitor.functions.len(),
            classes = visitor.classes.len(),
            "Module extracted"
        );

        Ok(Module::new(name, relative)
            .with_functions(visitor.functions)
            .with_classes(visitor.classes))
    }
}

pub(crate) fn parse(source: &str, file_path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .map_err(|e| ExtractError::Language(e.to_string()))?;
    parser.parse(source, None).ok_or_else(|| {
        ExtractError::Language(format!("parser produced no tree for {}", file_path.display()))
    })
}

fn relative_path(file_path: &Path, repo_root: &Path) -> Result<PathBuf> {
    let outside =
        || ExtractError::PathOutsideRoot(file_path.to_path_buf(), repo_root.to_path_buf());
    let relative = file_path.strip_prefix(repo_root).map_err(|_| outside())?;
    if is_rooted(relative) || relative.as_os_str().is_empty() {
        return Err(outside());
    }
    Ok(relative.to_path_buf())
}

/// First ERROR or MISSING node in document order
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// First node, in document order, of a form the grammar accepts only for
/// Python 2 compatibility
fn first_python2_construct<'t>(root: Node<'t>, source: &str) -> Option<(Node<'t>, &'static str)> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if let Some(construct) = python2_construct(node, source) {
            return Some((node, construct));
        }
        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }
        loop {
            if !cursor.goto_parent() {
                return None;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

fn python2_construct(node: Node, source: &str) -> Option<&'static str> {
    let text = || source.get(node.byte_range()).unwrap_or("");
    match node.kind() {
        "print_statement" => Some("print statement"),
        "exec_statement" => Some("exec statement"),
        "<>" => Some("'<>' operator"),
        "," if node.parent().is_some_and(|p| p.kind() == "except_clause") => {
            Some("comma in except clause")
        }
        "string_start" => {
            let delimiter = text();
            let prefix = delimiter.trim_end_matches(['\'', '"', '`']);
            if delimiter.ends_with('`') {
                Some("backquote repr")
            } else if prefix.len() > 1 && prefix.contains(['u', 'U']) {
                Some("string prefix")
            } else {
                None
            }
        }
        "integer" => {
            let digits = text();
            if digits.ends_with(['l', 'L']) {
                Some("long integer suffix")
            } else if digits.len() > 1
                && digits.starts_with('0')
                && digits.bytes().all(|b| b.is_ascii_digit() || b == b'_')
                && digits.bytes().any(|b| (b'1'..=b'9').contains(&b))
            {
                Some("leading zero in decimal literal")
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Result<Module> {
        PythonExtractor::new().extract_source(
            source,
            Path::new("repo/pkg/mod.py"),
            Path::new("repo"),
        )
    }

    #[test]
    fn test_extract_simple_function() {
        let module = extract("def hello(name: str) -> str:\n    return name\n").unwrap();
        assert_eq!(module.name, "mod");
        assert_eq!(module.path_string(), "pkg/mod.py");
        assert_eq!(module.functions.len(), 1);

        let f = &module.functions[0];
        assert_eq!(f.line_number, 1);
        assert_eq!(f.col_offset, 5);
        assert_eq!(f.signature, "hello(name: str) -> str");
        assert_eq!(f.full_signature, f.signature);
        assert_eq!(f.body, "def hello(name: str) -> str:\n    return name");
        assert_eq!(f.parameters[0].line_number, 1);
        assert_eq!(f.parameters[0].col_offset, 11);
    }

    #[test]
    fn test_extract_class_with_methods() {
        let source = "class Greeter(Base):\n    greeting = 'hi'\n\n    def __init__(self, name: str) -> None:\n        self.name = name\n\n    def greet(self):\n        return self.greeting\n";
        let module = extract(source).unwrap();
        let class = &module.classes[0];
        assert_eq!(class.name, "Greeter");
        assert_eq!(class.superclasses, ["Base"]);
        assert_eq!(class.fields, ["greeting"]);

        let init = &class.methods[0];
        assert!(init.is_constructor);
        assert_eq!(init.line_number, 4);
        assert_eq!(init.col_offset, 9);
        assert_eq!(init.signature, "Greeter.__init__(self, name: str) -> None");
        assert_eq!(init.full_signature, init.signature);
        assert_eq!(init.parameters[1].col_offset, 24);

        assert!(!class.methods[1].is_constructor);
        assert_eq!(class.methods[1].signature, "Greeter.greet(self)");
    }

    #[test]
    fn test_decorated_definition_starts_at_def() {
        let source = "@cache\n@other(1)\ndef f(x):\n    return x\n";
        let f = &extract(source).unwrap().functions[0];
        assert_eq!(f.line_number, 3);
        assert!(f.body.starts_with("def f(x):"));
    }

    #[test]
    fn test_syntax_error_is_reported_with_position() {
        match extract("def broken(:\n    pass\n") {
            Err(ExtractError::SyntaxError(path, line, _, _)) => {
                assert_eq!(path, PathBuf::from("repo/pkg/mod.py"));
                assert_eq!(line, 1);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    fn python2_error(source: &str) -> (usize, usize, String) {
        match extract(source) {
            Err(ExtractError::SyntaxError(_, line, column, message)) => (line, column, message),
            other => panic!("expected syntax error for {source:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_python2_statements_are_syntax_errors() {
        let (line, column, message) = python2_error("def f(a):\n    print 'hi'\n");
        assert_eq!((line, column), (2, 5));
        assert!(message.contains("print statement"));

        let (line, _, message) = python2_error("x = 1\nexec 'x = 2'\n");
        assert_eq!(line, 2);
        assert!(message.contains("exec statement"));

        let (_, _, message) =
            python2_error("try:\n    pass\nexcept ValueError, e:\n    pass\n");
        assert!(message.contains("except clause"));
    }

    #[test]
    fn test_python2_expressions_are_syntax_errors() {
        assert!(python2_error("def f(a):\n    return a <> 1\n").2.contains("<>"));
        assert!(python2_error("def f(a):\n    return `a`\n").2.contains("backquote"));
        assert!(python2_error("x = 10L\n").2.contains("long integer"));
        assert!(python2_error("x = 0777\n").2.contains("leading zero"));
        assert!(python2_error("x = ur'a'\n").2.contains("string prefix"));
    }

    #[test]
    fn test_python3_forms_are_accepted() {
        let source = "print('hi')\nexec('x = 1')\ntry:\n    pass\nexcept (ValueError, KeyError) as e:\n    pass\nx = 0\ny = 00\nz = 0o777\nw = rb'a' + u'b' + Rb'c'\n\ndef f(a):\n    return a != 1\n";
        let module = extract(source).unwrap();
        assert_eq!(module.functions.len(), 1);
    }

    #[test]
    fn test_file_outside_root_is_rejected() {
        let err = PythonExtractor::new()
            .extract_source("x = 1\n", Path::new("/elsewhere/mod.py"), Path::new("/repo"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::PathOutsideRoot(..)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_empty_module() {
        let module = extract("").unwrap();
        assert!(module.is_empty());
    }
}
