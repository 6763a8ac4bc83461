//! Removal of type annotations from Python code

use crate::extractor::parse;
use std::ops::Range;
use std::path::Path;
use tracing::warn;
use tree_sitter::Node;

/// Remove parameter, return and annotated-assignment annotations.
///
/// `x: int = 1` becomes `x = 1`, `def f(a: str) -> str:` becomes `def f(a):`.
/// Code that does not parse cleanly is returned unchanged.
pub fn strip_type_annotations(code: &str) -> String {
    let tree = match parse(code, Path::new("<snippet>")) {
        Ok(tree) => tree,
        Err(e) => {
            warn!("Failed to remove type annotations: {}", e);
            return code.to_string();
        }
    };
    let root = tree.root_node();
    if root.has_error() {
        warn!("Failed to remove type annotations: code does not parse");
        return code.to_string();
    }

    let mut removals = Vec::new();
    collect_removals(root, &mut removals);
    removals.sort_by_key(|range| range.start);

    let mut stripped = String::with_capacity(code.len());
    let mut copied_to = 0;
    for range in removals {
        if range.start < copied_to {
            continue;
        }
        stripped.push_str(code.get(copied_to..range.start).unwrap_or(""));
        copied_to = range.end;
    }
    stripped.push_str(code.get(copied_to..).unwrap_or(""));
    stripped
}

fn collect_removals(node: Node, removals: &mut Vec<Range<usize>>) {
    let annotated = match node.kind() {
        "typed_parameter" => node.named_child(0).zip(node.child_by_field_name("type")),
        "typed_default_parameter" => node
            .child_by_field_name("name")
            .zip(node.child_by_field_name("type")),
        "function_definition" => node
            .child_by_field_name("parameters")
            .zip(node.child_by_field_name("return_type")),
        "assignment" => node
            .child_by_field_name("left")
            .zip(node.child_by_field_name("type")),
        _ => None,
    };
    if let Some((kept, annotation)) = annotated {
        removals.push(kept.end_byte()..annotation.end_byte());
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_removals(child, removals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_parameter_and_return_annotations() {
        let code = "def to_bash_variable(param: str) -> str:\n    \"\"\"\n        Convert a command variable in a bash variable\n    \"\"\"\n    return param.upper().replace('-', '_')";
        let expected = "def to_bash_variable(param):\n    \"\"\"\n        Convert a command variable in a bash variable\n    \"\"\"\n    return param.upper().replace('-', '_')";
        assert_eq!(strip_type_annotations(code), expected);
    }

    #[test]
    fn test_strip_defaults_and_nested_definitions() {
        let code = "def f(a: int = 1, *args: str, **kw: Any) -> None:\n    def g(b: list[int]) -> int:\n        return b[0]\n    total: int = g([a])\n    count: int\n";
        let expected = "def f(a = 1, *args, **kw):\n    def g(b):\n        return b[0]\n    total = g([a])\n    count\n";
        assert_eq!(strip_type_annotations(code), expected);
    }

    #[test]
    fn test_unannotated_code_is_unchanged() {
        let code = "def f(a, b=2):\n    return {'k': a}\n";
        assert_eq!(strip_type_annotations(code), code);
    }

    #[test]
    fn test_invalid_code_is_returned_unchanged() {
        let code = "def f(a: int -> :\n";
        assert_eq!(strip_type_annotations(code), code);
    }
}
