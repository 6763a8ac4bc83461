//! Source position arithmetic.
//!
//! Recorded positions are 1-indexed and aligned with an editor cursor: a
//! parameter points at the first character of its name, a callable at the
//! first character of its name after the `def ` keyword.

use crate::error::{ExtractError, Result};
use std::path::Path;
use tree_sitter::Node;

/// Keyword text preceding a callable name
pub const DEF_KEYWORD: &str = "def ";

/// Parser coordinates: 1-indexed line, 0-indexed byte column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPosition {
    pub line: usize,
    pub column: usize,
}

impl RawPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Start position of `node`.
    ///
    /// Nodes inserted by error recovery have no source text and therefore no
    /// meaningful position.
    pub fn of(node: Node, file_path: &Path) -> Result<Self> {
        if node.is_missing() {
            return Err(ExtractError::MissingPosition(
                file_path.to_path_buf(),
                node.kind().to_string(),
            ));
        }
        let point = node.start_position();
        Ok(Self::new(point.row + 1, point.column))
    }
}

pub fn line_offset(pos: RawPosition) -> usize {
    pos.line
}

pub fn param_col_offset(pos: RawPosition) -> usize {
    pos.column + 1
}

pub fn callable_col_offset(pos: RawPosition) -> usize {
    pos.column + 1 + DEF_KEYWORD.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        let pos = RawPosition::new(3, 4);
        assert_eq!(line_offset(pos), 3);
        assert_eq!(param_col_offset(pos), 5);
        assert_eq!(callable_col_offset(pos), 9);
    }

    #[test]
    fn test_column_zero_definition() {
        assert_eq!(callable_col_offset(RawPosition::new(1, 0)), 5);
        assert_eq!(param_col_offset(RawPosition::new(1, 0)), 1);
    }

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::language())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    fn find_missing(node: Node) -> Option<Node> {
        if node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        children.into_iter().find_map(find_missing)
    }

    #[test]
    fn test_missing_node_has_no_position() {
        let trees: Vec<_> = ["x = (1", "f(1, 2", "x = [1, 2"].into_iter().map(parse).collect();
        let missing: Vec<Node> = trees.iter().filter_map(|t| find_missing(t.root_node())).collect();
        assert!(!missing.is_empty());

        for node in missing {
            match RawPosition::of(node, Path::new("pkg/m.py")) {
                Err(ExtractError::MissingPosition(path, kind)) => {
                    assert_eq!(path, Path::new("pkg/m.py"));
                    assert_eq!(kind, node.kind());
                }
                other => panic!("expected missing position, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_position_of_parsed_node() {
        let tree = parse("\n\n    x = 1\n");
        let stmt = tree.root_node().named_child(0).unwrap();
        assert_eq!(
            RawPosition::of(stmt, Path::new("m.py")).unwrap(),
            RawPosition::new(3, 4)
        );
    }
}
