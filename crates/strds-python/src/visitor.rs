//! Syntax tree visitor for extracting Python entities

use crate::error::{ExtractError, Result};
use crate::position::{callable_col_offset, line_offset, param_col_offset, RawPosition};
use crate::signature::{craft_signature, qualify_signature};
use crate::unparse::render_annotation;
use std::path::Path;
use strds::model::{Callable, Class, Function, Method, Parameter};
use tree_sitter::Node;

pub struct PythonVisitor<'a> {
    source: &'a str,
    file_path: &'a Path,
    pub functions: Vec<Function>,
    pub classes: Vec<Class>,
}

impl<'a> PythonVisitor<'a> {
    pub fn new(source: &'a str, file_path: &'a Path) -> Self {
        Self {
            source,
            file_path,
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn missing(&self, what: &str) -> ExtractError {
        ExtractError::MissingPosition(self.file_path.to_path_buf(), what.to_string())
    }

    /// Visit the top-level statements of a module
    pub fn visit_module(&mut self, root: Node) -> Result<()> {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let Some(definition) = unwrap_decorated(child) else {
                continue;
            };
            match definition.kind() {
                "function_definition" if !is_async(definition) => {
                    let callable = self.visit_callable(definition, None)?;
                    self.functions.push(Function::new(callable));
                }
                "class_definition" => {
                    let class = self.visit_class(definition)?;
                    self.classes.push(class);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn visit_class(&self, node: Node) -> Result<Class> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n).to_string())
            .ok_or_else(|| self.missing("class name"))?;

        // Only plain identifiers; attribute, subscript, keyword and splat bases are skipped
        let mut superclasses = Vec::new();
        if let Some(bases) = node.child_by_field_name("superclasses") {
            let mut cursor = bases.walk();
            for base in bases.named_children(&mut cursor) {
                if base.kind() == "identifier" {
                    superclasses.push(self.node_text(base).to_string());
                }
            }
        }

        let mut methods = Vec::new();
        let mut fields = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for stmt in body.named_children(&mut cursor) {
                let Some(definition) = unwrap_decorated(stmt) else {
                    continue;
                };
                match definition.kind() {
                    "function_definition" if !is_async(definition) => {
                        let callable = self.visit_callable(definition, Some(&name))?;
                        methods.push(Method::new(callable));
                    }
                    "expression_statement" => {
                        let mut inner = definition.walk();
                        for expr in definition.named_children(&mut inner) {
                            if expr.kind() == "assignment" {
                                self.collect_targets(expr, &mut fields);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(Class::new(name)
            .with_methods(methods)
            .with_superclasses(superclasses)
            .with_fields(fields))
    }

    /// Identifier targets of a plain (possibly chained) assignment
    fn collect_targets(&self, assignment: Node, fields: &mut Vec<String>) {
        if assignment.child_by_field_name("type").is_some() {
            return;
        }
        if let Some(left) = assignment.child_by_field_name("left") {
            if left.kind() == "identifier" {
                fields.push(self.node_text(left).to_string());
            }
        }
        if let Some(right) = assignment.child_by_field_name("right") {
            if right.kind() == "assignment" {
                self.collect_targets(right, fields);
            }
        }
    }

    fn visit_callable(&self, node: Node, class_name: Option<&str>) -> Result<Callable> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n).to_string())
            .ok_or_else(|| self.missing("function name"))?;
        let pos = RawPosition::of(node, self.file_path)?;

        let parameters = match node.child_by_field_name("parameters") {
            Some(params) => self.visit_parameters(params)?,
            None => Vec::new(),
        };
        let return_type = node
            .child_by_field_name("return_type")
            .map(|ret| self.annotation_text(ret));
        let body = self
            .source
            .get(node.start_byte()..code_end(node))
            .unwrap_or("");

        let callable = Callable::new(name, line_offset(pos), callable_col_offset(pos))
            .with_parameters(parameters)
            .set_return_type(return_type)
            .with_body(body);

        let signature =
            craft_signature(&callable.name, &callable.parameters, callable.return_text());
        let signature = match class_name {
            Some(class) => qualify_signature(class, &signature),
            None => signature,
        };
        Ok(callable.with_signature(signature))
    }

    /// Regular positional-or-keyword parameters.
    ///
    /// Everything before a `/` marker is positional-only and dropped; the
    /// first `*`, `*args` or `**kwargs` ends the list.
    fn visit_parameters(&self, node: Node) -> Result<Vec<Parameter>> {
        let mut params = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let (name, annotation) = match child.kind() {
                "identifier" => (child, None),
                "typed_parameter" => match child.named_child(0) {
                    Some(name) if name.kind() == "identifier" => {
                        (name, child.child_by_field_name("type"))
                    }
                    _ => break,
                },
                "default_parameter" | "typed_default_parameter" => {
                    match child.child_by_field_name("name") {
                        Some(name) if name.kind() == "identifier" => {
                            (name, child.child_by_field_name("type"))
                        }
                        _ => continue,
                    }
                }
                "positional_separator" => {
                    params.clear();
                    continue;
                }
                "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => break,
                _ => continue,
            };

            let pos = RawPosition::of(name, self.file_path)?;
            params.push(
                Parameter::new(self.node_text(name), line_offset(pos), param_col_offset(pos))
                    .set_type(annotation.map(|ty| self.annotation_text(ty))),
            );
        }
        Ok(params)
    }

    fn annotation_text(&self, node: Node) -> String {
        render_annotation(node, self.source)
    }
}

/// The definition a statement introduces, looking through decorators
fn unwrap_decorated(node: Node) -> Option<Node> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition")
    } else {
        Some(node)
    }
}

fn is_async(node: Node) -> bool {
    node.child(0).is_some_and(|first| first.kind() == "async")
}

/// End byte of the last code token of `node`, ignoring trailing comments
/// the grammar attaches inside nested blocks
pub(crate) fn code_end(node: Node) -> usize {
    let mut last = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "comment" {
            last = Some(child);
        }
    }

    match last {
        Some(child)
            if node.kind() == "block"
                || child.kind() == "block"
                || child.kind().ends_with("_clause")
                || child.kind().ends_with("_definition") =>
        {
            code_end(child)
        }
        _ => node.end_byte(),
    }
}
