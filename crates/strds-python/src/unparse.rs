//! Canonical rendering of annotation expressions.
//!
//! Output follows Python's own unparser: one space after commas and around
//! binary operators, no padding inside brackets, parentheses only where
//! precedence needs them, no trailing commas, and string literals re-quoted
//! the way `repr` quotes them. Forms without a dedicated rule (lambdas,
//! comprehensions, f-strings) keep their source text with line breaks folded.

use tree_sitter::Node;

/// Binding strength of expression forms, loosest first
mod prec {
    pub const TEST: u8 = 1;
    pub const OR: u8 = 2;
    pub const AND: u8 = 3;
    pub const NOT: u8 = 4;
    pub const CMP: u8 = 5;
    pub const BOR: u8 = 6;
    pub const BXOR: u8 = 7;
    pub const BAND: u8 = 8;
    pub const SHIFT: u8 = 9;
    pub const ARITH: u8 = 10;
    pub const TERM: u8 = 11;
    pub const FACTOR: u8 = 12;
    pub const POWER: u8 = 13;
    pub const AWAIT: u8 = 14;
    pub const ATOM: u8 = 15;
}

/// Render an annotation subtree (a `type` node or any expression below it)
pub(crate) fn render_annotation(node: Node, source: &str) -> String {
    Renderer { source }.expr(node)
}

struct Renderer<'a> {
    source: &'a str,
}

impl<'a> Renderer<'a> {
    fn text(&self, node: Node) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn raw(&self, node: Node) -> String {
        fold_line_breaks(self.text(node))
    }

    fn expr(&self, node: Node) -> String {
        let children = code_children(node);
        match node.kind() {
            "type" | "parenthesized_expression" => match children.as_slice() {
                [inner] => self.expr(*inner),
                _ => self.raw(node),
            },
            "identifier" | "keyword_identifier" | "none" | "true" | "false" | "ellipsis" => {
                self.text(node).to_string()
            }
            "integer" => render_integer(self.text(node)),
            "float" => self.text(node).replace('_', ""),
            "string" | "concatenated_string" => {
                self.string(node).unwrap_or_else(|| self.raw(node))
            }
            "attribute" => match (
                node.child_by_field_name("object"),
                node.child_by_field_name("attribute"),
            ) {
                (Some(object), Some(attr)) => {
                    format!("{}.{}", self.operand(object, prec::ATOM), self.text(attr))
                }
                _ => self.raw(node),
            },
            "member_type" => match children.as_slice() {
                [object, attr] => format!("{}.{}", self.expr(*object), self.text(*attr)),
                _ => self.raw(node),
            },
            "subscript" => self.subscript(node),
            "generic_type" => match children.as_slice() {
                [name, params] => format!(
                    "{}[{}]",
                    self.text(*name),
                    self.index(&code_children(*params), has_trailing_comma(*params))
                ),
                _ => self.raw(node),
            },
            "slice" => self.slice(node),
            "call" => match (
                node.child_by_field_name("function"),
                node.child_by_field_name("arguments"),
            ) {
                (Some(function), Some(args)) if args.kind() == "argument_list" => {
                    format!("{}({})", self.operand(function, prec::ATOM), self.items(args))
                }
                _ => self.raw(node),
            },
            "keyword_argument" => match (
                node.child_by_field_name("name"),
                node.child_by_field_name("value"),
            ) {
                (Some(name), Some(value)) => format!("{}={}", self.text(name), self.expr(value)),
                _ => self.raw(node),
            },
            "list_splat" => self.prefixed("*", &children, node),
            "splat_type" => self.text(node).split_whitespace().collect::<String>(),
            "dictionary_splat" => self.prefixed("**", &children, node),
            "list" => format!("[{}]", self.items(node)),
            "set" => format!("{{{}}}", self.items(node)),
            "dictionary" => format!("{{{}}}", self.items(node)),
            "pair" => match (node.child_by_field_name("key"), node.child_by_field_name("value")) {
                (Some(key), Some(value)) => format!("{}: {}", self.expr(key), self.expr(value)),
                _ => self.raw(node),
            },
            "tuple" => match children.len() {
                0 => "()".to_string(),
                1 => format!("({},)", self.expr(children[0])),
                _ => format!("({})", self.items(node)),
            },
            "binary_operator" => self.binary(node),
            "union_type" => match children.as_slice() {
                [left, right] => format!(
                    "{} | {}",
                    self.operand(*left, prec::BOR),
                    self.operand(*right, prec::BOR + 1)
                ),
                _ => self.raw(node),
            },
            "unary_operator" => match (
                node.child_by_field_name("operator"),
                node.child_by_field_name("argument"),
            ) {
                (Some(op), Some(arg)) => {
                    format!("{}{}", self.text(op), self.operand(arg, prec::FACTOR))
                }
                _ => self.raw(node),
            },
            "not_operator" => match node.child_by_field_name("argument") {
                Some(arg) => format!("not {}", self.operand(arg, prec::NOT)),
                None => self.raw(node),
            },
            "boolean_operator" => match (
                node.child_by_field_name("left"),
                node.child_by_field_name("operator"),
                node.child_by_field_name("right"),
            ) {
                (Some(left), Some(op), Some(right)) => {
                    let p = precedence(node);
                    format!(
                        "{} {} {}",
                        self.operand(left, p),
                        self.text(op),
                        self.operand(right, p + 1)
                    )
                }
                _ => self.raw(node),
            },
            "comparison_operator" => self.comparison(node),
            "conditional_expression" => match children.as_slice() {
                [body, test, orelse] => format!(
                    "{} if {} else {}",
                    self.operand(*body, prec::TEST + 1),
                    self.operand(*test, prec::TEST + 1),
                    self.operand(*orelse, prec::TEST)
                ),
                _ => self.raw(node),
            },
            "await" => match children.as_slice() {
                [arg] => format!("await {}", self.operand(*arg, prec::ATOM)),
                _ => self.raw(node),
            },
            _ => self.raw(node),
        }
    }

    /// Render `node`, parenthesized when it binds looser than `min`
    fn operand(&self, node: Node, min: u8) -> String {
        let node = strip_parens(node);
        let text = self.expr(node);
        if precedence(node) < min {
            format!("({text})")
        } else {
            text
        }
    }

    fn prefixed(&self, prefix: &str, children: &[Node], node: Node) -> String {
        match children {
            [inner] => format!("{prefix}{}", self.operand(*inner, prec::BOR)),
            _ => self.raw(node),
        }
    }

    /// Comma separated rendering of the element children of a container
    fn items(&self, node: Node) -> String {
        code_children(node)
            .into_iter()
            .map(|child| self.expr(child))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn subscript(&self, node: Node) -> String {
        let Some(value) = node.child_by_field_name("value") else {
            return self.raw(node);
        };
        let mut cursor = node.walk();
        let subscripts: Vec<Node> = node.children_by_field_name("subscript", &mut cursor).collect();
        if subscripts.is_empty() {
            return self.raw(node);
        }
        format!(
            "{}[{}]",
            self.operand(value, prec::ATOM),
            self.index(&subscripts, has_trailing_comma(node))
        )
    }

    /// Contents of an index bracket. Several entries form a tuple, which
    /// is written without parentheses; a one-element tuple keeps its comma.
    fn index(&self, entries: &[Node], trailing_comma: bool) -> String {
        match entries {
            [only] => {
                let only = strip_parens(*only);
                let elements = code_children(only);
                if only.kind() == "tuple" && !elements.is_empty() {
                    self.tuple_elements(&elements)
                } else if trailing_comma {
                    format!("{},", self.expr(only))
                } else {
                    self.expr(only)
                }
            }
            many => self.tuple_elements(many),
        }
    }

    fn tuple_elements(&self, elements: &[Node]) -> String {
        let rendered: Vec<String> = elements.iter().map(|e| self.expr(*e)).collect();
        match rendered.as_slice() {
            [only] => format!("{only},"),
            _ => rendered.join(", "),
        }
    }

    fn slice(&self, node: Node) -> String {
        let mut parts = vec![String::new()];
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                ":" => parts.push(String::new()),
                "comment" | "line_continuation" => {}
                _ => {
                    if let Some(last) = parts.last_mut() {
                        *last = self.expr(child);
                    }
                }
            }
        }
        let lower = parts.first().map(String::as_str).unwrap_or("");
        let upper = parts.get(1).map(String::as_str).unwrap_or("");
        match parts.get(2).filter(|step| !step.is_empty()) {
            Some(step) => format!("{lower}:{upper}:{step}"),
            None => format!("{lower}:{upper}"),
        }
    }

    fn binary(&self, node: Node) -> String {
        let (Some(left), Some(op), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            return self.raw(node);
        };
        let p = precedence(node);
        // `**` groups to the right, everything else to the left
        let (left_min, right_min) = if op.kind() == "**" { (p + 1, p) } else { (p, p + 1) };
        format!(
            "{} {} {}",
            self.operand(left, left_min),
            op.kind(),
            self.operand(right, right_min)
        )
    }

    fn comparison(&self, node: Node) -> String {
        let mut parts = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "comment" || child.kind() == "line_continuation" {
                continue;
            }
            if child.is_named() {
                parts.push(self.operand(child, prec::CMP + 1));
            } else {
                parts.push(child.kind().to_string());
            }
        }
        parts.join(" ")
    }

    /// Plain or bytes literal (or an implicit concatenation of them) in `repr` form
    fn string(&self, node: Node) -> Option<String> {
        let pieces = if node.kind() == "concatenated_string" {
            code_children(node)
        } else {
            vec![node]
        };

        let mut value = String::new();
        let mut bytes = None;
        for piece in pieces {
            let (is_bytes, text) = self.string_value(piece)?;
            if *bytes.get_or_insert(is_bytes) != is_bytes {
                return None;
            }
            value.push_str(&text);
        }
        Some(if bytes == Some(true) {
            bytes_repr(&value)
        } else {
            str_repr(&value)
        })
    }

    /// Decoded value of one literal, with whether it is a bytes literal.
    /// Formatted literals have no static value and yield `None`.
    fn string_value(&self, node: Node) -> Option<(bool, String)> {
        let start = node.child(0).filter(|c| c.kind() == "string_start")?;
        let end = node
            .child(node.child_count().checked_sub(1)?)
            .filter(|c| c.kind() == "string_end")?;

        let delimiter = self.text(start);
        let prefix: String = delimiter
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if prefix.contains('f') {
            return None;
        }
        let body = self.source.get(start.end_byte()..end.start_byte())?;
        let value = if prefix.contains('r') {
            body.to_string()
        } else {
            unescape(body)
        };
        Some((prefix.contains('b'), value))
    }
}

/// Named children that carry code, in source order
fn code_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !matches!(child.kind(), "comment" | "line_continuation"))
        .collect()
}

/// True when the last entry of a bracketed list is followed by a comma
fn has_trailing_comma(node: Node) -> bool {
    let mut cursor = node.walk();
    let children: Vec<Node> = node
        .children(&mut cursor)
        .filter(|c| !matches!(c.kind(), "comment" | "line_continuation"))
        .collect();
    children.len() >= 2 && children[children.len() - 2].kind() == ","
}

/// Look through grouping parentheses
fn strip_parens(mut node: Node) -> Node {
    while matches!(node.kind(), "parenthesized_expression" | "type") {
        match code_children(node).as_slice() {
            [inner] => node = *inner,
            _ => break,
        }
    }
    node
}

fn precedence(node: Node) -> u8 {
    match node.kind() {
        "lambda" | "conditional_expression" | "named_expression" => prec::TEST,
        "boolean_operator" => match node.child_by_field_name("operator").map(|op| op.kind()) {
            Some("and") => prec::AND,
            _ => prec::OR,
        },
        "not_operator" => prec::NOT,
        "comparison_operator" => prec::CMP,
        "union_type" => prec::BOR,
        "binary_operator" => match node.child_by_field_name("operator").map(|op| op.kind()) {
            Some("|") => prec::BOR,
            Some("^") => prec::BXOR,
            Some("&") => prec::BAND,
            Some("<<" | ">>") => prec::SHIFT,
            Some("+" | "-") => prec::ARITH,
            Some("**") => prec::POWER,
            _ => prec::TERM,
        },
        "unary_operator" => prec::FACTOR,
        "await" => prec::AWAIT,
        _ => prec::ATOM,
    }
}

/// Integer literal in decimal, the way Python prints its value
fn render_integer(text: &str) -> String {
    let digits = text.replace('_', "").to_ascii_lowercase();
    let parsed = if let Some(hex) = digits.strip_prefix("0x") {
        u128::from_str_radix(hex, 16)
    } else if let Some(oct) = digits.strip_prefix("0o") {
        u128::from_str_radix(oct, 8)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        u128::from_str_radix(bin, 2)
    } else {
        digits.parse::<u128>()
    };
    match parsed {
        Ok(value) => value.to_string(),
        Err(_) => digits,
    }
}

/// Resolve backslash escapes of a non-raw literal body
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' | '\'' | '"' => out.push(escaped),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(code));
            }
            'x' | 'u' | 'U' => {
                let width = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = chars.by_ref().take(width).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == width => out.push(decoded),
                    _ => {
                        out.push('\\');
                        out.push(escaped);
                        out.push_str(&hex);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn repr_quote(value: &str) -> char {
    if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    }
}

fn is_printable(c: char) -> bool {
    c == ' ' || !(c.is_control() || c.is_whitespace())
}

/// `repr` of a Python `str`
fn str_repr(value: &str) -> String {
    let quote = repr_quote(value);
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x100 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push(quote);
    out
}

/// `repr` of a Python `bytes`
fn bytes_repr(value: &str) -> String {
    let quote = repr_quote(value);
    let mut out = String::with_capacity(value.len() + 3);
    out.push('b');
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            c => out.push_str(&format!("\\x{:02x}", (c as u32) & 0xff)),
        }
    }
    out.push(quote);
    out
}

/// Collapse line breaks inside multi-line source text.
///
/// Whitespace runs containing a newline disappear next to brackets and
/// become a single space elsewhere. Single-line text is returned unchanged.
pub(crate) fn fold_line_breaks(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }

    let mut folded = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if !c.is_whitespace() {
            folded.push(c);
            continue;
        }

        let mut run = String::from(c);
        while let Some(&next) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            run.push(next);
            chars.next();
        }

        if !run.contains('\n') {
            folded.push_str(&run);
            continue;
        }
        let after_open = matches!(folded.chars().last(), Some('[' | '(' | '{'));
        let before_close = matches!(chars.peek(), Some(']' | ')' | '}') | None);
        if !after_open && !before_close && !folded.is_empty() {
            folded.push(' ');
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    /// Render the annotation of the first parameter of `def f(x: <ann>): pass`
    fn render(annotation: &str) -> String {
        let source = format!("def f(x: {annotation}): pass\n");
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::language())
            .unwrap();
        let tree = parser.parse(&source, None).unwrap();
        let function = tree.root_node().named_child(0).unwrap();
        let param = function
            .child_by_field_name("parameters")
            .unwrap()
            .named_child(0)
            .unwrap();
        let ty = param.child_by_field_name("type").unwrap();
        render_annotation(ty, &source)
    }

    #[test]
    fn test_plain_names_are_unchanged() {
        assert_eq!(render("str"), "str");
        assert_eq!(render("typing.Optional[int]"), "typing.Optional[int]");
        assert_eq!(render("None"), "None");
    }

    #[test]
    fn test_space_after_commas() {
        assert_eq!(render("Dict[str,int]"), "Dict[str, int]");
        assert_eq!(render("Callable[[int,str],  bool]"), "Callable[[int, str], bool]");
    }

    #[test]
    fn test_no_padding_inside_brackets() {
        assert_eq!(render("List[ int ]"), "List[int]");
        assert_eq!(render("Tuple[ int , ... ]"), "Tuple[int, ...]");
    }

    #[test]
    fn test_redundant_parentheses_are_dropped() {
        assert_eq!(render("(str)"), "str");
        assert_eq!(render("((int))"), "int");
        assert_eq!(render("Dict[(str), (int)]"), "Dict[str, int]");
    }

    #[test]
    fn test_required_parentheses_are_kept() {
        assert_eq!(render("a | (b | c)"), "a | (b | c)");
        assert_eq!(render("(a | b) | c"), "a | b | c");
    }

    #[test]
    fn test_trailing_commas_are_dropped() {
        assert_eq!(render("Union[\n    int,\n    str,\n]"), "Union[int, str]");
        assert_eq!(render("Literal['a', 'b',]"), "Literal['a', 'b']");
        assert_eq!(render("Tuple[int,]"), "Tuple[int,]");
    }

    #[test]
    fn test_strings_are_requoted() {
        assert_eq!(render("\"str\""), "'str'");
        assert_eq!(render("'str'"), "'str'");
        assert_eq!(render("\"it's\""), "\"it's\"");
        assert_eq!(render("'a' \"b\""), "'ab'");
        assert_eq!(render("b\"raw\""), "b'raw'");
        assert_eq!(render("'tab\\there'"), "'tab\\there'");
    }

    #[test]
    fn test_operators_are_spaced() {
        assert_eq!(render("int|None"), "int | None");
        assert_eq!(render("Literal[-1]"), "Literal[-1]");
    }

    #[test]
    fn test_integer_literals_are_decimal() {
        assert_eq!(render("Literal[0x10, 1_000]"), "Literal[16, 1000]");
    }

    #[test]
    fn test_fold_line_breaks() {
        assert_eq!(fold_line_breaks("dict[str, int]"), "dict[str, int]");
        assert_eq!(
            fold_line_breaks("Union[\n        int,\n        str,\n    ]"),
            "Union[int, str,]"
        );
        assert_eq!(fold_line_breaks("Callable[\n    [int], str\n]"), "Callable[[int], str]");
    }
}
