use super::class::Class;
use super::parameter::Parameter;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Name of the Python initializer method
pub const INITIALIZER_NAME: &str = "__init__";

fn default_annotations() -> Option<String> {
    Some(String::new())
}

/// State shared by functions and methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    /// Callable name
    pub name: String,

    /// Line of the `def` keyword (1-indexed)
    pub line_number: usize,

    /// Column of the callable name (1-indexed, cursor aligned)
    pub col_offset: usize,

    /// Regular parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Return annotation source text (if annotated)
    #[serde(default)]
    pub return_type: Option<String>,

    /// Literal source text of the whole definition
    pub body: String,

    /// Synthesized `name(params) -> return` signature
    pub signature: String,

    /// Signature qualified with the owning class, if any
    pub full_signature: String,

    /// Free-form annotations attached by downstream tooling
    #[serde(default = "default_annotations")]
    pub annotations: Option<String>,
}

impl Callable {
    pub fn new(name: impl Into<String>, line_number: usize, col_offset: usize) -> Self {
        let name = name.into();
        Self {
            signature: format!("{name}()"),
            full_signature: format!("{name}()"),
            name,
            line_number,
            col_offset,
            parameters: Vec::new(),
            return_type: None,
            body: String::new(),
            annotations: default_annotations(),
        }
    }

    pub fn with_parameters(mut self, params: Vec<Parameter>) -> Self {
        self.parameters = params;
        self
    }

    pub fn with_return_type(mut self, ret: impl Into<String>) -> Self {
        self.return_type = Some(ret.into());
        self
    }

    pub fn set_return_type(mut self, ret: Option<String>) -> Self {
        self.return_type = ret;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set both signatures to the same text
    pub fn with_signature(mut self, sig: impl Into<String>) -> Self {
        let sig = sig.into();
        self.full_signature = sig.clone();
        self.signature = sig;
        self
    }

    /// Return annotation text, treating an empty annotation like a missing one
    pub fn return_text(&self) -> Option<&str> {
        self.return_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Order parameters by name. Opt-in; extraction keeps declaration order.
    pub fn sort(&mut self) {
        self.parameters.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// A module-level function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    #[serde(flatten)]
    pub callable: Callable,
}

impl Function {
    pub fn new(callable: Callable) -> Self {
        Self { callable }
    }
}

impl Deref for Function {
    type Target = Callable;

    fn deref(&self) -> &Callable {
        &self.callable
    }
}

impl DerefMut for Function {
    fn deref_mut(&mut self) -> &mut Callable {
        &mut self.callable
    }
}

/// A function defined directly in a class body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    #[serde(flatten)]
    pub callable: Callable,

    /// True iff the method is the class initializer
    #[serde(default)]
    pub is_constructor: bool,
}

impl Method {
    /// Wrap a callable, deriving `is_constructor` from its name
    pub fn new(callable: Callable) -> Self {
        let is_constructor = callable.name == INITIALIZER_NAME;
        Self {
            callable,
            is_constructor,
        }
    }
}

impl Deref for Method {
    type Target = Callable;

    fn deref(&self) -> &Callable {
        &self.callable
    }
}

impl DerefMut for Method {
    fn deref_mut(&mut self) -> &mut Callable {
        &mut self.callable
    }
}

/// Borrowed view over either kind of callable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableRef<'a> {
    Function(&'a Function),
    Method(&'a Class, &'a Method),
}

impl<'a> CallableRef<'a> {
    pub fn callable(&self) -> &'a Callable {
        match self {
            CallableRef::Function(func) => &func.callable,
            CallableRef::Method(_, method) => &method.callable,
        }
    }

    pub fn name(&self) -> &'a str {
        &self.callable().name
    }

    /// Owning class, for methods
    pub fn class(&self) -> Option<&'a Class> {
        match self {
            CallableRef::Function(_) => None,
            CallableRef::Method(class, _) => Some(class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Callable {
        Callable::new("f", 1, 5)
            .with_parameters(vec![Parameter::new("x", 1, 7).with_type("str")])
            .with_return_type("int")
            .with_body("def f(x: str) -> int: return len(x)")
            .with_signature("f(x: str) -> int")
    }

    #[test]
    fn test_method_constructor_detection() {
        assert!(Method::new(Callable::new("__init__", 2, 9)).is_constructor);
        assert!(!Method::new(Callable::new("init", 2, 9)).is_constructor);
    }

    #[test]
    fn test_function_json_is_flat() {
        let json = serde_json::to_value(Function::new(sample())).unwrap();
        assert_eq!(json["name"], "f");
        assert_eq!(json["signature"], "f(x: str) -> int");
        assert_eq!(json["annotations"], "");
        assert!(json.get("callable").is_none());
    }

    #[test]
    fn test_method_json_places_constructor_flag_last() {
        let text = serde_json::to_string(&Method::new(sample())).unwrap();
        assert!(text.ends_with(r#""is_constructor":false}"#));
    }

    #[test]
    fn test_method_defaults_when_optional_keys_missing() {
        let method: Method = serde_json::from_str(
            r#"{"name": "m", "line_number": 2, "col_offset": 9, "body": "def m(self): pass",
                "signature": "A.m(self)", "full_signature": "A.m(self)"}"#,
        )
        .unwrap();
        assert!(method.parameters.is_empty());
        assert_eq!(method.return_type, None);
        assert_eq!(method.annotations.as_deref(), Some(""));
        assert!(!method.is_constructor);
    }

    #[test]
    fn test_empty_return_type_is_treated_as_missing() {
        assert_eq!(sample().return_text(), Some("int"));
        assert_eq!(Callable::new("f", 1, 5).with_return_type("").return_text(), None);
        assert_eq!(Callable::new("f", 1, 5).return_text(), None);
    }

    #[test]
    fn test_sort_orders_parameters_by_name() {
        let mut callable = Callable::new("f", 1, 5).with_parameters(vec![
            Parameter::new("b", 1, 7),
            Parameter::new("a", 1, 10),
        ]);
        callable.sort();
        let names: Vec<_> = callable.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
