use super::callable::Method;
use serde::{Deserialize, Serialize};

/// Represents a Python class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Class name
    pub name: String,

    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<Method>,

    /// Base classes written as plain identifiers
    #[serde(default)]
    pub superclasses: Vec<String>,

    /// Names bound by plain assignments in the class body
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            superclasses: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_superclasses(mut self, bases: Vec<String>) -> Self {
        self.superclasses = bases;
        self
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// The initializer, if the class defines one
    pub fn constructor(&self) -> Option<&Method> {
        self.methods.iter().find(|m| m.is_constructor)
    }

    /// Order methods, bases and fields by name
    pub fn sort(&mut self) {
        for method in &mut self.methods {
            method.sort();
        }
        self.methods.sort_by(|a, b| a.name.cmp(&b.name));
        self.superclasses.sort();
        self.fields.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Callable;

    #[test]
    fn test_constructor_lookup() {
        let class = Class::new("Point").with_methods(vec![
            Method::new(Callable::new("norm", 5, 9)),
            Method::new(Callable::new("__init__", 2, 9)),
        ]);
        assert_eq!(class.constructor().map(|m| m.name.as_str()), Some("__init__"));
    }

    #[test]
    fn test_sort_orders_every_collection() {
        let mut class = Class::new("A")
            .with_methods(vec![
                Method::new(Callable::new("z", 2, 9)),
                Method::new(Callable::new("a", 4, 9)),
            ])
            .with_superclasses(vec!["Mixin".into(), "Base".into()])
            .with_fields(vec!["y".into(), "x".into()]);
        class.sort();
        assert_eq!(class.methods[0].name, "a");
        assert_eq!(class.superclasses, ["Base", "Mixin"]);
        assert_eq!(class.fields, ["x", "y"]);
    }
}
