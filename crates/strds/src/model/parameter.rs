use serde::{Deserialize, Serialize};

/// Represents a regular (positional-or-keyword) parameter of a callable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Line of the parameter name (1-indexed)
    pub line_number: usize,

    /// Column of the parameter name (1-indexed, cursor aligned)
    pub col_offset: usize,

    /// Annotation source text (if annotated)
    #[serde(rename = "type", default)]
    pub type_annotation: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, line_number: usize, col_offset: usize) -> Self {
        Self {
            name: name.into(),
            line_number,
            col_offset,
            type_annotation: None,
        }
    }

    pub fn with_type(mut self, type_ann: impl Into<String>) -> Self {
        self.type_annotation = Some(type_ann.into());
        self
    }

    pub fn set_type(mut self, type_ann: Option<String>) -> Self {
        self.type_annotation = type_ann;
        self
    }

    /// Annotation text, treating an empty annotation like a missing one
    pub fn type_text(&self) -> Option<&str> {
        self.type_annotation.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_type_key_is_type() {
        let param = Parameter::new("x", 3, 7).with_type("str");
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json["type"], "str");
        assert_eq!(json["line_number"], 3);
        assert_eq!(json["col_offset"], 7);
        assert!(json.get("type_annotation").is_none());
    }

    #[test]
    fn test_parameter_missing_type_defaults_to_none() {
        let param: Parameter =
            serde_json::from_str(r#"{"name": "x", "line_number": 1, "col_offset": 7}"#).unwrap();
        assert_eq!(param.type_annotation, None);
        assert_eq!(param.type_text(), None);
    }

    #[test]
    fn test_empty_type_is_treated_as_missing() {
        let param = Parameter::new("x", 1, 7).with_type("");
        assert_eq!(param.type_text(), None);
    }
}
