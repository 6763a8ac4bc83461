//! Signature rendering

use strds::model::Parameter;

/// Render `name(p1: T1, p2) -> R`.
///
/// Parameter annotations go through [`Parameter::type_text`]; pass the
/// return annotation the same way, via `Callable::return_text`.
pub fn craft_signature(name: &str, parameters: &[Parameter], return_type: Option<&str>) -> String {
    let params = parameters
        .iter()
        .map(|param| match param.type_text() {
            Some(ty) => format!("{}: {ty}", param.name),
            None => param.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    match return_type {
        Some(ret) => format!("{name}({params}) -> {ret}"),
        None => format!("{name}({params})"),
    }
}

/// Prefix a signature with its owning class
pub fn qualify_signature(class_name: &str, signature: &str) -> String {
    format!("{class_name}.{signature}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strds::model::Callable;

    #[test]
    fn test_signature_with_types_and_return() {
        let params = vec![
            Parameter::new("a", 1, 7).with_type("int"),
            Parameter::new("b", 1, 15),
        ];
        assert_eq!(craft_signature("foo", &params, Some("str")), "foo(a: int, b) -> str");
    }

    #[test]
    fn test_signature_without_parameters() {
        assert_eq!(craft_signature("bar", &[], None), "bar()");
    }

    #[test]
    fn test_empty_annotations_are_omitted() {
        let callable = Callable::new("f", 1, 5)
            .with_parameters(vec![Parameter::new("x", 1, 7).with_type("")])
            .with_return_type("");
        assert_eq!(
            craft_signature(&callable.name, &callable.parameters, callable.return_text()),
            "f(x)"
        );
    }

    #[test]
    fn test_qualified_signature() {
        let sig = craft_signature("__init__", &[Parameter::new("self", 2, 18)], Some("None"));
        assert_eq!(
            qualify_signature("Greeter", &sig),
            "Greeter.__init__(self) -> None"
        );
    }
}
