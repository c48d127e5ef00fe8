//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, SourcePosition, StackFrame};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_every_kind_has_constructor_name() {
        let names: Vec<&str> = ErrorKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "Error",
                "TypeError",
                "RangeError",
                "SyntaxError",
                "ReferenceError",
                "EvalError",
                "URIError"
            ]
        );
    }

    #[test]
    fn test_display_matches_name() {
        assert_eq!(ErrorKind::URIError.to_string(), "URIError");
        assert_eq!(ErrorKind::from_name("SyntaxError"), Some(ErrorKind::SyntaxError));
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_shorthand_constructors_set_kind() {
        assert_eq!(JsError::type_error("x").kind, ErrorKind::TypeError);
        assert_eq!(JsError::range_error("x").kind, ErrorKind::RangeError);
        assert_eq!(JsError::syntax_error("x").kind, ErrorKind::SyntaxError);
        assert_eq!(JsError::reference_error("x").kind, ErrorKind::ReferenceError);
    }

    #[test]
    fn test_error_message_formatting() {
        let error = JsError::new(ErrorKind::Error, "boom");
        assert_eq!(format!("{}", error), "Error: boom");
    }

    #[test]
    fn test_with_stack_keeps_frames() {
        let pos = SourcePosition {
            line: 2,
            column: 3,
            offset: 10,
        };
        let error = JsError::type_error("not callable")
            .with_stack(vec![StackFrame::at(Some("f"), Some("a.js"), &pos)]);
        assert_eq!(error.stack.len(), 1);
        assert_eq!(error.stack[0].line, 2);
    }

    #[test]
    fn test_js_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&JsError::range_error("Invalid array length"));
    }
}
