//! Unit tests for SourcePosition and StackFrame

use core_types::{SourcePosition, StackFrame};

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_equality() {
        let a = SourcePosition {
            line: 42,
            column: 7,
            offset: 1000,
        };
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(
            a,
            SourcePosition {
                line: 42,
                column: 8,
                offset: 1001
            }
        );
    }
}

#[cfg(test)]
mod stack_frame_tests {
    use super::*;

    #[test]
    fn test_named_frame_renders_location() {
        let frame = StackFrame {
            function_name: Some("render".to_string()),
            source_url: Some("app.js".to_string()),
            line: 12,
            column: 4,
        };
        assert_eq!(frame.to_string(), "\tat render (app.js:12:4)");
    }

    #[test]
    fn test_anonymous_frame_without_source() {
        let frame = StackFrame {
            function_name: None,
            source_url: None,
            line: 1,
            column: 1,
        };
        assert_eq!(frame.to_string(), "\tat <anonymous> (<unknown>:1:1)");
    }

    #[test]
    fn test_frame_at_position_copies_line_and_column() {
        let pos = SourcePosition {
            line: 9,
            column: 21,
            offset: 300,
        };
        let frame = StackFrame::at(Some("main"), None, &pos);
        assert_eq!(frame.function_name.as_deref(), Some("main"));
        assert_eq!((frame.line, frame.column), (9, 21));
    }
}
