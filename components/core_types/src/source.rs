//! Source position and stack frame types for JavaScript error tracking.
//!
//! The object model never parses source, so these are only ever produced by
//! the embedding layer and rendered into an error's `stack` text.

use std::fmt;

/// Represents a position in source code.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition {
///     line: 10,
///     column: 5,
///     offset: 150,
/// };
///
/// assert_eq!(pos.line, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
    /// Byte offset from the start of the source file
    pub offset: usize,
}

/// Represents a single frame in a JavaScript call stack.
///
/// # Examples
///
/// ```
/// use core_types::StackFrame;
///
/// let frame = StackFrame {
///     function_name: Some("myFunction".to_string()),
///     source_url: Some("main.js".to_string()),
///     line: 25,
///     column: 10,
/// };
///
/// assert_eq!(frame.to_string(), "\tat myFunction (main.js:25:10)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Name of the function, or None for anonymous functions
    pub function_name: Option<String>,
    /// URL or file path of the source, or None if not available
    pub source_url: Option<String>,
    /// Line number where the call occurred
    pub line: u32,
    /// Column number where the call occurred
    pub column: u32,
}

impl StackFrame {
    /// Frame at a known position
    pub fn at(function_name: Option<&str>, source_url: Option<&str>, position: &SourcePosition) -> Self {
        StackFrame {
            function_name: function_name.map(str::to_string),
            source_url: source_url.map(str::to_string),
            line: position.line,
            column: position.column,
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\tat {} ({}:{}:{})",
            self.function_name.as_deref().unwrap_or("<anonymous>"),
            self.source_url.as_deref().unwrap_or("<unknown>"),
            self.line,
            self.column
        )
    }
}
