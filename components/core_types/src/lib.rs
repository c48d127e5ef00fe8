//! Core JavaScript primitive types and error handling.
//!
//! This crate provides the foundational, heap-free types of the runtime
//! object model: strings, property keys, number conversions, error kinds
//! and source location tracking.
//!
//! # Overview
//!
//! - [`JsString`] - Immutable UTF-16 strings with rope concatenation
//! - [`PropertyKey`] - Canonicalised property names
//! - [`number`] - ToNumber / ToString / ToInt32 and friends
//! - [`JsError`] - Engine-raised errors with stack traces
//! - [`ErrorKind`] - Types of JavaScript errors
//! - [`SourcePosition`] - Source code location
//! - [`StackFrame`] - Call stack frame information
//!
//! # Examples
//!
//! ```
//! use core_types::{number, ErrorKind, JsError, JsString, PropertyKey};
//!
//! let key = PropertyKey::from(JsString::from("10"));
//! assert_eq!(key.as_index(), Some(10));
//!
//! assert_eq!(number::number_to_string(0.5), "0.5");
//!
//! let error = JsError::type_error("undefined is not a function");
//! assert_eq!(error.kind, ErrorKind::TypeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod key;
pub mod number;
mod source;
mod string;

pub use error::{ErrorKind, JsError};
pub use key::{array_index, number_as_index, PropertyKey, MAX_ARRAY_INDEX};
pub use source::{SourcePosition, StackFrame};
pub use string::JsString;
