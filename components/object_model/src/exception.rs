//! Exceptions raised by object-model operations.
//!
//! An operation either fails with an engine error (a [`JsError`] carrying
//! one of the native error kinds) or propagates an arbitrary script value
//! that user code threw, e.g. from inside a getter or a `valueOf` override.

use core_types::{ErrorKind, JsError};
use thiserror::Error;

use crate::object::ObjectKind;
use crate::realm::Realm;
use crate::value::Value;

/// A pending JavaScript exception.
#[derive(Debug, Clone, Error)]
pub enum Exception {
    /// Raised by an engine algorithm
    #[error(transparent)]
    Error(#[from] JsError),
    /// A script-level throw of an arbitrary value
    #[error("Uncaught {0:?}")]
    Value(Value),
}

/// Result type for every fallible object-model operation
pub type JsResult<T> = Result<T, Exception>;

impl Exception {
    /// The error kind, when the thrown value is an engine error or an Error object
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Exception::Error(error) => Some(error.kind),
            Exception::Value(Value::Object(obj)) => match &obj.borrow().kind {
                ObjectKind::Error(kind) => Some(*kind),
                _ => None,
            },
            Exception::Value(_) => None,
        }
    }

    /// The value a script `catch` clause would observe
    pub fn to_value(&self, realm: &Realm) -> Value {
        match self {
            Exception::Error(error) => Value::Object(realm.create_error_from(error)),
            Exception::Value(value) => value.clone(),
        }
    }

    /// Whether this is an engine TypeError or a thrown TypeError object
    pub fn is_type_error(&self) -> bool {
        self.kind() == Some(ErrorKind::TypeError)
    }
}

impl From<Value> for Exception {
    fn from(value: Value) -> Self {
        Exception::Value(value)
    }
}

/// Fail with a TypeError
pub fn type_error<T>(message: impl Into<String>) -> JsResult<T> {
    Err(JsError::type_error(message).into())
}

/// Fail with a RangeError
pub fn range_error<T>(message: impl Into<String>) -> JsResult<T> {
    Err(JsError::range_error(message).into())
}

/// Fail with a SyntaxError
pub fn syntax_error<T>(message: impl Into<String>) -> JsResult<T> {
    Err(JsError::syntax_error(message).into())
}

/// Fail with a URIError
pub fn uri_error<T>(message: impl Into<String>) -> JsResult<T> {
    Err(JsError::new(ErrorKind::URIError, message).into())
}
