//! Runtime object model for an ECMAScript 5.1 engine.
//!
//! This crate provides the value representation, objects with their
//! internal methods, the specialised object kinds and the builtin library,
//! all scoped to a [`Realm`]:
//! - [`Value`] - The six language types
//! - [`JsObject`] - Shared objects with [[Get]], [[Put]], [[DefineOwnProperty]], [[Delete]]
//! - [`PropertyMap`](property::PropertyMap) - Shape-shared property tables
//! - [`ArrayData`](array_data::ArrayData) - Element storage with backend promotion
//! - [`conversions`] - ToPrimitive, ToNumber, ToString, ToObject
//! - [`Realm`] - Builtin prototypes, constructors and the global object
//!
//! Parsing, compilation and scope management live in other crates; they
//! drive this one through the internal methods, the conversions and
//! [`Realm::call`].
//!
//! # Examples
//!
//! ```
//! use object_model::{PropertyKey, Realm, Value};
//!
//! let realm = Realm::default();
//! let array = realm.new_array(vec![Value::from(1.0), Value::from(2.0)]);
//! array.put(&realm, PropertyKey::Index(4), Value::from("x"), true).unwrap();
//! assert_eq!(realm.get(&array, "length").unwrap(), Value::from(5));
//!
//! let json = realm.global_value("JSON").unwrap();
//! let text = realm.invoke(&json, "stringify", &[Value::Object(array)]).unwrap();
//! assert_eq!(text, Value::from("[1,2,null,null,\"x\"]"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod array_data;
pub mod builtins;
pub mod conversions;
pub mod date_math;
pub mod exception;
pub mod function;
pub mod object;
pub mod property;
pub mod realm;
pub mod regexp_engine;
pub mod value;

pub use core_types::{ErrorKind, JsError, JsString, PropertyKey};
pub use conversions::Hint;
pub use exception::{Exception, JsResult};
pub use function::{FunctionData, NativeFn};
pub use object::{Binding, JsObject, ObjectKind, TypedArrayKind};
pub use property::{PropertyDescriptor, PropertyFlags};
pub use realm::{ConfigError, Realm, RealmConfig, TimeZone};
pub use value::Value;
