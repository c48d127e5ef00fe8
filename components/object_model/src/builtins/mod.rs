//! The ECMAScript 5.1 standard library.
//!
//! Each module holds the prototype methods of one builtin as associated
//! functions on a unit struct (`ArrayPrototype::push`, ...) with the
//! [`NativeFn`] signature, plus an `install` function that wires them into
//! a realm. [`install`] runs once, from [`Realm::new`].

pub mod array;
pub mod boolean;
pub mod date;
pub mod error;
pub mod function;
pub mod global;
pub mod json;
pub mod math;
pub mod number;
pub mod object;
pub mod regexp;
pub mod string;
pub mod typed_array;

pub use array::{ArrayConstructor, ArrayPrototype};
pub use boolean::BooleanPrototype;
pub use date::{DateConstructor, DatePrototype};
pub use error::ErrorPrototype;
pub use function::FunctionPrototype;
pub use global::GlobalFunctions;
pub use json::JsonObject;
pub use math::MathObject;
pub use number::NumberPrototype;
pub use object::{ObjectConstructor, ObjectPrototype};
pub use regexp::{RegExpConstructor, RegExpPrototype};
pub use string::{StringConstructor, StringPrototype};
pub use typed_array::{ArrayBufferPrototype, DataViewPrototype, TypedArrayPrototype};

use core_types::PropertyKey;

use crate::conversions::{to_integer, to_object, to_uint32};
use crate::exception::JsResult;
use crate::function::NativeFn;
use crate::object::JsObject;
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::value::Value;

/// Populate the realm's prototypes and global object
pub(crate) fn install(realm: &Realm) {
    object::install(realm);
    function::install(realm);
    array::install(realm);
    string::install(realm);
    boolean::install(realm);
    number::install(realm);
    date::install(realm);
    regexp::install(realm);
    error::install(realm);
    json::install(realm);
    math::install(realm);
    typed_array::install(realm);
    global::install(realm);
}

/// Argument `index`, or undefined
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Install a builtin method the way ES5 does: writable, configurable, not enumerable
pub(crate) fn method(realm: &Realm, target: &JsObject, name: &str, length: u32, f: NativeFn) {
    let function = realm.new_native_function(name, length, f);
    target.insert(name, Value::Object(function), PropertyFlags::HIDDEN);
}

/// Install a read-only accessor
pub(crate) fn getter(realm: &Realm, target: &JsObject, name: &str, f: NativeFn) {
    let function = realm.new_native_function(&format!("get {}", name), 0, f);
    target.insert_accessor(name, Value::Object(function), Value::Undefined, PropertyFlags::accessor(false, true));
}

/// Create a constructor for `prototype` and publish it on the global object
pub(crate) fn constructor(
    realm: &Realm,
    name: &str,
    length: u32,
    call: NativeFn,
    construct: NativeFn,
    prototype: &JsObject,
) -> JsObject {
    let ctor = realm.new_native_constructor(name, length, call, construct, prototype);
    realm.global().insert(name, Value::Object(ctor.clone()), PropertyFlags::HIDDEN);
    ctor
}

/// ToUint32(obj.length), as the generic Array methods read it
pub(crate) fn length_of(realm: &Realm, obj: &JsObject) -> JsResult<u32> {
    to_uint32(realm, &obj.get(realm, &PropertyKey::from("length"))?)
}

/// ToObject(this)
pub(crate) fn this_object(realm: &Realm, this: &Value) -> JsResult<JsObject> {
    to_object(realm, this)
}

/// A relative position argument clamped into `0..=len`: negative values
/// count from the end, undefined gives `default`
pub(crate) fn relative_index(realm: &Realm, value: &Value, len: f64, default: f64) -> JsResult<f64> {
    if value.is_undefined() {
        return Ok(default);
    }
    let relative = to_integer(realm, value)?;
    Ok(if relative < 0.0 {
        (len + relative).max(0.0)
    } else {
        relative.min(len)
    })
}

/// A callback argument that must be callable
pub(crate) fn callable_arg(args: &[Value], index: usize, what: &str) -> JsResult<Value> {
    let value = arg(args, index);
    if !value.is_callable() {
        return crate::exception::type_error(format!("{:?} is not a function ({})", value, what));
    }
    Ok(value)
}
