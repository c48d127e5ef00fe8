//! Error constructors and Error.prototype (ES5 15.11)

use core_types::{ErrorKind, JsString, PropertyKey};

use super::{arg, constructor, method};
use crate::conversions::to_string;
use crate::exception::{type_error, JsResult};
use crate::function::NativeFn;
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::value::Value;

fn construct_error(realm: &Realm, kind: ErrorKind, args: &[Value]) -> JsResult<Value> {
    let error = realm.create_error(kind, "");
    let message = arg(args, 0);
    if !message.is_undefined() {
        error.insert("message", Value::String(to_string(realm, &message)?), PropertyFlags::HIDDEN);
    }
    Ok(Value::Object(error))
}

macro_rules! native_errors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            fn $name(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
                construct_error(realm, ErrorKind::$kind, args)
            }
        )*

        /// `Error(message)` and `new Error(message)` behave the same for every kind
        const CONSTRUCTORS: [(ErrorKind, NativeFn); 7] = [$((ErrorKind::$kind, $name)),*];
    };
}

native_errors! {
    error => Error,
    type_error_ctor => TypeError,
    range_error => RangeError,
    syntax_error => SyntaxError,
    reference_error => ReferenceError,
    eval_error => EvalError,
    uri_error => URIError,
}

/// Error.prototype methods
pub struct ErrorPrototype;

impl ErrorPrototype {
    /// Error.prototype.toString()
    pub fn to_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let Some(obj) = this.as_object() else {
            return type_error("Error.prototype.toString called on non-object");
        };
        let name = match obj.get(realm, &PropertyKey::from("name"))? {
            Value::Undefined => JsString::from("Error"),
            other => to_string(realm, &other)?,
        };
        let message = match obj.get(realm, &PropertyKey::from("message"))? {
            Value::Undefined => JsString::empty(),
            other => to_string(realm, &other)?,
        };
        if name.is_empty() {
            return Ok(Value::String(message));
        }
        if message.is_empty() {
            return Ok(Value::String(name));
        }
        Ok(Value::String(name.concat(&JsString::from(": ")).concat(&message)))
    }
}

pub(crate) fn install(realm: &Realm) {
    for (kind, ctor) in CONSTRUCTORS {
        let proto = realm.intrinsics().error_prototype(kind);
        proto.insert("name", Value::from(kind.name()), PropertyFlags::HIDDEN);
        proto.insert("message", Value::from(""), PropertyFlags::HIDDEN);
        constructor(realm, kind.name(), 1, ctor, ctor, proto);
    }
    let root = realm.intrinsics().error_prototype(ErrorKind::Error);
    method(realm, root, "toString", 0, ErrorPrototype::to_string);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::Exception;
    use core_types::{JsError, SourcePosition, StackFrame};

    #[test]
    fn test_constructors_link_prototypes() {
        let realm = Realm::default();
        for kind in ErrorKind::ALL {
            let ctor = realm.global_value(kind.name()).unwrap();
            let error = realm.call(&ctor, Value::Undefined, &[Value::from("boom")]).unwrap();
            let error = error.as_object().unwrap();
            assert!(error.prototype().unwrap().ptr_eq(realm.intrinsics().error_prototype(kind)));
            let text = ErrorPrototype::to_string(&realm, &Value::Object(error.clone()), &[]).unwrap();
            assert_eq!(text, Value::from(format!("{}: boom", kind.name())));
        }
    }

    #[test]
    fn test_to_string_edge_cases() {
        let realm = Realm::default();
        let ctor = realm.global_value("RangeError").unwrap();
        let bare = realm.construct(&ctor, &[]).unwrap();
        assert!(!bare.as_object().unwrap().has_own_property(&PropertyKey::from("message")));
        assert_eq!(ErrorPrototype::to_string(&realm, &bare, &[]).unwrap(), Value::from("RangeError"));

        let plain = realm.new_object();
        plain.insert("name", Value::from(""), PropertyFlags::DEFAULT);
        plain.insert("message", Value::from("only message"), PropertyFlags::DEFAULT);
        let text = ErrorPrototype::to_string(&realm, &Value::Object(plain), &[]).unwrap();
        assert_eq!(text, Value::from("only message"));
        assert!(ErrorPrototype::to_string(&realm, &Value::from(1.0), &[]).is_err());
    }

    #[test]
    fn test_engine_error_materialises_with_stack() {
        let realm = Realm::default();
        let position = SourcePosition { line: 3, column: 7, offset: 20 };
        let frame = StackFrame::at(Some("f"), Some("a.js"), &position);
        let error: Exception = JsError::type_error("x is not a function").with_stack(vec![frame]).into();
        let value = error.to_value(&realm);
        let obj = value.as_object().unwrap();
        assert_eq!(realm.get(obj, "message").unwrap(), Value::from("x is not a function"));
        let stack = realm.get(obj, "stack").unwrap();
        assert_eq!(stack, Value::from("TypeError: x is not a function\n\tat f (a.js:3:7)"));
    }
}
