//! Function constructor and Function.prototype methods

use core_types::{ErrorKind, JsError, PropertyKey};

use super::{arg, constructor, length_of, method};
use crate::exception::{type_error, JsResult};
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::value::Value;

/// `new Function(...)` needs a compiler, which this layer does not have.
fn dynamic_function(_realm: &Realm, _this: &Value, _args: &[Value]) -> JsResult<Value> {
    Err(JsError::new(ErrorKind::EvalError, "Code generation from strings is not available").into())
}

/// The elements of an array-like, as `apply` spreads them
pub(crate) fn list_from_array_like(realm: &Realm, value: &Value) -> JsResult<Vec<Value>> {
    let obj = match value {
        Value::Undefined | Value::Null => return Ok(Vec::new()),
        Value::Object(obj) => obj,
        other => return type_error(format!("CreateListFromArrayLike called on non-object {:?}", other)),
    };
    let len = length_of(realm, obj)?;
    let mut list = Vec::with_capacity(len.min(1 << 16) as usize);
    for index in 0..len {
        list.push(obj.get(realm, &PropertyKey::Index(index))?);
    }
    Ok(list)
}

/// Function.prototype methods
pub struct FunctionPrototype;

impl FunctionPrototype {
    /// Function.prototype.toString()
    pub fn to_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let Some(function) = this.as_object().filter(|obj| obj.is_callable()) else {
            return type_error("Function.prototype.toString requires that 'this' be a Function");
        };
        let name = match function.get(realm, &PropertyKey::from("name"))? {
            Value::String(name) => name.to_rust_string(),
            _ => String::new(),
        };
        Ok(Value::from(format!("function {}() {{ [native code] }}", name)))
    }

    /// Function.prototype.call(thisArg, ...args)
    pub fn call(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        if !this.is_callable() {
            return type_error("Function.prototype.call called on a non-function");
        }
        let rest = args.get(1..).unwrap_or(&[]);
        realm.call(this, arg(args, 0), rest)
    }

    /// Function.prototype.apply(thisArg, argArray)
    pub fn apply(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        if !this.is_callable() {
            return type_error("Function.prototype.apply called on a non-function");
        }
        let list = list_from_array_like(realm, &arg(args, 1))?;
        realm.call(this, arg(args, 0), &list)
    }

    /// Function.prototype.bind(thisArg, ...args)
    pub fn bind(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let Some(target) = this.as_object().filter(|obj| obj.is_callable()) else {
            return type_error("Bind must be called on a function");
        };
        let bound_args = args.get(1..).unwrap_or(&[]).to_vec();
        Ok(Value::Object(realm.new_bound_function(target, arg(args, 0), bound_args)?))
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().function_prototype;
    proto.insert("length", Value::from(0), PropertyFlags::CONSTANT);
    proto.insert("name", Value::from(""), PropertyFlags::CONSTANT);
    constructor(realm, "Function", 1, dynamic_function, dynamic_function, proto);

    method(realm, proto, "toString", 0, FunctionPrototype::to_string);
    method(realm, proto, "call", 1, FunctionPrototype::call);
    method(realm, proto, "apply", 2, FunctionPrototype::apply);
    method(realm, proto, "bind", 1, FunctionPrototype::bind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::to_number;

    fn summing(realm: &Realm) -> Value {
        Value::Object(realm.new_host_function("sum", 2, |realm, this, args| {
            let mut total = match this {
                Value::Number(n) => *n,
                _ => 0.0,
            };
            for value in args {
                total += to_number(realm, value)?;
            }
            Ok(Value::from(total))
        }))
    }

    #[test]
    fn test_call_and_apply() {
        let realm = Realm::default();
        let sum = summing(&realm);
        let result = realm.invoke(&sum, "call", &[Value::from(1.0), Value::from(2.0), Value::from(3.0)]).unwrap();
        assert_eq!(result, Value::from(6.0));
        let list = Value::Object(realm.new_array(vec![Value::from(4.0), Value::from(5.0)]));
        let result = realm.invoke(&sum, "apply", &[Value::from(10.0), list]).unwrap();
        assert_eq!(result, Value::from(19.0));
        assert!(realm.invoke(&sum, "apply", &[Value::Null, Value::from(1.0)]).is_err());
    }

    #[test]
    fn test_bind_prepends_arguments() {
        let realm = Realm::default();
        let sum = summing(&realm);
        let bound = realm.invoke(&sum, "bind", &[Value::from(100.0), Value::from(1.0)]).unwrap();
        let bound_obj = bound.as_object().unwrap();
        assert_eq!(realm.get(bound_obj, "length").unwrap(), Value::from(1));
        assert_eq!(realm.call(&bound, Value::Undefined, &[Value::from(2.0)]).unwrap(), Value::from(103.0));
        let err = realm.get(bound_obj, "caller").unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn test_function_constructor_unavailable() {
        let realm = Realm::default();
        let ctor = realm.global_value("Function").unwrap();
        let err = realm.construct(&ctor, &[Value::from("return 1")]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::EvalError));
    }

    #[test]
    fn test_prototype_shape() {
        let realm = Realm::default();
        let proto = Value::Object(realm.intrinsics().function_prototype.clone());
        assert_eq!(realm.call(&proto, Value::Undefined, &[]).unwrap(), Value::Undefined);
        let text = realm.invoke(&summing(&realm), "toString", &[]).unwrap();
        assert_eq!(text, Value::from("function sum() { [native code] }"));
        assert_eq!(realm.get(proto.as_object().unwrap(), "name").unwrap(), Value::from(""));
    }
}
