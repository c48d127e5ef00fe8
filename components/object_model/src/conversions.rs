//! Type conversion operations (ES5 §9) and primitive property access (§8.7).
//!
//! The conversions that can reach user code (`valueOf`, `toString`, getters)
//! take the realm and return [`JsResult`]; the `primitive_*` variants are
//! total functions over primitives.

use core_types::number::{self, number_to_string, string_to_number};
use core_types::{JsString, PropertyKey};

use crate::exception::{type_error, JsResult};
use crate::object::{reject, JsObject, ObjectKind};
use crate::realm::Realm;
use crate::value::Value;

/// Preferred type for [`to_primitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// Try `valueOf` first
    Number,
    /// Try `toString` first
    String,
}

/// [[DefaultValue]] (ES5 8.12.8)
pub fn default_value(realm: &Realm, obj: &JsObject, hint: Option<Hint>) -> JsResult<Value> {
    let hint = hint.unwrap_or_else(|| match obj.borrow().kind {
        ObjectKind::Date(_) => Hint::String,
        _ => Hint::Number,
    });
    let order = match hint {
        Hint::String => ["toString", "valueOf"],
        Hint::Number => ["valueOf", "toString"],
    };
    for name in order {
        let method = obj.get(realm, &PropertyKey::from(name))?;
        if method.is_callable() {
            let result = realm.call(&method, Value::Object(obj.clone()), &[])?;
            if result.is_primitive() {
                return Ok(result);
            }
        }
    }
    type_error(format!("Cannot convert {:?} to primitive value", obj))
}

/// ToPrimitive (ES5 9.1)
pub fn to_primitive(realm: &Realm, value: &Value, hint: Option<Hint>) -> JsResult<Value> {
    match value {
        Value::Object(obj) => default_value(realm, obj, hint),
        other => Ok(other.clone()),
    }
}

/// ToNumber of a primitive; objects give NaN
pub fn primitive_to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s.as_units()),
        Value::Object(_) => f64::NAN,
    }
}

/// ToNumber (ES5 9.3)
pub fn to_number(realm: &Realm, value: &Value) -> JsResult<f64> {
    match value {
        Value::Object(_) => Ok(primitive_to_number(&to_primitive(realm, value, Some(Hint::Number))?)),
        other => Ok(primitive_to_number(other)),
    }
}

/// ToInteger (ES5 9.4)
pub fn to_integer(realm: &Realm, value: &Value) -> JsResult<f64> {
    Ok(number::to_integer(to_number(realm, value)?))
}

/// ToInt32 (ES5 9.5)
pub fn to_int32(realm: &Realm, value: &Value) -> JsResult<i32> {
    Ok(number::to_int32(to_number(realm, value)?))
}

/// ToUint32 (ES5 9.6)
pub fn to_uint32(realm: &Realm, value: &Value) -> JsResult<u32> {
    Ok(number::to_uint32(to_number(realm, value)?))
}

/// ToUint16 (ES5 9.7)
pub fn to_uint16(realm: &Realm, value: &Value) -> JsResult<u16> {
    Ok(number::to_uint16(to_number(realm, value)?))
}

/// ToString of a primitive; objects give `"[object Object]"`
pub fn primitive_to_string(value: &Value) -> JsString {
    match value {
        Value::Undefined => JsString::from("undefined"),
        Value::Null => JsString::from("null"),
        Value::Boolean(true) => JsString::from("true"),
        Value::Boolean(false) => JsString::from("false"),
        Value::Number(n) => JsString::from(number_to_string(*n)),
        Value::String(s) => s.clone(),
        Value::Object(_) => JsString::from("[object Object]"),
    }
}

/// ToString (ES5 9.8)
pub fn to_string(realm: &Realm, value: &Value) -> JsResult<JsString> {
    match value {
        Value::Object(_) => Ok(primitive_to_string(&to_primitive(realm, value, Some(Hint::String))?)),
        other => Ok(primitive_to_string(other)),
    }
}

/// ToObject (ES5 9.9)
pub fn to_object(realm: &Realm, value: &Value) -> JsResult<JsObject> {
    match value {
        Value::Undefined | Value::Null => type_error(format!("Cannot convert {:?} to object", value)),
        Value::Boolean(b) => Ok(realm.new_boolean_object(*b)),
        Value::Number(n) => Ok(realm.new_number_object(*n)),
        Value::String(s) => Ok(realm.new_string_object(s.clone())),
        Value::Object(obj) => Ok(obj.clone()),
    }
}

/// The property key a computed member access `base[value]` uses
pub fn to_property_key(realm: &Realm, value: &Value) -> JsResult<PropertyKey> {
    match value {
        Value::Number(n) => Ok(PropertyKey::from_number(*n)),
        Value::String(s) => Ok(PropertyKey::from_js_string(s.clone())),
        other => Ok(PropertyKey::from_js_string(to_string(realm, other)?)),
    }
}

/// CheckObjectCoercible (ES5 9.10)
pub fn check_object_coercible(value: &Value, what: &str) -> JsResult<()> {
    if value.is_nullish() {
        return type_error(format!("{} called on null or undefined", what));
    }
    Ok(())
}

/// Read `base[key]` where `base` may be a primitive (ES5 8.7.1). Primitive
/// reads go through the wrapper prototype with the primitive itself as the
/// getter receiver, without allocating a wrapper.
pub fn get_value(realm: &Realm, base: &Value, key: &PropertyKey) -> JsResult<Value> {
    match base {
        Value::Object(obj) => obj.get(realm, key),
        Value::Undefined | Value::Null => type_error(format!("Cannot read property '{}' of {:?}", key, base)),
        Value::String(s) => {
            if key.is("length") {
                return Ok(Value::from(s.len()));
            }
            if let Some(unit) = key.as_index().and_then(|index| s.unit_at(index as usize)) {
                return Ok(Value::String(JsString::from_units(vec![unit])));
            }
            realm.intrinsics().string_prototype.get_with_receiver(realm, key, base)
        }
        Value::Number(_) => realm.intrinsics().number_prototype.get_with_receiver(realm, key, base),
        Value::Boolean(_) => realm.intrinsics().boolean_prototype.get_with_receiver(realm, key, base),
    }
}

/// Assign `base[key] = value` where `base` may be a primitive (ES5 8.7.2).
/// Assignments to primitives never create properties; they only reach
/// inherited setters.
pub fn put_value(realm: &Realm, base: &Value, key: PropertyKey, value: Value, strict: bool) -> JsResult<()> {
    let wrapper = match base {
        Value::Object(obj) => return obj.put(realm, key, value, strict),
        Value::Undefined | Value::Null => {
            return type_error(format!("Cannot set property '{}' of {:?}", key, base));
        }
        primitive => to_object(realm, primitive)?,
    };
    if !wrapper.can_put(realm, &key) {
        reject(strict, || format!("Cannot assign to read only property '{}' of {:?}", key, base))?;
        return Ok(());
    }
    if let Some(own) = wrapper.get_own_property(&key) {
        if own.is_data_descriptor() {
            reject(strict, || format!("Cannot create property '{}' on {:?}", key, base))?;
            return Ok(());
        }
    }
    match wrapper.get_property(realm, &key) {
        Some(desc) if desc.is_accessor_descriptor() => {
            if let Some(setter) = desc.set.filter(Value::is_callable) {
                realm.call(&setter, base.clone(), &[value])?;
            }
            Ok(())
        }
        _ => {
            reject(strict, || format!("Cannot create property '{}' on {:?}", key, base))?;
            Ok(())
        }
    }
}
