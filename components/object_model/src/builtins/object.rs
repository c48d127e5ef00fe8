//! Object constructor and Object.prototype methods

use core_types::PropertyKey;

use super::{arg, constructor, method, this_object};
use crate::conversions::{to_object, to_property_key};
use crate::exception::{type_error, JsResult};
use crate::object::JsObject;
use crate::property::{PropertyDescriptor, PropertyFlags};
use crate::realm::Realm;
use crate::value::Value;

fn require_object(value: &Value, what: &str) -> JsResult<JsObject> {
    match value {
        Value::Object(obj) => Ok(obj.clone()),
        other => type_error(format!("Object.{} called on non-object {:?}", what, other)),
    }
}

/// ToPropertyDescriptor (ES5 8.10.5)
pub fn to_property_descriptor(realm: &Realm, value: &Value) -> JsResult<PropertyDescriptor> {
    let obj = match value {
        Value::Object(obj) => obj,
        other => return type_error(format!("Property description must be an object: {:?}", other)),
    };
    let field = |name: &str| -> JsResult<Option<Value>> {
        let key = PropertyKey::from(name);
        if obj.has_property(realm, &key) {
            Ok(Some(obj.get(realm, &key)?))
        } else {
            Ok(None)
        }
    };
    let desc = PropertyDescriptor {
        enumerable: field("enumerable")?.map(|v| v.to_boolean()),
        configurable: field("configurable")?.map(|v| v.to_boolean()),
        value: field("value")?,
        writable: field("writable")?.map(|v| v.to_boolean()),
        get: field("get")?,
        set: field("set")?,
    };
    for accessor in [&desc.get, &desc.set].into_iter().flatten() {
        if !accessor.is_undefined() && !accessor.is_callable() {
            return type_error(format!("Getter or setter must be a function: {:?}", accessor));
        }
    }
    if desc.is_accessor_descriptor() && desc.is_data_descriptor() {
        return type_error("Invalid property descriptor. Cannot both specify accessors and a value or writable attribute");
    }
    Ok(desc)
}

/// FromPropertyDescriptor (ES5 8.10.4)
pub fn from_property_descriptor(realm: &Realm, desc: &PropertyDescriptor) -> JsObject {
    let obj = realm.new_object();
    if desc.is_accessor_descriptor() {
        obj.insert("get", desc.get.clone().unwrap_or_default(), PropertyFlags::DEFAULT);
        obj.insert("set", desc.set.clone().unwrap_or_default(), PropertyFlags::DEFAULT);
    } else {
        obj.insert("value", desc.value.clone().unwrap_or_default(), PropertyFlags::DEFAULT);
        obj.insert("writable", Value::Boolean(desc.writable()), PropertyFlags::DEFAULT);
    }
    obj.insert("enumerable", Value::Boolean(desc.enumerable()), PropertyFlags::DEFAULT);
    obj.insert("configurable", Value::Boolean(desc.configurable()), PropertyFlags::DEFAULT);
    obj
}

fn key_names(realm: &Realm, keys: Vec<PropertyKey>) -> Value {
    let names = keys.iter().map(|key| Value::String(key.to_js_string())).collect();
    Value::Object(realm.new_array(names))
}

/// The Object constructor's own methods
pub struct ObjectConstructor;

impl ObjectConstructor {
    /// Object(value) / new Object(value)
    pub fn call(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        match arg(args, 0) {
            Value::Undefined | Value::Null => Ok(Value::Object(realm.new_object())),
            other => Ok(Value::Object(to_object(realm, &other)?)),
        }
    }

    /// Object.getPrototypeOf(O)
    pub fn get_prototype_of(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "getPrototypeOf")?;
        Ok(Value::from(obj.prototype()))
    }

    /// Object.setPrototypeOf(O, proto)
    pub fn set_prototype_of(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let target = arg(args, 0);
        if target.is_nullish() {
            return type_error("Object.setPrototypeOf called on null or undefined");
        }
        let proto = match arg(args, 1) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            other => return type_error(format!("Object prototype may only be an Object or null: {:?}", other)),
        };
        if let Value::Object(obj) = &target {
            if !obj.set_prototype_of(realm, proto) {
                return type_error(format!("Cannot set prototype of {:?}", obj));
            }
        }
        Ok(target)
    }

    /// Object.getOwnPropertyDescriptor(O, P)
    pub fn get_own_property_descriptor(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "getOwnPropertyDescriptor")?;
        let key = to_property_key(realm, &arg(args, 1))?;
        Ok(match obj.get_own_property(&key) {
            Some(desc) => Value::Object(from_property_descriptor(realm, &desc)),
            None => Value::Undefined,
        })
    }

    /// Object.getOwnPropertyNames(O)
    pub fn get_own_property_names(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "getOwnPropertyNames")?;
        Ok(key_names(realm, obj.own_keys()))
    }

    /// Object.keys(O)
    pub fn keys(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "keys")?;
        Ok(key_names(realm, obj.own_enumerable_keys()))
    }

    /// Object.create(O, Properties)
    pub fn create(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let proto = match arg(args, 0) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            other => return type_error(format!("Object prototype may only be an Object or null: {:?}", other)),
        };
        let obj = realm.new_object_with_proto(proto);
        let properties = arg(args, 1);
        if !properties.is_undefined() {
            define_properties(realm, &obj, &properties)?;
        }
        Ok(Value::Object(obj))
    }

    /// Object.defineProperty(O, P, Attributes)
    pub fn define_property(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "defineProperty")?;
        let key = to_property_key(realm, &arg(args, 1))?;
        let desc = to_property_descriptor(realm, &arg(args, 2))?;
        obj.define_own_property(realm, key, desc, true)?;
        Ok(Value::Object(obj))
    }

    /// Object.defineProperties(O, Properties)
    pub fn define_properties(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "defineProperties")?;
        define_properties(realm, &obj, &arg(args, 1))?;
        Ok(Value::Object(obj))
    }

    /// Object.seal(O)
    pub fn seal(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "seal")?;
        obj.seal();
        Ok(Value::Object(obj))
    }

    /// Object.freeze(O)
    pub fn freeze(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "freeze")?;
        obj.freeze()?;
        Ok(Value::Object(obj))
    }

    /// Object.preventExtensions(O)
    pub fn prevent_extensions(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = require_object(&arg(args, 0), "preventExtensions")?;
        obj.prevent_extensions();
        Ok(Value::Object(obj))
    }

    /// Object.isSealed(O)
    pub fn is_sealed(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::Boolean(require_object(&arg(args, 0), "isSealed")?.is_sealed()))
    }

    /// Object.isFrozen(O)
    pub fn is_frozen(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::Boolean(require_object(&arg(args, 0), "isFrozen")?.is_frozen()))
    }

    /// Object.isExtensible(O)
    pub fn is_extensible(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::Boolean(require_object(&arg(args, 0), "isExtensible")?.is_extensible()))
    }
}

/// All descriptors are validated before any of them is applied.
fn define_properties(realm: &Realm, obj: &JsObject, properties: &Value) -> JsResult<()> {
    let props = to_object(realm, properties)?;
    let mut descriptors = Vec::new();
    for key in props.own_enumerable_keys() {
        let desc = to_property_descriptor(realm, &props.get(realm, &key)?)?;
        descriptors.push((key, desc));
    }
    for (key, desc) in descriptors {
        obj.define_own_property(realm, key, desc, true)?;
    }
    Ok(())
}

/// Object.prototype methods
pub struct ObjectPrototype;

impl ObjectPrototype {
    /// Object.prototype.toString()
    pub fn to_string(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let class = match this {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Object(obj) => obj.class_name(),
        };
        Ok(Value::from(format!("[object {}]", class)))
    }

    /// Object.prototype.toLocaleString()
    pub fn to_locale_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let to_string = obj.get(realm, &PropertyKey::from("toString"))?;
        if !to_string.is_callable() {
            return type_error("toString is not a function");
        }
        realm.call(&to_string, this.clone(), &[])
    }

    /// Object.prototype.valueOf()
    pub fn value_of(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::Object(this_object(realm, this)?))
    }

    /// Object.prototype.hasOwnProperty(V)
    pub fn has_own_property(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let key = to_property_key(realm, &arg(args, 0))?;
        let obj = this_object(realm, this)?;
        Ok(Value::Boolean(obj.has_own_property(&key)))
    }

    /// Object.prototype.isPrototypeOf(V)
    pub fn is_prototype_of(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let Value::Object(value) = arg(args, 0) else {
            return Ok(Value::Boolean(false));
        };
        let obj = this_object(realm, this)?;
        let mut cursor = value.prototype();
        let mut depth = 0;
        while let Some(proto) = cursor {
            if proto.ptr_eq(&obj) {
                return Ok(Value::Boolean(true));
            }
            depth += 1;
            if depth > realm.config().max_prototype_depth {
                break;
            }
            cursor = proto.prototype();
        }
        Ok(Value::Boolean(false))
    }

    /// Object.prototype.propertyIsEnumerable(V)
    pub fn property_is_enumerable(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let key = to_property_key(realm, &arg(args, 0))?;
        let obj = this_object(realm, this)?;
        Ok(Value::Boolean(obj.get_own_property(&key).map_or(false, |desc| desc.enumerable())))
    }

    /// get Object.prototype.__proto__
    pub fn get_proto(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(this_object(realm, this)?.prototype()))
    }

    /// set Object.prototype.__proto__
    pub fn set_proto(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        if this.is_nullish() {
            return type_error("Object.prototype.__proto__ called on null or undefined");
        }
        let proto = match arg(args, 0) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            _ => return Ok(Value::Undefined),
        };
        if let Value::Object(obj) = this {
            if !obj.set_prototype_of(realm, proto) {
                return type_error(format!("Cannot set prototype of {:?}", obj));
            }
        }
        Ok(Value::Undefined)
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().object_prototype;
    let ctor = constructor(realm, "Object", 1, ObjectConstructor::call, ObjectConstructor::call, proto);

    method(realm, &ctor, "getPrototypeOf", 1, ObjectConstructor::get_prototype_of);
    method(realm, &ctor, "setPrototypeOf", 2, ObjectConstructor::set_prototype_of);
    method(realm, &ctor, "getOwnPropertyDescriptor", 2, ObjectConstructor::get_own_property_descriptor);
    method(realm, &ctor, "getOwnPropertyNames", 1, ObjectConstructor::get_own_property_names);
    method(realm, &ctor, "keys", 1, ObjectConstructor::keys);
    method(realm, &ctor, "create", 2, ObjectConstructor::create);
    method(realm, &ctor, "defineProperty", 3, ObjectConstructor::define_property);
    method(realm, &ctor, "defineProperties", 2, ObjectConstructor::define_properties);
    method(realm, &ctor, "seal", 1, ObjectConstructor::seal);
    method(realm, &ctor, "freeze", 1, ObjectConstructor::freeze);
    method(realm, &ctor, "preventExtensions", 1, ObjectConstructor::prevent_extensions);
    method(realm, &ctor, "isSealed", 1, ObjectConstructor::is_sealed);
    method(realm, &ctor, "isFrozen", 1, ObjectConstructor::is_frozen);
    method(realm, &ctor, "isExtensible", 1, ObjectConstructor::is_extensible);

    method(realm, proto, "toString", 0, ObjectPrototype::to_string);
    method(realm, proto, "toLocaleString", 0, ObjectPrototype::to_locale_string);
    method(realm, proto, "valueOf", 0, ObjectPrototype::value_of);
    method(realm, proto, "hasOwnProperty", 1, ObjectPrototype::has_own_property);
    method(realm, proto, "isPrototypeOf", 1, ObjectPrototype::is_prototype_of);
    method(realm, proto, "propertyIsEnumerable", 1, ObjectPrototype::property_is_enumerable);

    let get = realm.new_native_function("get __proto__", 0, ObjectPrototype::get_proto);
    let set = realm.new_native_function("set __proto__", 1, ObjectPrototype::set_proto);
    proto.insert_accessor(
        "__proto__",
        Value::Object(get),
        Value::Object(set),
        PropertyFlags::accessor(false, true),
    );
}
