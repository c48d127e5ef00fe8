//! Boolean constructor and Boolean.prototype methods

use super::{arg, constructor, method};
use crate::exception::{type_error, JsResult};
use crate::object::ObjectKind;
use crate::realm::Realm;
use crate::value::Value;

fn this_boolean(this: &Value, what: &str) -> JsResult<bool> {
    match this {
        Value::Boolean(b) => Ok(*b),
        Value::Object(obj) => match obj.borrow().kind {
            ObjectKind::Boolean(b) => Ok(b),
            _ => type_error(format!("{} requires that 'this' be a Boolean", what)),
        },
        _ => type_error(format!("{} requires that 'this' be a Boolean", what)),
    }
}

fn call(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
    Ok(Value::Boolean(arg(args, 0).to_boolean()))
}

fn construct(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
    Ok(Value::Object(realm.new_boolean_object(arg(args, 0).to_boolean())))
}

/// Boolean.prototype methods
pub struct BooleanPrototype;

impl BooleanPrototype {
    /// Boolean.prototype.toString()
    pub fn to_string(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let b = this_boolean(this, "Boolean.prototype.toString")?;
        Ok(Value::from(if b { "true" } else { "false" }))
    }

    /// Boolean.prototype.valueOf()
    pub fn value_of(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::Boolean(this_boolean(this, "Boolean.prototype.valueOf")?))
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().boolean_prototype;
    constructor(realm, "Boolean", 1, call, construct, proto);
    method(realm, proto, "toString", 0, BooleanPrototype::to_string);
    method(realm, proto, "valueOf", 0, BooleanPrototype::value_of);
}
