//! RegExp constructor and RegExp.prototype methods (ES5 15.10)

use std::rc::Rc;

use core_types::{JsString, PropertyKey};

use super::{arg, constructor, method};
use crate::conversions::{to_integer, to_string};
use crate::exception::{type_error, JsResult};
use crate::object::{JsObject, ObjectKind};
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::regexp_engine::{MatchResult, RegExpMatcher};
use crate::value::Value;

/// The compiled pattern of a RegExp object
pub(crate) fn matcher_of(value: &Value) -> Option<Rc<RegExpMatcher>> {
    let obj = value.as_object()?;
    let data = obj.borrow();
    match &data.kind {
        ObjectKind::RegExp(matcher) => Some(Rc::clone(matcher)),
        _ => None,
    }
}

fn this_regexp(this: &Value, what: &str) -> JsResult<(JsObject, Rc<RegExpMatcher>)> {
    match (this.as_object(), matcher_of(this)) {
        (Some(obj), Some(matcher)) => Ok((obj.clone(), matcher)),
        _ => type_error(format!("{} called on incompatible receiver {:?}", what, this)),
    }
}

fn set_last_index(realm: &Realm, obj: &JsObject, index: usize) -> JsResult<()> {
    obj.put(realm, PropertyKey::from("lastIndex"), Value::from(index), true)
}

/// The matching half of `exec`: honours and updates `lastIndex` for
/// global patterns, always searches from 0 otherwise.
pub(crate) fn exec_match(
    realm: &Realm,
    obj: &JsObject,
    matcher: &RegExpMatcher,
    input: &JsString,
) -> JsResult<Option<MatchResult>> {
    let last_index = to_integer(realm, &obj.get(realm, &PropertyKey::from("lastIndex"))?)?;
    let start = if matcher.global() { last_index } else { 0.0 };
    if start < 0.0 || start > input.len() as f64 {
        set_last_index(realm, obj, 0)?;
        return Ok(None);
    }
    match matcher.match_from(input.as_units(), start as usize) {
        None => {
            set_last_index(realm, obj, 0)?;
            Ok(None)
        }
        Some(found) => {
            if matcher.global() {
                set_last_index(realm, obj, found.end)?;
            }
            Ok(Some(found))
        }
    }
}

/// The array `exec` returns: the match, its captures, `index` and `input`
pub(crate) fn match_array(realm: &Realm, found: &MatchResult, input: &JsString) -> JsObject {
    let units = input.as_units();
    let mut values = Vec::with_capacity(found.captures.len() + 1);
    values.push(Value::String(input.substring(found.start, found.end)));
    for index in 1..=found.captures.len() {
        values.push(match found.capture(units, index) {
            Some(capture) => Value::String(JsString::from_slice(capture)),
            None => Value::Undefined,
        });
    }
    let array = realm.new_array(values);
    array.insert("index", Value::from(found.start), PropertyFlags::DEFAULT);
    array.insert("input", Value::String(input.clone()), PropertyFlags::DEFAULT);
    array
}

fn pattern_and_flags(realm: &Realm, args: &[Value]) -> JsResult<(JsString, JsString)> {
    let pattern = arg(args, 0);
    let flags = arg(args, 1);
    if let Some(matcher) = matcher_of(&pattern) {
        if !flags.is_undefined() {
            return type_error("Cannot supply flags when constructing one RegExp from another");
        }
        return Ok((matcher.source().clone(), JsString::from(matcher.flags_text())));
    }
    let pattern = match pattern {
        Value::Undefined => JsString::empty(),
        other => to_string(realm, &other)?,
    };
    let flags = match flags {
        Value::Undefined => JsString::empty(),
        other => to_string(realm, &other)?,
    };
    Ok((pattern, flags))
}

/// The RegExp constructor
pub struct RegExpConstructor;

impl RegExpConstructor {
    /// RegExp(pattern, flags): an existing RegExp without flags is returned as is
    pub fn call(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let pattern = arg(args, 0);
        if matcher_of(&pattern).is_some() && arg(args, 1).is_undefined() {
            return Ok(pattern);
        }
        RegExpConstructor::construct(realm, this, args)
    }

    /// new RegExp(pattern, flags)
    pub fn construct(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let (pattern, flags) = pattern_and_flags(realm, args)?;
        Ok(Value::Object(realm.new_regexp(&pattern, &flags)?))
    }
}

/// RegExp.prototype methods
pub struct RegExpPrototype;

impl RegExpPrototype {
    /// RegExp.prototype.exec(string)
    pub fn exec(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let (obj, matcher) = this_regexp(this, "RegExp.prototype.exec")?;
        let input = to_string(realm, &arg(args, 0))?;
        Ok(match exec_match(realm, &obj, &matcher, &input)? {
            Some(found) => Value::Object(match_array(realm, &found, &input)),
            None => Value::Null,
        })
    }

    /// RegExp.prototype.test(string)
    pub fn test(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let (obj, matcher) = this_regexp(this, "RegExp.prototype.test")?;
        let input = to_string(realm, &arg(args, 0))?;
        Ok(Value::Boolean(exec_match(realm, &obj, &matcher, &input)?.is_some()))
    }

    /// RegExp.prototype.toString()
    pub fn to_string(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, matcher) = this_regexp(this, "RegExp.prototype.toString")?;
        Ok(Value::from(format!("/{}/{}", matcher.source(), matcher.flags_text())))
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().regexp_prototype;
    constructor(realm, "RegExp", 2, RegExpConstructor::call, RegExpConstructor::construct, proto);

    method(realm, proto, "exec", 1, RegExpPrototype::exec);
    method(realm, proto, "test", 1, RegExpPrototype::test);
    method(realm, proto, "toString", 0, RegExpPrototype::to_string);
}
