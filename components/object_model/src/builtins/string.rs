//! String constructor and String.prototype methods (ES5 15.5)

use core_types::number::{trim_end_whitespace, trim_start_whitespace, trim_whitespace};
use core_types::{JsString, PropertyKey};

use super::regexp::{exec_match, match_array, matcher_of};
use super::{arg, constructor, method, relative_index};
use crate::conversions::{check_object_coercible, to_integer, to_number, to_string, to_uint16, to_uint32};
use crate::exception::{type_error, JsResult};
use crate::object::{JsObject, ObjectKind};
use crate::realm::Realm;
use crate::regexp_engine::{expand_replacement, MatchResult, RegExpMatcher};
use crate::value::Value;

/// ToString(CheckObjectCoercible(this))
fn this_string(realm: &Realm, this: &Value, what: &str) -> JsResult<JsString> {
    check_object_coercible(this, what)?;
    to_string(realm, this)
}

/// `value` as a RegExp object, compiling it as a pattern when it is not one
fn coerce_regexp(realm: &Realm, value: &Value) -> JsResult<(JsObject, std::rc::Rc<RegExpMatcher>)> {
    if let (Some(obj), Some(matcher)) = (value.as_object(), matcher_of(value)) {
        return Ok((obj.clone(), matcher));
    }
    let pattern = match value {
        Value::Undefined => JsString::empty(),
        other => to_string(realm, other)?,
    };
    let obj = realm.new_regexp(&pattern, &JsString::empty())?;
    let value = Value::Object(obj.clone());
    match matcher_of(&value) {
        Some(matcher) => Ok((obj, matcher)),
        None => type_error("RegExp construction produced a non-RegExp"),
    }
}

/// Every match of a global pattern, run through `exec` so that `lastIndex`
/// ends at 0; an empty match advances the search by one position.
fn global_matches(
    realm: &Realm,
    obj: &JsObject,
    matcher: &RegExpMatcher,
    input: &JsString,
) -> JsResult<Vec<MatchResult>> {
    let last_index = PropertyKey::from("lastIndex");
    obj.put(realm, last_index.clone(), Value::from(0), true)?;
    let mut matches = Vec::new();
    let mut previous = 0;
    while let Some(found) = exec_match(realm, obj, matcher, input)? {
        let this_index = found.end;
        if this_index == previous {
            previous = this_index + 1;
            obj.put(realm, last_index.clone(), Value::from(previous), true)?;
        } else {
            previous = this_index;
        }
        matches.push(found);
    }
    Ok(matches)
}

fn change_case(units: &[u16], upper: bool) -> JsString {
    let mut out = Vec::with_capacity(units.len());
    let mut buf = [0u16; 2];
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) if upper => {
                for mapped in c.to_uppercase() {
                    out.extend_from_slice(mapped.encode_utf16(&mut buf));
                }
            }
            Ok(c) => {
                for mapped in c.to_lowercase() {
                    out.extend_from_slice(mapped.encode_utf16(&mut buf));
                }
            }
            Err(lone) => out.push(lone.unpaired_surrogate()),
        }
    }
    JsString::from_units(out)
}

/// The String constructor's own methods
pub struct StringConstructor;

impl StringConstructor {
    /// String(value)
    pub fn call(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        match args.first() {
            None => Ok(Value::String(JsString::empty())),
            Some(value) => Ok(Value::String(to_string(realm, value)?)),
        }
    }

    /// new String(value)
    pub fn construct(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = match args.first() {
            None => JsString::empty(),
            Some(value) => to_string(realm, value)?,
        };
        Ok(Value::Object(realm.new_string_object(s)))
    }

    /// String.fromCharCode(...codes)
    pub fn from_char_code(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let units = args
            .iter()
            .map(|code| to_uint16(realm, code))
            .collect::<JsResult<Vec<u16>>>()?;
        Ok(Value::String(JsString::from_units(units)))
    }
}

/// String.prototype methods
pub struct StringPrototype;

impl StringPrototype {
    /// String.prototype.toString() / valueOf()
    pub fn value_of(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        match this {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Object(obj) => match &obj.borrow().kind {
                ObjectKind::String(s) => Ok(Value::String(s.clone())),
                _ => type_error("String.prototype.valueOf requires that 'this' be a String"),
            },
            _ => type_error("String.prototype.valueOf requires that 'this' be a String"),
        }
    }

    /// String.prototype.charAt(pos)
    pub fn char_at(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.charAt")?;
        let pos = to_integer(realm, &arg(args, 0))?;
        if pos < 0.0 || pos >= s.len() as f64 {
            return Ok(Value::String(JsString::empty()));
        }
        Ok(Value::String(s.substring(pos as usize, pos as usize + 1)))
    }

    /// String.prototype.charCodeAt(pos)
    pub fn char_code_at(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.charCodeAt")?;
        let pos = to_integer(realm, &arg(args, 0))?;
        if pos < 0.0 || pos >= s.len() as f64 {
            return Ok(Value::from(f64::NAN));
        }
        Ok(Value::from(s.unit_at(pos as usize).map_or(f64::NAN, f64::from)))
    }

    /// String.prototype.concat(...strings)
    pub fn concat(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let mut s = this_string(realm, this, "String.prototype.concat")?;
        for value in args {
            s = s.concat(&to_string(realm, value)?);
        }
        Ok(Value::String(s))
    }

    /// String.prototype.indexOf(searchString, position)
    pub fn index_of(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.indexOf")?;
        let needle = to_string(realm, &arg(args, 0))?;
        let pos = to_integer(realm, &arg(args, 1))?.max(0.0).min(s.len() as f64);
        Ok(match s.index_of(&needle, pos as usize) {
            Some(found) => Value::from(found),
            None => Value::from(-1),
        })
    }

    /// String.prototype.lastIndexOf(searchString, position)
    pub fn last_index_of(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.lastIndexOf")?;
        let needle = to_string(realm, &arg(args, 0))?;
        let pos = to_number(realm, &arg(args, 1))?;
        let pos = if pos.is_nan() { f64::INFINITY } else { to_integer(realm, &Value::from(pos))? };
        let start = pos.max(0.0).min(s.len() as f64);
        Ok(match s.last_index_of(&needle, start as usize) {
            Some(found) => Value::from(found),
            None => Value::from(-1),
        })
    }

    /// String.prototype.localeCompare(that)
    pub fn locale_compare(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.localeCompare")?;
        let that = to_string(realm, &arg(args, 0))?;
        let ordering = s.to_rust_string().cmp(&that.to_rust_string());
        Ok(Value::from(ordering as i32))
    }

    /// String.prototype.match(regexp)
    pub fn match_(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.match")?;
        let (rx, matcher) = coerce_regexp(realm, &arg(args, 0))?;
        if !matcher.global() {
            return Ok(match exec_match(realm, &rx, &matcher, &s)? {
                Some(found) => Value::Object(match_array(realm, &found, &s)),
                None => Value::Null,
            });
        }
        let matches = global_matches(realm, &rx, &matcher, &s)?;
        if matches.is_empty() {
            return Ok(Value::Null);
        }
        let values = matches
            .iter()
            .map(|found| Value::String(s.substring(found.start, found.end)))
            .collect();
        Ok(Value::Object(realm.new_array(values)))
    }

    /// String.prototype.replace(searchValue, replaceValue)
    pub fn replace(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.replace")?;
        let search = arg(args, 0);
        let replace_value = arg(args, 1);
        let template = if replace_value.is_callable() {
            None
        } else {
            Some(to_string(realm, &replace_value)?)
        };

        let matches = match (search.as_object(), matcher_of(&search)) {
            (Some(rx), Some(matcher)) if matcher.global() => global_matches(realm, rx, &matcher, &s)?,
            (Some(rx), Some(matcher)) => exec_match(realm, rx, &matcher, &s)?.into_iter().collect(),
            _ => {
                let needle = to_string(realm, &search)?;
                s.index_of(&needle, 0)
                    .map(|start| MatchResult {
                        start,
                        end: start + needle.len(),
                        captures: Vec::new(),
                    })
                    .into_iter()
                    .collect()
            }
        };

        let units = s.as_units();
        let mut out = Vec::with_capacity(units.len());
        let mut cursor = 0;
        for found in &matches {
            out.extend_from_slice(&units[cursor.min(found.start)..found.start]);
            match &template {
                Some(template) => expand_replacement(template.as_units(), units, found, &mut out),
                None => {
                    let mut call_args = Vec::with_capacity(found.captures.len() + 3);
                    call_args.push(Value::String(s.substring(found.start, found.end)));
                    for index in 1..=found.captures.len() {
                        call_args.push(match found.capture(units, index) {
                            Some(capture) => Value::String(JsString::from_slice(capture)),
                            None => Value::Undefined,
                        });
                    }
                    call_args.push(Value::from(found.start));
                    call_args.push(Value::String(s.clone()));
                    let replacement = realm.call(&replace_value, Value::Undefined, &call_args)?;
                    out.extend_from_slice(to_string(realm, &replacement)?.as_units());
                }
            }
            cursor = found.end;
        }
        out.extend_from_slice(&units[cursor.min(units.len())..]);
        Ok(Value::String(JsString::from_units(out)))
    }

    /// String.prototype.search(regexp)
    pub fn search(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.search")?;
        let (_, matcher) = coerce_regexp(realm, &arg(args, 0))?;
        Ok(match matcher.match_from(s.as_units(), 0) {
            Some(found) => Value::from(found.start),
            None => Value::from(-1),
        })
    }

    /// String.prototype.slice(start, end)
    pub fn slice(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.slice")?;
        let len = s.len() as f64;
        let from = relative_index(realm, &arg(args, 0), len, 0.0)?;
        let to = relative_index(realm, &arg(args, 1), len, len)?;
        if from >= to {
            return Ok(Value::String(JsString::empty()));
        }
        Ok(Value::String(s.substring(from as usize, to as usize)))
    }

    /// String.prototype.split(separator, limit)
    pub fn split(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.split")?;
        let separator = arg(args, 0);
        let limit = match arg(args, 1) {
            Value::Undefined => u32::MAX,
            other => to_uint32(realm, &other)?,
        };
        let matcher = matcher_of(&separator);
        let literal = match (&matcher, &separator) {
            (Some(_), _) | (None, Value::Undefined) => None,
            (None, other) => Some(to_string(realm, other)?),
        };
        if limit == 0 {
            return Ok(Value::Object(realm.new_array(Vec::new())));
        }
        if separator.is_undefined() {
            return Ok(Value::Object(realm.new_array(vec![Value::String(s)])));
        }

        let units = s.as_units();
        let size = units.len();
        // Leftmost separator match starting at or after `q`
        let next_match = |q: usize| -> Option<MatchResult> {
            match (&matcher, &literal) {
                (Some(matcher), _) => matcher.match_from(units, q),
                (None, Some(literal)) => s.index_of(literal, q).map(|start| MatchResult {
                    start,
                    end: start + literal.len(),
                    captures: Vec::new(),
                }),
                (None, None) => None,
            }
        };

        if size == 0 {
            let parts = match next_match(0) {
                Some(found) if found.start == 0 => Vec::new(),
                _ => vec![Value::String(s.clone())],
            };
            return Ok(Value::Object(realm.new_array(parts)));
        }

        let limit = limit as usize;
        let mut parts = Vec::new();
        let mut p = 0;
        let mut q = p;
        while q < size {
            let Some(found) = next_match(q).filter(|found| found.start < size) else {
                break;
            };
            if found.end == p {
                q = found.start + 1;
                continue;
            }
            parts.push(Value::String(JsString::from_slice(&units[p..found.start])));
            if parts.len() == limit {
                return Ok(Value::Object(realm.new_array(parts)));
            }
            p = found.end;
            for index in 1..=found.captures.len() {
                parts.push(match found.capture(units, index) {
                    Some(capture) => Value::String(JsString::from_slice(capture)),
                    None => Value::Undefined,
                });
                if parts.len() == limit {
                    return Ok(Value::Object(realm.new_array(parts)));
                }
            }
            q = p;
        }
        parts.push(Value::String(JsString::from_slice(&units[p.min(size)..])));
        Ok(Value::Object(realm.new_array(parts)))
    }

    /// String.prototype.substring(start, end)
    pub fn substring(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.substring")?;
        let len = s.len() as f64;
        let start = to_integer(realm, &arg(args, 0))?.max(0.0).min(len);
        let end = match arg(args, 1) {
            Value::Undefined => len,
            other => to_integer(realm, &other)?.max(0.0).min(len),
        };
        let (from, to) = if start <= end { (start, end) } else { (end, start) };
        Ok(Value::String(s.substring(from as usize, to as usize)))
    }

    /// String.prototype.substr(start, length)
    pub fn substr(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.substr")?;
        let len = s.len() as f64;
        let start = to_integer(realm, &arg(args, 0))?;
        let length = match arg(args, 1) {
            Value::Undefined => f64::INFINITY,
            other => to_integer(realm, &other)?,
        };
        let start = if start < 0.0 { (len + start).max(0.0) } else { start.min(len) };
        let count = length.max(0.0).min(len - start);
        if count <= 0.0 {
            return Ok(Value::String(JsString::empty()));
        }
        Ok(Value::String(s.substring(start as usize, (start + count) as usize)))
    }

    /// String.prototype.toLowerCase()
    pub fn to_lower_case(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.toLowerCase")?;
        Ok(Value::String(change_case(s.as_units(), false)))
    }

    /// String.prototype.toUpperCase()
    pub fn to_upper_case(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.toUpperCase")?;
        Ok(Value::String(change_case(s.as_units(), true)))
    }

    /// String.prototype.trim()
    pub fn trim(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.trim")?;
        Ok(Value::String(JsString::from_slice(trim_whitespace(s.as_units()))))
    }

    /// String.prototype.trimLeft()
    pub fn trim_left(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.trimLeft")?;
        Ok(Value::String(JsString::from_slice(trim_start_whitespace(s.as_units()))))
    }

    /// String.prototype.trimRight()
    pub fn trim_right(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let s = this_string(realm, this, "String.prototype.trimRight")?;
        Ok(Value::String(JsString::from_slice(trim_end_whitespace(s.as_units()))))
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().string_prototype;
    let ctor = constructor(realm, "String", 1, StringConstructor::call, StringConstructor::construct, proto);
    method(realm, &ctor, "fromCharCode", 1, StringConstructor::from_char_code);

    method(realm, proto, "toString", 0, StringPrototype::value_of);
    method(realm, proto, "valueOf", 0, StringPrototype::value_of);
    method(realm, proto, "charAt", 1, StringPrototype::char_at);
    method(realm, proto, "charCodeAt", 1, StringPrototype::char_code_at);
    method(realm, proto, "concat", 1, StringPrototype::concat);
    method(realm, proto, "indexOf", 1, StringPrototype::index_of);
    method(realm, proto, "lastIndexOf", 1, StringPrototype::last_index_of);
    method(realm, proto, "localeCompare", 1, StringPrototype::locale_compare);
    method(realm, proto, "match", 1, StringPrototype::match_);
    method(realm, proto, "replace", 2, StringPrototype::replace);
    method(realm, proto, "search", 1, StringPrototype::search);
    method(realm, proto, "slice", 2, StringPrototype::slice);
    method(realm, proto, "split", 2, StringPrototype::split);
    method(realm, proto, "substring", 2, StringPrototype::substring);
    method(realm, proto, "substr", 2, StringPrototype::substr);
    method(realm, proto, "toLowerCase", 0, StringPrototype::to_lower_case);
    method(realm, proto, "toLocaleLowerCase", 0, StringPrototype::to_lower_case);
    method(realm, proto, "toUpperCase", 0, StringPrototype::to_upper_case);
    method(realm, proto, "toLocaleUpperCase", 0, StringPrototype::to_upper_case);
    method(realm, proto, "trim", 0, StringPrototype::trim);
    method(realm, proto, "trimLeft", 0, StringPrototype::trim_left);
    method(realm, proto, "trimRight", 0, StringPrototype::trim_right);
}
