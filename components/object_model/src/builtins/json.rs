//! JSON object methods (ES5 15.12)
//!
//! `parse` reads the UTF-16 text directly and builds objects through
//! [[DefineOwnProperty]]; `stringify` walks the object graph itself so that
//! getters, `toJSON` and the replacer run in the standard order. Both walks
//! that recurse on the native stack stop at `RealmConfig::max_json_depth`.

use core_types::number::{number_to_string, string_to_number};
use core_types::{JsString, PropertyKey};

use super::{arg, length_of, method};
use crate::conversions::{to_integer, to_number, to_string};
use crate::exception::{range_error, syntax_error, type_error, JsResult};
use crate::object::{JsObject, ObjectKind};
use crate::property::{PropertyDescriptor, PropertyFlags};
use crate::realm::Realm;
use crate::value::Value;

/// Longest indent `stringify` will use
const MAX_GAP: usize = 10;

const STACK_EXHAUSTED: &str = "Maximum call stack size exceeded";

fn units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn create_data_property(realm: &Realm, obj: &JsObject, key: PropertyKey, value: Value) -> JsResult<()> {
    obj.define_own_property(realm, key, PropertyDescriptor::data(value, PropertyFlags::DEFAULT), false)
        .map(|_| ())
}

// =============================================================================
// parse
// =============================================================================

/// A container whose members are still being read
enum Open {
    Array(Vec<Value>),
    Object { obj: JsObject, key: PropertyKey },
}

/// JSON text reader over UTF-16 code units.
///
/// Nesting is tracked on an explicit stack, so depth is bounded only by
/// memory. String escapes keep lone surrogates as raw code units.
struct Reader<'a> {
    realm: &'a Realm,
    text: &'a [u16],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(realm: &'a Realm, text: &'a [u16]) -> Self {
        Reader { realm, text, pos: 0 }
    }

    fn peek(&self) -> Option<u16> {
        self.text.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(0x09 | 0x0A | 0x0D | 0x20)) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(u16::from(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected<T>(&self) -> JsResult<T> {
        match self.peek() {
            None => syntax_error("JSON.parse: unexpected end of input"),
            Some(c) => syntax_error(format!(
                "JSON.parse: unexpected character {} at position {}",
                String::from_utf16_lossy(&[c]),
                self.pos
            )),
        }
    }

    fn expect(&mut self, c: u8) -> JsResult<()> {
        if self.eat(c) {
            Ok(())
        } else {
            self.unexpected()
        }
    }

    /// The whole text: one value surrounded by whitespace
    fn read_text(&mut self) -> JsResult<Value> {
        let mut open: Vec<Open> = Vec::new();
        loop {
            self.skip_whitespace();
            let mut value = match self.peek() {
                Some(0x5B) => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.eat(b']') {
                        Value::Object(self.realm.new_array(Vec::new()))
                    } else {
                        open.push(Open::Array(Vec::new()));
                        continue;
                    }
                }
                Some(0x7B) => {
                    self.pos += 1;
                    self.skip_whitespace();
                    let obj = self.realm.new_object();
                    if self.eat(b'}') {
                        Value::Object(obj)
                    } else {
                        let key = self.member_name()?;
                        open.push(Open::Object { obj, key });
                        continue;
                    }
                }
                _ => self.primitive()?,
            };

            // Close every container the value completes
            loop {
                let Some(container) = open.pop() else {
                    self.skip_whitespace();
                    if self.pos != self.text.len() {
                        return self.unexpected();
                    }
                    return Ok(value);
                };
                self.skip_whitespace();
                match container {
                    Open::Array(mut items) => {
                        items.push(value);
                        if self.eat(b',') {
                            open.push(Open::Array(items));
                            break;
                        }
                        self.expect(b']')?;
                        value = Value::Object(self.realm.new_array(items));
                    }
                    Open::Object { obj, key } => {
                        create_data_property(self.realm, &obj, key, value)?;
                        if self.eat(b',') {
                            self.skip_whitespace();
                            let key = self.member_name()?;
                            open.push(Open::Object { obj, key });
                            break;
                        }
                        self.expect(b'}')?;
                        value = Value::Object(obj);
                    }
                }
            }
        }
    }

    /// `"name" :`
    fn member_name(&mut self) -> JsResult<PropertyKey> {
        if self.peek() != Some(u16::from(b'"')) {
            return self.unexpected();
        }
        let name = self.string()?;
        self.skip_whitespace();
        self.expect(b':')?;
        Ok(PropertyKey::from(name))
    }

    fn primitive(&mut self) -> JsResult<Value> {
        match self.peek() {
            Some(0x22) => Ok(Value::String(self.string()?)),
            Some(0x74) => self.literal("true", Value::Boolean(true)),
            Some(0x66) => self.literal("false", Value::Boolean(false)),
            Some(0x6E) => self.literal("null", Value::Null),
            Some(0x2D | 0x30..=0x39) => self.number(),
            _ => self.unexpected(),
        }
    }

    fn literal(&mut self, word: &str, value: Value) -> JsResult<Value> {
        for expected in word.bytes() {
            self.expect(expected)?;
        }
        Ok(value)
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(0x30..=0x39)) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// `-? int frac? exp?`; values beyond the f64 range become infinities
    fn number(&mut self) -> JsResult<Value> {
        let start = self.pos;
        self.eat(b'-');
        if !self.eat(b'0') && self.digits() == 0 {
            return self.unexpected();
        }
        if self.eat(b'.') && self.digits() == 0 {
            return self.unexpected();
        }
        if self.eat(b'e') || self.eat(b'E') {
            if !self.eat(b'+') {
                self.eat(b'-');
            }
            if self.digits() == 0 {
                return self.unexpected();
            }
        }
        Ok(Value::from(string_to_number(&self.text[start..self.pos])))
    }

    fn hex_escape(&mut self) -> JsResult<u16> {
        let mut unit = 0u16;
        for _ in 0..4 {
            let digit = self
                .peek()
                .and_then(|c| char::from_u32(u32::from(c)))
                .and_then(|c| c.to_digit(16));
            let Some(digit) = digit else {
                return self.unexpected();
            };
            unit = unit * 16 + digit as u16;
            self.pos += 1;
        }
        Ok(unit)
    }

    fn string(&mut self) -> JsResult<JsString> {
        self.expect(b'"')?;
        let mut out = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return self.unexpected();
            };
            self.pos += 1;
            match c {
                0x22 => return Ok(JsString::from_units(out)),
                0x5C => {
                    let Some(escape) = self.peek() else {
                        return self.unexpected();
                    };
                    self.pos += 1;
                    let unit = match escape {
                        0x22 | 0x5C | 0x2F => escape,
                        0x62 => 0x08,
                        0x66 => 0x0C,
                        0x6E => 0x0A,
                        0x72 => 0x0D,
                        0x74 => 0x09,
                        0x75 => self.hex_escape()?,
                        _ => {
                            self.pos -= 1;
                            return self.unexpected();
                        }
                    };
                    out.push(unit);
                }
                c if c < 0x20 => {
                    self.pos -= 1;
                    return self.unexpected();
                }
                c => out.push(c),
            }
        }
    }
}

/// Walk(holder, name): revive children first, then the value itself
fn internalize(realm: &Realm, reviver: &Value, holder: &JsObject, key: PropertyKey, depth: usize) -> JsResult<Value> {
    let value = holder.get(realm, &key)?;
    if let Value::Object(obj) = &value {
        if depth >= realm.config().max_json_depth {
            return range_error(STACK_EXHAUSTED);
        }
        let keys: Vec<PropertyKey> = if obj.is_array() {
            (0..length_of(realm, obj)?).map(PropertyKey::from).collect()
        } else {
            obj.own_enumerable_keys()
        };
        for child in keys {
            let revived = internalize(realm, reviver, obj, child.clone(), depth + 1)?;
            if revived.is_undefined() {
                obj.delete(&child, false)?;
            } else {
                create_data_property(realm, obj, child, revived)?;
            }
        }
    }
    realm.call(reviver, Value::Object(holder.clone()), &[Value::String(key.to_js_string()), value])
}

// =============================================================================
// stringify
// =============================================================================

/// Quote(value), with lone surrogates written as `\uXXXX` escapes
fn quote(s: &JsString) -> Vec<u16> {
    let text = s.as_units();
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(u16::from(b'"'));
    let mut i = 0;
    while i < text.len() {
        let c = text[i];
        match c {
            0x22 => out.extend(units("\\\"")),
            0x5C => out.extend(units("\\\\")),
            0x08 => out.extend(units("\\b")),
            0x0C => out.extend(units("\\f")),
            0x0A => out.extend(units("\\n")),
            0x0D => out.extend(units("\\r")),
            0x09 => out.extend(units("\\t")),
            0xD800..=0xDBFF if matches!(text.get(i + 1), Some(0xDC00..=0xDFFF)) => {
                out.extend_from_slice(&text[i..i + 2]);
                i += 1;
            }
            c if c < 0x20 || (0xD800..=0xDFFF).contains(&c) => out.extend(units(&format!("\\u{:04x}", c))),
            c => out.push(c),
        }
        i += 1;
    }
    out.push(u16::from(b'"'));
    out
}

/// Primitive wrappers are serialized as the value they wrap
enum Wrapped {
    Number,
    String,
    Boolean(bool),
}

struct Serializer<'a> {
    realm: &'a Realm,
    replacer: Option<Value>,
    property_list: Option<Vec<PropertyKey>>,
    gap: Vec<u16>,
    indent: Vec<u16>,
    /// Objects currently being serialized, for cycle detection
    stack: Vec<JsObject>,
}

impl Serializer<'_> {
    /// Str(key, holder); `None` is undefined
    fn property(&mut self, key: &PropertyKey, holder: &JsObject) -> JsResult<Option<Vec<u16>>> {
        let realm = self.realm;
        let name = Value::String(key.to_js_string());
        let mut value = holder.get(realm, key)?;
        if let Value::Object(obj) = &value {
            let to_json = obj.get(realm, &PropertyKey::from("toJSON"))?;
            if to_json.is_callable() {
                value = realm.call(&to_json, value.clone(), &[name.clone()])?;
            }
        }
        if let Some(replacer) = &self.replacer {
            value = realm.call(replacer, Value::Object(holder.clone()), &[name, value])?;
        }

        let wrapped = match &value {
            Value::Object(obj) => match obj.borrow().kind {
                ObjectKind::Number(_) => Some(Wrapped::Number),
                ObjectKind::String(_) => Some(Wrapped::String),
                ObjectKind::Boolean(b) => Some(Wrapped::Boolean(b)),
                _ => None,
            },
            _ => None,
        };
        match wrapped {
            Some(Wrapped::Number) => value = Value::from(to_number(realm, &value)?),
            Some(Wrapped::String) => value = Value::String(to_string(realm, &value)?),
            Some(Wrapped::Boolean(b)) => value = Value::Boolean(b),
            None => {}
        }

        Ok(match value {
            Value::Null => Some(units("null")),
            Value::Boolean(true) => Some(units("true")),
            Value::Boolean(false) => Some(units("false")),
            Value::String(s) => Some(quote(&s)),
            Value::Number(n) if n.is_finite() => Some(units(&number_to_string(n))),
            Value::Number(_) => Some(units("null")),
            Value::Object(obj) if !obj.is_callable() => Some(if obj.is_array() {
                self.array(&obj)?
            } else {
                self.object(&obj)?
            }),
            _ => None,
        })
    }

    fn enter(&mut self, obj: &JsObject) -> JsResult<Vec<u16>> {
        if self.stack.iter().any(|seen| seen.ptr_eq(obj)) {
            return type_error("Converting circular structure to JSON");
        }
        if self.stack.len() >= self.realm.config().max_json_depth {
            return range_error(STACK_EXHAUSTED);
        }
        self.stack.push(obj.clone());
        let stepback = self.indent.clone();
        self.indent.extend_from_slice(&self.gap);
        Ok(stepback)
    }

    fn leave(&mut self, stepback: Vec<u16>) {
        self.stack.pop();
        self.indent = stepback;
    }

    /// Join the members between `open` and `close`, one per line when indenting
    fn wrap(&self, members: Vec<Vec<u16>>, open: u8, close: u8, stepback: &[u16]) -> Vec<u16> {
        let mut out = vec![u16::from(open)];
        if !members.is_empty() {
            let mut separator = vec![u16::from(b',')];
            if !self.gap.is_empty() {
                separator.push(u16::from(b'\n'));
                separator.extend_from_slice(&self.indent);
                out.push(u16::from(b'\n'));
                out.extend_from_slice(&self.indent);
            }
            out.extend(members.join(separator.as_slice()));
            if !self.gap.is_empty() {
                out.push(u16::from(b'\n'));
                out.extend_from_slice(stepback);
            }
        }
        out.push(u16::from(close));
        out
    }

    /// JO(value)
    fn object(&mut self, obj: &JsObject) -> JsResult<Vec<u16>> {
        let stepback = self.enter(obj)?;
        let keys = match &self.property_list {
            Some(list) => list.clone(),
            None => obj.own_enumerable_keys(),
        };
        let mut members = Vec::new();
        for key in &keys {
            if let Some(text) = self.property(key, obj)? {
                let mut member = quote(&key.to_js_string());
                member.push(u16::from(b':'));
                if !self.gap.is_empty() {
                    member.push(u16::from(b' '));
                }
                member.extend(text);
                members.push(member);
            }
        }
        let out = self.wrap(members, b'{', b'}', &stepback);
        self.leave(stepback);
        Ok(out)
    }

    /// JA(value)
    fn array(&mut self, obj: &JsObject) -> JsResult<Vec<u16>> {
        let stepback = self.enter(obj)?;
        let len = length_of(self.realm, obj)?;
        let mut members = Vec::with_capacity(len as usize);
        for index in 0..len {
            let text = self.property(&PropertyKey::from(index), obj)?;
            members.push(text.unwrap_or_else(|| units("null")));
        }
        let out = self.wrap(members, b'[', b']', &stepback);
        self.leave(stepback);
        Ok(out)
    }
}

/// The replacer array's names: strings and numbers, wrapped or not, deduplicated
fn property_list(realm: &Realm, list: &JsObject) -> JsResult<Vec<PropertyKey>> {
    let mut keys: Vec<PropertyKey> = Vec::new();
    for index in 0..length_of(realm, list)? {
        let item = list.get(realm, &PropertyKey::from(index))?;
        let accepted = match &item {
            Value::String(_) | Value::Number(_) => true,
            Value::Object(obj) => matches!(obj.borrow().kind, ObjectKind::String(_) | ObjectKind::Number(_)),
            _ => false,
        };
        if accepted {
            let key = PropertyKey::from(to_string(realm, &item)?);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    Ok(keys)
}

fn gap_from(realm: &Realm, space: &Value) -> JsResult<Vec<u16>> {
    let numeric = match space {
        Value::Number(_) => true,
        Value::String(_) => false,
        Value::Object(obj) => match obj.borrow().kind {
            ObjectKind::Number(_) => true,
            ObjectKind::String(_) => false,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };
    if numeric {
        let width = to_integer(realm, space)?.clamp(0.0, MAX_GAP as f64) as usize;
        return Ok(vec![u16::from(b' '); width]);
    }
    let text = to_string(realm, space)?;
    Ok(text.as_units()[..text.len().min(MAX_GAP)].to_vec())
}

/// The JSON object
pub struct JsonObject;

impl JsonObject {
    /// JSON.parse(text, reviver)
    pub fn parse(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let text = to_string(realm, &arg(args, 0))?;
        let value = Reader::new(realm, text.as_units()).read_text()?;

        let reviver = arg(args, 1);
        if !reviver.is_callable() {
            return Ok(value);
        }
        let root = realm.new_object();
        create_data_property(realm, &root, PropertyKey::from(""), value)?;
        internalize(realm, &reviver, &root, PropertyKey::from(""), 0)
    }

    /// JSON.stringify(value, replacer, space)
    pub fn stringify(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let replacer = arg(args, 1);
        let (replacer, property_list) = match &replacer {
            Value::Object(obj) if obj.is_callable() => (Some(replacer.clone()), None),
            Value::Object(obj) if obj.is_array() => (None, Some(property_list(realm, obj)?)),
            _ => (None, None),
        };
        let gap = gap_from(realm, &arg(args, 2))?;

        let wrapper = realm.new_object();
        create_data_property(realm, &wrapper, PropertyKey::from(""), arg(args, 0))?;
        let mut serializer = Serializer {
            realm,
            replacer,
            property_list,
            gap,
            indent: Vec::new(),
            stack: Vec::new(),
        };
        Ok(match serializer.property(&PropertyKey::from(""), &wrapper)? {
            Some(text) => Value::String(JsString::from_units(text)),
            None => Value::Undefined,
        })
    }
}

pub(crate) fn install(realm: &Realm) {
    let json = realm.new_namespace("JSON");
    method(realm, &json, "parse", 2, JsonObject::parse);
    method(realm, &json, "stringify", 3, JsonObject::stringify);
    realm.global().insert("JSON", Value::Object(json), PropertyFlags::HIDDEN);
}
