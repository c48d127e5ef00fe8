//! Value properties and function properties of the global object (ES5 15.1)

use core_types::number::{parse_float, parse_int};
use core_types::JsString;

use super::{arg, method};
use crate::conversions::{to_int32, to_number, to_string};
use crate::exception::{uri_error, JsResult};
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::value::Value;

const URI_RESERVED: &[u8] = b";/?:@&=+$,";
const URI_MARK: &[u8] = b"-_.!~*'()";
const ESCAPE_SAFE: &[u8] = b"@*_+-./";
const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn in_set(unit: u16, set: &[u8]) -> bool {
    u8::try_from(unit).is_ok_and(|b| set.contains(&b))
}

fn is_uri_unescaped(unit: u16) -> bool {
    u8::try_from(unit).is_ok_and(|b| b.is_ascii_alphanumeric()) || in_set(unit, URI_MARK)
}

fn push_hex_byte(out: &mut Vec<u16>, byte: u8) {
    out.push(u16::from(b'%'));
    out.push(u16::from(HEX[usize::from(byte >> 4)]));
    out.push(u16::from(HEX[usize::from(byte & 0xF)]));
}

fn hex_value(units: &[u16]) -> Option<u32> {
    units.iter().try_fold(0u32, |acc, &unit| {
        let digit = char::from_u32(u32::from(unit))?.to_digit(16)?;
        Some(acc * 16 + digit)
    })
}

/// Encode(string, unescapedSet): UTF-8 percent-escapes for everything else
fn encode(input: &JsString, keep: fn(u16) -> bool) -> JsResult<JsString> {
    let units = input.as_units();
    let mut out = Vec::with_capacity(units.len());
    let mut k = 0;
    while k < units.len() {
        let unit = units[k];
        if keep(unit) {
            out.push(unit);
            k += 1;
            continue;
        }
        let code_point = match unit {
            0xDC00..=0xDFFF => return uri_error("URI malformed"),
            0xD800..=0xDBFF => match units.get(k + 1) {
                Some(&low @ 0xDC00..=0xDFFF) => {
                    k += 1;
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
                }
                _ => return uri_error("URI malformed"),
            },
            _ => u32::from(unit),
        };
        let Some(c) = char::from_u32(code_point) else {
            return uri_error("URI malformed");
        };
        let mut bytes = [0u8; 4];
        for &byte in c.encode_utf8(&mut bytes).as_bytes() {
            push_hex_byte(&mut out, byte);
        }
        k += 1;
    }
    Ok(JsString::from_units(out))
}

/// Decode(string, reservedSet): escapes of reserved characters are left as written
fn decode(input: &JsString, reserved: &[u8]) -> JsResult<JsString> {
    let units = input.as_units();
    let mut out = Vec::with_capacity(units.len());
    let mut k = 0;
    let byte_at = |at: usize| -> Option<u8> {
        if units.get(at) != Some(&u16::from(b'%')) {
            return None;
        }
        let digits = units.get(at + 1..at + 3)?;
        hex_value(digits).and_then(|v| u8::try_from(v).ok())
    };
    while k < units.len() {
        let unit = units[k];
        if unit != u16::from(b'%') {
            out.push(unit);
            k += 1;
            continue;
        }
        let Some(lead) = byte_at(k) else {
            return uri_error("URI malformed");
        };
        if lead < 0x80 {
            if reserved.contains(&lead) {
                out.extend_from_slice(&units[k..k + 3]);
            } else {
                out.push(u16::from(lead));
            }
            k += 3;
            continue;
        }
        let count = lead.leading_ones() as usize;
        if !(2..=4).contains(&count) {
            return uri_error("URI malformed");
        }
        let mut bytes = vec![lead];
        for i in 1..count {
            match byte_at(k + 3 * i) {
                Some(byte) if byte & 0xC0 == 0x80 => bytes.push(byte),
                _ => return uri_error("URI malformed"),
            }
        }
        // Rejects overlong forms and encoded surrogates
        let Ok(text) = std::str::from_utf8(&bytes) else {
            return uri_error("URI malformed");
        };
        out.extend(text.encode_utf16());
        k += 3 * count;
    }
    Ok(JsString::from_units(out))
}

/// The global functions
pub struct GlobalFunctions;

impl GlobalFunctions {
    /// parseInt(string, radix)
    pub fn parse_int(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        let radix = to_int32(realm, &arg(args, 1))?;
        Ok(Value::from(parse_int(input.as_units(), radix)))
    }

    /// parseFloat(string)
    pub fn parse_float(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        Ok(Value::from(parse_float(input.as_units())))
    }

    /// isNaN(number)
    pub fn is_nan(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::Boolean(to_number(realm, &arg(args, 0))?.is_nan()))
    }

    /// isFinite(number)
    pub fn is_finite(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::Boolean(to_number(realm, &arg(args, 0))?.is_finite()))
    }

    /// decodeURI(encodedURI)
    pub fn decode_uri(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        Ok(Value::String(decode(&input, b";/?:@&=+$,#")?))
    }

    /// decodeURIComponent(encodedURIComponent)
    pub fn decode_uri_component(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        Ok(Value::String(decode(&input, b"")?))
    }

    /// encodeURI(uri)
    pub fn encode_uri(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        let keep = |unit: u16| is_uri_unescaped(unit) || in_set(unit, URI_RESERVED) || unit == u16::from(b'#');
        Ok(Value::String(encode(&input, keep)?))
    }

    /// encodeURIComponent(uriComponent)
    pub fn encode_uri_component(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        Ok(Value::String(encode(&input, is_uri_unescaped)?))
    }

    /// escape(string): `%XX` below 256, `%uXXXX` above
    pub fn escape(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        let mut out = Vec::with_capacity(input.len());
        for &unit in input.as_units() {
            if u8::try_from(unit).is_ok_and(|b| b.is_ascii_alphanumeric()) || in_set(unit, ESCAPE_SAFE) {
                out.push(unit);
            } else if let Ok(byte) = u8::try_from(unit) {
                push_hex_byte(&mut out, byte);
            } else {
                out.extend([u16::from(b'%'), u16::from(b'u')]);
                for shift in [12, 8, 4, 0] {
                    out.push(u16::from(HEX[usize::from((unit >> shift) & 0xF)]));
                }
            }
        }
        Ok(Value::String(JsString::from_units(out)))
    }

    /// unescape(string): malformed escapes are kept as written
    pub fn unescape(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let input = to_string(realm, &arg(args, 0))?;
        let units = input.as_units();
        let mut out = Vec::with_capacity(units.len());
        let mut k = 0;
        while k < units.len() {
            let unit = units[k];
            if unit == u16::from(b'%') {
                let long = (units.get(k + 1) == Some(&u16::from(b'u')))
                    .then(|| units.get(k + 2..k + 6).and_then(hex_value))
                    .flatten();
                if let Some(value) = long {
                    out.push(value as u16);
                    k += 6;
                    continue;
                }
                if let Some(value) = units.get(k + 1..k + 3).and_then(hex_value) {
                    out.push(value as u16);
                    k += 3;
                    continue;
                }
            }
            out.push(unit);
            k += 1;
        }
        Ok(Value::String(JsString::from_units(out)))
    }
}

pub(crate) fn install(realm: &Realm) {
    let global = realm.global();
    global.insert("NaN", Value::from(f64::NAN), PropertyFlags::CONSTANT);
    global.insert("Infinity", Value::from(f64::INFINITY), PropertyFlags::CONSTANT);
    global.insert("undefined", Value::Undefined, PropertyFlags::CONSTANT);

    method(realm, global, "parseInt", 2, GlobalFunctions::parse_int);
    method(realm, global, "parseFloat", 1, GlobalFunctions::parse_float);
    method(realm, global, "isNaN", 1, GlobalFunctions::is_nan);
    method(realm, global, "isFinite", 1, GlobalFunctions::is_finite);
    method(realm, global, "decodeURI", 1, GlobalFunctions::decode_uri);
    method(realm, global, "decodeURIComponent", 1, GlobalFunctions::decode_uri_component);
    method(realm, global, "encodeURI", 1, GlobalFunctions::encode_uri);
    method(realm, global, "encodeURIComponent", 1, GlobalFunctions::encode_uri_component);
    method(realm, global, "escape", 1, GlobalFunctions::escape);
    method(realm, global, "unescape", 1, GlobalFunctions::unescape);
}
