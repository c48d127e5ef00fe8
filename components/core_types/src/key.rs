//! Property keys.
//!
//! ECMAScript property names are strings, but names that are canonical array
//! indices (`"0"` .. `"4294967294"`) get their own representation so that the
//! element storage and the length bookkeeping never have to reparse them.

use std::fmt;

use num_traits::ToPrimitive;

use crate::number::number_to_string;
use crate::JsString;

/// Largest valid array index; `2^32 - 1` is reserved as "not an index".
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// A property name, canonicalised so array indices compare by value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// A canonical array index in `[0, 2^32 - 2]`
    Index(u32),
    /// Any other property name
    String(JsString),
}

impl PropertyKey {
    /// Canonicalise a string name
    pub fn from_js_string(name: JsString) -> Self {
        match array_index(name.as_units()) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::String(name),
        }
    }

    /// Key for a numeric property access such as `a[1.5]` or `a[-0]`
    pub fn from_number(n: f64) -> Self {
        match number_as_index(n) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::String(JsString::from(number_to_string(n))),
        }
    }

    /// The array index this key denotes, if any
    pub fn as_index(&self) -> Option<u32> {
        match self {
            PropertyKey::Index(index) => Some(*index),
            PropertyKey::String(_) => None,
        }
    }

    /// Whether this is the string key `name`
    pub fn is(&self, name: &str) -> bool {
        match self {
            PropertyKey::String(s) => s.eq_str(name),
            PropertyKey::Index(_) => false,
        }
    }

    /// The property name as a string value
    pub fn to_js_string(&self) -> JsString {
        match self {
            PropertyKey::Index(index) => JsString::from(index.to_string()),
            PropertyKey::String(s) => s.clone(),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey::from_js_string(JsString::from(name))
    }
}

impl From<JsString> for PropertyKey {
    fn from(name: JsString) -> Self {
        PropertyKey::from_js_string(name)
    }
}

impl From<u32> for PropertyKey {
    fn from(index: u32) -> Self {
        if index <= MAX_ARRAY_INDEX {
            PropertyKey::Index(index)
        } else {
            PropertyKey::String(JsString::from(index.to_string()))
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Index(index) => write!(f, "{}", index),
            PropertyKey::String(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Index(index) => write!(f, "Index({})", index),
            PropertyKey::String(s) => write!(f, "String({:?})", s),
        }
    }
}

/// Parse a canonical array index: decimal digits without leading zeros whose
/// value is at most [`MAX_ARRAY_INDEX`].
pub fn array_index(units: &[u16]) -> Option<u32> {
    if units.is_empty() || units.len() > 10 {
        return None;
    }
    if units[0] == u16::from(b'0') {
        return if units.len() == 1 { Some(0) } else { None };
    }
    let mut value: u64 = 0;
    for &unit in units {
        let digit = char::from_u32(u32::from(unit))?.to_digit(10)?;
        value = value * 10 + u64::from(digit);
    }
    u32::try_from(value).ok().filter(|index| *index <= MAX_ARRAY_INDEX)
}

/// The array index a number denotes when used as a property name
pub fn number_as_index(n: f64) -> Option<u32> {
    // -0 canonicalises to "0" through ToString, so it is index 0.
    n.to_u32()
        .filter(|index| f64::from(*index) == n && *index <= MAX_ARRAY_INDEX)
}
