//! Immutable JavaScript strings.
//!
//! A [`JsString`] is a sequence of UTF-16 code units. Concatenation of long
//! strings builds a rope whose flat form is computed once, on first access to
//! the code units, so repeated `+=` does not degrade to quadratic copying.
//! Ropes and flat strings are indistinguishable through the public API.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Concatenations shorter than this are copied eagerly instead of roped.
const ROPE_MIN_LENGTH: usize = 32;

/// Ropes deeper than this are flattened on the next concatenation, which
/// keeps both flattening and drop recursion bounded.
const ROPE_MAX_DEPTH: u16 = 1024;

/// An immutable, cheaply clonable UTF-16 string.
///
/// # Examples
///
/// ```
/// use core_types::JsString;
///
/// let s = JsString::from("héllo");
/// assert_eq!(s.len(), 5);
/// assert_eq!(s.unit_at(1), Some('é' as u16));
/// assert_eq!(s.concat(&JsString::from("!")).to_string(), "héllo!");
/// ```
#[derive(Clone)]
pub struct JsString(Rc<Repr>);

enum Repr {
    Flat(Box<[u16]>),
    Rope(Rope),
}

struct Rope {
    left: JsString,
    right: JsString,
    len: usize,
    depth: u16,
    flat: OnceCell<Box<[u16]>>,
}

impl JsString {
    /// The empty string
    pub fn empty() -> Self {
        JsString(Rc::new(Repr::Flat(Box::new([]))))
    }

    /// Build a string from UTF-16 code units
    pub fn from_units(units: Vec<u16>) -> Self {
        JsString(Rc::new(Repr::Flat(units.into_boxed_slice())))
    }

    /// Build a string by copying a slice of UTF-16 code units
    pub fn from_slice(units: &[u16]) -> Self {
        JsString(Rc::new(Repr::Flat(units.into())))
    }

    /// Number of UTF-16 code units
    pub fn len(&self) -> usize {
        match &*self.0 {
            Repr::Flat(units) => units.len(),
            Repr::Rope(rope) => rope.len,
        }
    }

    /// Whether the string has no code units
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this string is still an unflattened rope
    pub fn is_rope(&self) -> bool {
        match &*self.0 {
            Repr::Flat(_) => false,
            Repr::Rope(rope) => rope.flat.get().is_none(),
        }
    }

    fn depth(&self) -> u16 {
        match &*self.0 {
            Repr::Flat(_) => 0,
            Repr::Rope(rope) => rope.depth,
        }
    }

    /// The code units of this string, flattening a rope on first use
    pub fn as_units(&self) -> &[u16] {
        match &*self.0 {
            Repr::Flat(units) => units,
            Repr::Rope(rope) => rope.flat.get_or_init(|| {
                let mut out = Vec::with_capacity(rope.len);
                self.write_units(&mut out);
                out.into_boxed_slice()
            }),
        }
    }

    fn write_units(&self, out: &mut Vec<u16>) {
        let mut pending: Vec<&JsString> = vec![self];
        while let Some(s) = pending.pop() {
            match &*s.0 {
                Repr::Flat(units) => out.extend_from_slice(units),
                Repr::Rope(rope) => match rope.flat.get() {
                    Some(units) => out.extend_from_slice(units),
                    None => {
                        pending.push(&rope.right);
                        pending.push(&rope.left);
                    }
                },
            }
        }
    }

    /// Code unit at `index`
    pub fn unit_at(&self, index: usize) -> Option<u16> {
        self.as_units().get(index).copied()
    }

    /// Concatenate two strings
    pub fn concat(&self, other: &JsString) -> JsString {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let len = self.len() + other.len();
        let depth = self.depth().max(other.depth()) + 1;
        if len < ROPE_MIN_LENGTH || depth > ROPE_MAX_DEPTH {
            let mut units = Vec::with_capacity(len);
            self.write_units(&mut units);
            other.write_units(&mut units);
            return JsString::from_units(units);
        }
        JsString(Rc::new(Repr::Rope(Rope {
            left: self.clone(),
            right: other.clone(),
            len,
            depth,
            flat: OnceCell::new(),
        })))
    }

    /// Code units in `start..end`, clamped to the string bounds
    pub fn substring(&self, start: usize, end: usize) -> JsString {
        let len = self.len();
        let end = end.min(len);
        let start = start.min(end);
        if start == 0 && end == len {
            return self.clone();
        }
        JsString::from_slice(&self.as_units()[start..end])
    }

    /// First position `>= from` where `needle` occurs
    pub fn index_of(&self, needle: &JsString, from: usize) -> Option<usize> {
        let haystack = self.as_units();
        let needle = needle.as_units();
        if from > haystack.len() {
            return None;
        }
        if needle.is_empty() {
            return Some(from);
        }
        if needle.len() > haystack.len() {
            return None;
        }
        (from..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
    }

    /// Last position `<= from` where `needle` occurs
    pub fn last_index_of(&self, needle: &JsString, from: usize) -> Option<usize> {
        let haystack = self.as_units();
        let needle = needle.as_units();
        if needle.len() > haystack.len() {
            return None;
        }
        let start = from.min(haystack.len() - needle.len());
        (0..=start)
            .rev()
            .find(|&i| &haystack[i..i + needle.len()] == needle)
    }

    /// Whether both handles point at the same string storage
    pub fn ptr_eq(&self, other: &JsString) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Compare against an ASCII/UTF-8 literal without allocating a JsString
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_units().iter().copied().eq(other.encode_utf16())
    }

    /// Lossy conversion to a Rust string (lone surrogates become U+FFFD)
    pub fn to_rust_string(&self) -> String {
        String::from_utf16_lossy(self.as_units())
    }
}

impl Default for JsString {
    fn default() -> Self {
        JsString::empty()
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString::from_units(s.encode_utf16().collect())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from(s.as_str())
    }
}

impl From<&String> for JsString {
    fn from(s: &String) -> Self {
        JsString::from(s.as_str())
    }
}

impl PartialEq for JsString {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.as_units() == other.as_units())
    }
}

impl Eq for JsString {}

impl PartialOrd for JsString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JsString {
    /// Lexicographic by code unit, as the relational operators compare strings
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_units().cmp(other.as_units())
    }
}

impl Hash for JsString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_units().hash(state);
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in char::decode_utf16(self.as_units().iter().copied()) {
            write!(f, "{}", c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_rust_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_concat_is_flat() {
        let s = JsString::from("ab").concat(&JsString::from("cd"));
        assert!(!s.is_rope());
        assert_eq!(s, JsString::from("abcd"));
    }

    #[test]
    fn test_long_concat_builds_rope_then_flattens() {
        let a = JsString::from("a".repeat(40));
        let b = JsString::from("b".repeat(40));
        let s = a.concat(&b);
        assert!(s.is_rope());
        assert_eq!(s.len(), 80);
        assert_eq!(s.unit_at(40), Some(b'b' as u16));
        assert!(!s.is_rope());
    }

    #[test]
    fn test_deep_rope_stays_bounded() {
        let piece = JsString::from("x".repeat(ROPE_MIN_LENGTH));
        let mut s = JsString::empty();
        for _ in 0..5000 {
            s = s.concat(&piece);
        }
        assert_eq!(s.len(), 5000 * ROPE_MIN_LENGTH);
        assert!(s.depth() <= ROPE_MAX_DEPTH);
    }

    #[test]
    fn test_index_of_and_last_index_of() {
        let s = JsString::from("abcabc");
        let needle = JsString::from("bc");
        assert_eq!(s.index_of(&needle, 0), Some(1));
        assert_eq!(s.index_of(&needle, 2), Some(4));
        assert_eq!(s.index_of(&needle, 5), None);
        assert_eq!(s.last_index_of(&needle, 6), Some(4));
        assert_eq!(s.last_index_of(&needle, 3), Some(1));
        assert_eq!(s.index_of(&JsString::empty(), 6), Some(6));
    }

    #[test]
    fn test_lone_surrogate_is_preserved() {
        let s = JsString::from_units(vec![0xD800, 0x61]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.to_rust_string(), "\u{FFFD}a");
    }
}
