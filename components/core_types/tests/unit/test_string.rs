//! Unit tests for JsString

use core_types::JsString;

#[cfg(test)]
mod js_string_tests {
    use super::*;

    #[test]
    fn test_length_counts_utf16_units() {
        assert_eq!(JsString::from("abc").len(), 3);
        assert_eq!(JsString::from("\u{1F600}").len(), 2);
        assert!(JsString::empty().is_empty());
    }

    #[test]
    fn test_substring_clamps() {
        let s = JsString::from("hello world");
        assert_eq!(s.substring(6, 100), JsString::from("world"));
        assert_eq!(s.substring(8, 3), JsString::empty());
    }

    #[test]
    fn test_ordering_is_by_code_unit() {
        assert!(JsString::from("B") < JsString::from("a"));
        assert!(JsString::from("ab") < JsString::from("abc"));
    }

    #[test]
    fn test_rope_equals_flat() {
        let left = JsString::from("l".repeat(50));
        let right = JsString::from("r".repeat(50));
        let rope = left.concat(&right);
        let flat = JsString::from(format!("{}{}", "l".repeat(50), "r".repeat(50)));
        assert_eq!(rope, flat);
        assert!(rope.eq_str(&format!("{}{}", "l".repeat(50), "r".repeat(50))));
    }
}
