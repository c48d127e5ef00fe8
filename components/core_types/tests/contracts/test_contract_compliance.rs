//! Contract compliance tests for core_types
//!
//! These tests pin down the public surface other components rely on.

use core_types::{array_index, number, ErrorKind, JsError, JsString, PropertyKey, MAX_ARRAY_INDEX};

#[cfg(test)]
mod property_key_contract_tests {
    use super::*;

    /// Contract: canonical index strings and numbers produce the same key
    #[test]
    fn test_index_keys_are_canonical() {
        assert_eq!(PropertyKey::from("0"), PropertyKey::from_number(0.0));
        assert_eq!(PropertyKey::from("4294967294"), PropertyKey::Index(MAX_ARRAY_INDEX));
        assert_eq!(PropertyKey::from("4294967295").as_index(), None);
    }

    /// Contract: non-canonical numerals stay string keys
    #[test]
    fn test_non_canonical_numerals_are_strings() {
        for name in ["00", "+1", "1e3", " 1", "0x10"] {
            assert_eq!(array_index(&name.encode_utf16().collect::<Vec<_>>()), None, "{}", name);
            assert!(matches!(PropertyKey::from(name), PropertyKey::String(_)));
        }
    }

    /// Contract: to_js_string inverts key construction
    #[test]
    fn test_key_string_round_trip() {
        for name in ["length", "7", "-0", "1.5"] {
            let key = PropertyKey::from(name);
            assert_eq!(key.to_js_string(), JsString::from(name));
        }
    }
}

#[cfg(test)]
mod number_contract_tests {
    use super::*;

    /// Contract: ToString(Number) layouts
    #[test]
    fn test_number_to_string_contract() {
        assert_eq!(number::number_to_string(-0.0), "0");
        assert_eq!(number::number_to_string(1e21), "1e+21");
        assert_eq!(number::number_to_string(123e-20), "1.23e-18");
        assert_eq!(number::number_to_string(0.000001), "0.000001");
    }

    /// Contract: ToNumber(String) accepts only the numeric-literal grammar
    #[test]
    fn test_string_to_number_contract() {
        let n = |s: &str| number::string_to_number(&s.encode_utf16().collect::<Vec<_>>());
        assert_eq!(n(" \n"), 0.0);
        assert_eq!(n("0X10"), 16.0);
        assert_eq!(n("-1.5E2"), -150.0);
        assert!(n("1 2").is_nan());
        assert!(n("Infinityx").is_nan());
    }
}

#[cfg(test)]
mod error_contract_tests {
    use super::*;

    /// Contract: Display renders "Kind: message"
    #[test]
    fn test_error_display_contract() {
        let error = JsError::new(ErrorKind::SyntaxError, "Unexpected token");
        assert_eq!(error.to_string(), "SyntaxError: Unexpected token");
    }
}
