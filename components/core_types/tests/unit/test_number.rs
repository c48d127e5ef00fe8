//! Unit tests for number conversions

use core_types::number::*;

fn units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

#[test]
fn test_to_string_then_to_number_is_stable() {
    for &x in &[0.1, 1.0 / 3.0, 123456789.125, 1e-10, 2.5e25, -7.0, 5e-324, f64::MAX] {
        let text = number_to_string(x);
        assert_eq!(string_to_number(&units(&text)), x, "{}", text);
    }
}

#[test]
fn test_to_integer_keeps_infinities() {
    assert_eq!(to_integer(f64::NAN), 0.0);
    assert_eq!(to_integer(-2.9), -2.0);
    assert_eq!(to_integer(f64::NEG_INFINITY), f64::NEG_INFINITY);
}

#[test]
fn test_whitespace_set() {
    for unit in [0x09u16, 0x0B, 0x0C, 0x20, 0xA0, 0xFEFF, 0x2028, 0x3000] {
        assert!(is_whitespace(unit), "{:#x}", unit);
    }
    assert!(!is_whitespace(0x200B));
    assert_eq!(trim_whitespace(&units("\u{FEFF} a \u{2029}")), &units("a")[..]);
}

#[test]
fn test_small_integer_wraps() {
    assert_eq!(to_int8(200.0), -56);
    assert_eq!(to_uint8(-1.0), 255);
    assert_eq!(to_int16(40000.0), -25536);
}
