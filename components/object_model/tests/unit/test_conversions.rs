//! Unit tests for the conversion helpers used by property access

use object_model::conversions::{
    check_object_coercible, get_value, put_value, to_number, to_property_key, to_string, to_uint16,
};
use object_model::{PropertyKey, Realm, Value};

#[test]
fn test_property_keys_are_canonical() {
    let realm = Realm::default();
    assert_eq!(to_property_key(&realm, &Value::from(1.0)).unwrap(), PropertyKey::Index(1));
    assert_eq!(to_property_key(&realm, &Value::from("1")).unwrap(), PropertyKey::Index(1));
    assert_eq!(to_property_key(&realm, &Value::from(-0.0)).unwrap(), PropertyKey::Index(0));
    assert_eq!(to_property_key(&realm, &Value::from("01")).unwrap(), PropertyKey::from("01"));
    assert_eq!(to_property_key(&realm, &Value::from(1.5)).unwrap(), PropertyKey::from("1.5"));
    assert_eq!(to_property_key(&realm, &Value::Boolean(true)).unwrap(), PropertyKey::from("true"));
}

#[test]
fn test_primitive_reads() {
    let realm = Realm::default();
    let s = Value::from("hey");
    assert_eq!(get_value(&realm, &s, &PropertyKey::from("length")).unwrap(), Value::from(3.0));
    assert_eq!(get_value(&realm, &s, &PropertyKey::Index(1)).unwrap(), Value::from("e"));
    assert_eq!(get_value(&realm, &s, &PropertyKey::Index(3)).unwrap(), Value::Undefined);
    assert!(get_value(&realm, &Value::Undefined, &PropertyKey::from("x")).unwrap_err().is_type_error());
}

#[test]
fn test_primitive_writes_are_dropped() {
    let realm = Realm::default();
    let n = Value::from(5.0);
    put_value(&realm, &n, PropertyKey::from("tag"), Value::from(1.0), false).unwrap();
    assert_eq!(get_value(&realm, &n, &PropertyKey::from("tag")).unwrap(), Value::Undefined);
    assert!(put_value(&realm, &n, PropertyKey::from("tag"), Value::from(1.0), true).unwrap_err().is_type_error());
    assert!(put_value(&realm, &Value::Null, PropertyKey::from("x"), Value::Null, false).is_err());
}

#[test]
fn test_uint16_and_coercible() {
    let realm = Realm::default();
    assert_eq!(to_uint16(&realm, &Value::from(65537.0)).unwrap(), 1);
    assert_eq!(to_uint16(&realm, &Value::from(-1.0)).unwrap(), u16::MAX);
    assert!(check_object_coercible(&Value::from(""), "x").is_ok());
    assert!(check_object_coercible(&Value::Null, "String.prototype.trim").unwrap_err().is_type_error());
}

#[test]
fn test_coercions_are_idempotent() {
    let realm = Realm::default();
    let obj = realm.new_object();
    let value_of = realm.new_native_function("valueOf", 0, |_, _, _| Ok(Value::from(42.0)));
    let to_str = realm.new_native_function("toString", 0, |_, _, _| Ok(Value::from("custom")));
    realm.put(&obj, "valueOf", Value::Object(value_of)).unwrap();
    realm.put(&obj, "toString", Value::Object(to_str)).unwrap();

    let cases = [
        (Value::from(f64::NAN), "NaN"),
        (Value::from(0.0), "0"),
        (Value::from(-0.0), "0"),
        (Value::from(f64::INFINITY), "Infinity"),
        (Value::from(f64::NEG_INFINITY), "-Infinity"),
        (Value::from(" 0x1F "), " 0x1F "),
        (Value::from("1e21"), "1e21"),
        (Value::from(1e21), "1e+21"),
        (Value::Boolean(true), "true"),
        (Value::Boolean(false), "false"),
        (Value::Null, "null"),
        (Value::Undefined, "undefined"),
        (Value::Object(obj), "custom"),
    ];
    for (value, expected) in cases {
        let n = to_number(&realm, &value).unwrap();
        let again = to_number(&realm, &Value::from(n)).unwrap();
        assert!(n.to_bits() == again.to_bits() || (n.is_nan() && again.is_nan()), "{:?}", value);

        let s = to_string(&realm, &value).unwrap();
        assert_eq!(s.to_rust_string(), expected);
        let again = to_string(&realm, &Value::String(s.clone())).unwrap();
        assert_eq!(again, s, "{:?}", value);
    }

    let numbers = |text: &str| to_number(&realm, &Value::from(text)).unwrap();
    assert_eq!(numbers(" 0x1F "), 31.0);
    assert_eq!(numbers("1e21"), 1e21);
}
