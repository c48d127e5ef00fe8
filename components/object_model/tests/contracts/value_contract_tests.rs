//! Contract tests for Value and the type conversions

use object_model::conversions::{to_int32, to_number, to_object, to_primitive, to_string, to_uint32};
use object_model::{Hint, JsString, Realm, Value};

#[test]
fn test_type_of_each_language_type() {
    let realm = Realm::default();
    let f = realm.new_native_function("f", 0, |_, _, _| Ok(Value::Undefined));
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::Boolean(true).type_of(), "boolean");
    assert_eq!(Value::from(1.0).type_of(), "number");
    assert_eq!(Value::from("s").type_of(), "string");
    assert_eq!(Value::Object(realm.new_object()).type_of(), "object");
    assert_eq!(Value::Object(f).type_of(), "function");
}

#[test]
fn test_equality_relations() {
    let nan = Value::from(f64::NAN);
    assert!(!nan.strict_equals(&nan));
    assert!(nan.same_value(&nan));
    assert!(Value::from(0.0).strict_equals(&Value::from(-0.0)));
    assert!(!Value::from(0.0).same_value(&Value::from(-0.0)));

    let realm = Realm::default();
    let obj = Value::Object(realm.new_object());
    assert!(obj.strict_equals(&obj.clone()));
    assert!(!obj.strict_equals(&Value::Object(realm.new_object())));
}

#[test]
fn test_string_to_number() {
    let realm = Realm::default();
    let cases = [
        (" 12 ", 12.0),
        ("", 0.0),
        ("0x10", 16.0),
        ("1e3", 1000.0),
        ("-Infinity", f64::NEG_INFINITY),
        (".5", 0.5),
    ];
    for (text, expected) in cases {
        assert_eq!(to_number(&realm, &Value::from(text)).unwrap(), expected, "{:?}", text);
    }
    assert!(to_number(&realm, &Value::from("12px")).unwrap().is_nan());
    assert!(to_number(&realm, &Value::Undefined).unwrap().is_nan());
    assert_eq!(to_number(&realm, &Value::Null).unwrap(), 0.0);
}

#[test]
fn test_number_to_string() {
    let realm = Realm::default();
    let cases = [
        (1e21, "1e+21"),
        (123456789012345680000.0, "123456789012345680000"),
        (0.000001, "0.000001"),
        (1e-7, "1e-7"),
        (-0.0, "0"),
        (f64::NEG_INFINITY, "-Infinity"),
        (0.1 + 0.2, "0.30000000000000004"),
    ];
    for (n, expected) in cases {
        assert_eq!(to_string(&realm, &Value::from(n)).unwrap(), JsString::from(expected));
    }
}

#[test]
fn test_integer_wrapping() {
    let realm = Realm::default();
    assert_eq!(to_int32(&realm, &Value::from(4294967296.0 + 5.0)).unwrap(), 5);
    assert_eq!(to_int32(&realm, &Value::from(2147483648.0)).unwrap(), i32::MIN);
    assert_eq!(to_uint32(&realm, &Value::from(-1.0)).unwrap(), u32::MAX);
    assert_eq!(to_uint32(&realm, &Value::from(f64::NAN)).unwrap(), 0);
}

#[test]
fn test_to_primitive_prefers_value_of_for_numbers() {
    let realm = Realm::default();
    let obj = realm.new_object();
    let value_of = realm.new_native_function("valueOf", 0, |_, _, _| Ok(Value::from(7.0)));
    let to_str = realm.new_native_function("toString", 0, |_, _, _| Ok(Value::from("seven")));
    realm.put(&obj, "valueOf", Value::Object(value_of)).unwrap();
    realm.put(&obj, "toString", Value::Object(to_str)).unwrap();
    let obj = Value::Object(obj);
    assert_eq!(to_primitive(&realm, &obj, Some(Hint::Number)).unwrap(), Value::from(7.0));
    assert_eq!(to_primitive(&realm, &obj, Some(Hint::String)).unwrap(), Value::from("seven"));
    assert_eq!(to_string(&realm, &obj).unwrap(), JsString::from("seven"));
    assert_eq!(to_number(&realm, &obj).unwrap(), 7.0);
}

#[test]
fn test_to_object_wraps_primitives() {
    let realm = Realm::default();
    assert_eq!(to_object(&realm, &Value::from("ab")).unwrap().class_name(), "String");
    assert_eq!(to_object(&realm, &Value::from(1.0)).unwrap().class_name(), "Number");
    assert!(to_object(&realm, &Value::Null).unwrap_err().is_type_error());
    assert!(to_object(&realm, &Value::Undefined).unwrap_err().is_type_error());
}
