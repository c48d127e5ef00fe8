//! JSON scenarios spanning the parser, the serializer and other builtins
//!
//! Covers:
//! - parse followed by stringify reproducing compact input
//! - Property order and number formatting
//! - toJSON on Dates, wrapper unwrapping and typed arrays
//! - Errors surfaced as SyntaxError / TypeError

use integration_tests::{global, parse, stringify};
use object_model::{ErrorKind, Realm, TypedArrayKind, Value};

#[test]
fn test_compact_documents_round_trip() {
    let realm = Realm::default();
    let documents = [
        r#"{"name":"corten","tags":["a","b"],"count":3}"#,
        r#"[1,2.5,-7,1e+21,true,false,null]"#,
        r#"{"z":{"y":{"x":[]}},"a":{}}"#,
        r#""caf\u00e9 \" \\ \n""#,
        r#"{"10":1,"2":2,"b":3}"#,
    ];
    let expected = [
        r#"{"name":"corten","tags":["a","b"],"count":3}"#,
        r#"[1,2.5,-7,1e+21,true,false,null]"#,
        r#"{"z":{"y":{"x":[]}},"a":{}}"#,
        "\"caf\u{e9} \\\" \\\\ \\n\"",
        r#"{"2":2,"10":1,"b":3}"#,
    ];
    for (text, expected) in documents.iter().zip(expected) {
        let value = parse(&realm, text);
        assert_eq!(stringify(&realm, &value), expected, "{}", text);
        // A second pass is stable
        assert_eq!(stringify(&realm, &parse(&realm, expected)), expected);
    }
}

#[test]
fn test_special_numbers_become_null() {
    let realm = Realm::default();
    let arr = realm.new_array(vec![
        Value::from(f64::NAN),
        Value::from(f64::INFINITY),
        Value::from(-0.0),
        Value::from(0.1 + 0.2),
    ]);
    assert_eq!(stringify(&realm, &Value::Object(arr)), "[null,null,0,0.30000000000000004]");
}

#[test]
fn test_builtin_values_serialize() {
    let realm = Realm::default();
    let obj = realm.new_object();
    let date = realm.construct(&global(&realm, "Date"), &[Value::from(0.0)]).unwrap();
    let boxed = realm.construct(&global(&realm, "String"), &[Value::from("s")]).unwrap();
    let bytes = realm.new_typed_array_with_length(TypedArrayKind::Uint8, 2).unwrap();
    realm.put(&bytes, "1", Value::from(300.0)).unwrap();
    let function = global(&realm, "parseInt");

    realm.put(&obj, "date", date).unwrap();
    realm.put(&obj, "boxed", boxed).unwrap();
    realm.put(&obj, "bytes", Value::Object(bytes)).unwrap();
    realm.put(&obj, "skipped", function).unwrap();
    realm.put(&obj, "missing", Value::Undefined).unwrap();

    assert_eq!(
        stringify(&realm, &Value::Object(obj)),
        r#"{"date":"1970-01-01T00:00:00.000Z","boxed":"s","bytes":{"0":0,"1":44}}"#
    );
}

#[test]
fn test_invalid_date_serializes_as_null() {
    let realm = Realm::default();
    let date = realm.construct(&global(&realm, "Date"), &[Value::from(f64::NAN)]).unwrap();
    assert_eq!(stringify(&realm, &date), "null");
}

#[test]
fn test_failures() {
    let realm = Realm::default();
    let json = global(&realm, "JSON");
    for text in ["{'a':1}", "[1,]", "", "01", "{\"a\" 1}"] {
        let err = realm.invoke(&json, "parse", &[Value::from(text)]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::SyntaxError), "{:?}", text);
    }

    let cyclic = realm.new_array(Vec::new());
    realm.put(&cyclic, "0", Value::Object(cyclic.clone())).unwrap();
    let err = realm.invoke(&json, "stringify", &[Value::Object(cyclic)]).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_parsed_values_are_ordinary_objects() {
    let realm = Realm::default();
    let value = parse(&realm, r#"{"list":[1,2,3]}"#);
    let list = realm.get(value.as_object().unwrap(), "list").unwrap();
    assert!(list.as_object().unwrap().is_array());
    realm.invoke(&list, "push", &[Value::from(4.0)]).unwrap();
    assert_eq!(stringify(&realm, &value), r#"{"list":[1,2,3,4]}"#);
}
