//! ArrayBuffer, typed array and DataView scenarios
//!
//! Covers:
//! - Several views aliasing one buffer
//! - Conversions on store for each element kind
//! - DataView byte order against typed array storage
//! - Range and type errors from constructors and accessors

use integration_tests::global;
use object_model::{ErrorKind, Realm, Value};

fn construct(realm: &Realm, name: &str, args: &[Value]) -> Value {
    realm
        .construct(&global(realm, name), args)
        .unwrap_or_else(|e| panic!("new {} failed: {}", name, e))
}

fn element(realm: &Realm, view: &Value, index: &str) -> Value {
    realm.get(view.as_object().unwrap(), index).unwrap()
}

#[test]
fn test_views_alias_one_buffer() {
    let realm = Realm::default();
    let buffer = construct(&realm, "ArrayBuffer", &[Value::from(8.0)]);
    let words = construct(&realm, "Uint32Array", &[buffer.clone()]);
    let bytes = construct(&realm, "Uint8Array", &[buffer.clone(), Value::from(4.0)]);
    let halves = construct(&realm, "Int16Array", &[buffer.clone(), Value::from(2.0), Value::from(1.0)]);

    realm.put(words.as_object().unwrap(), "1", Value::from(0x0403_0201 as f64)).unwrap();
    assert_eq!(element(&realm, &bytes, "0"), Value::from(1.0));
    assert_eq!(element(&realm, &bytes, "3"), Value::from(4.0));

    realm.put(halves.as_object().unwrap(), "0", Value::from(-1.0)).unwrap();
    assert_eq!(element(&realm, &words, "0"), Value::from(0xFFFF_0000u32 as f64));

    assert_eq!(element(&realm, &bytes, "length"), Value::from(4.0));
    assert_eq!(element(&realm, &halves, "byteOffset"), Value::from(2.0));
    let shared = element(&realm, &bytes, "buffer");
    assert!(shared.strict_equals(&buffer));
}

#[test]
fn test_store_conversions() {
    let realm = Realm::default();
    let cases: [(&str, f64, f64); 6] = [
        ("Int8Array", 200.0, -56.0),
        ("Uint8Array", -1.0, 255.0),
        ("Uint8ClampedArray", 300.0, 255.0),
        ("Uint8ClampedArray", 2.5, 2.0),
        ("Int32Array", 4294967297.0, 1.0),
        ("Float32Array", 0.1, f64::from(0.1f32)),
    ];
    for (name, stored, read) in cases {
        let view = construct(&realm, name, &[Value::from(1.0)]);
        realm.put(view.as_object().unwrap(), "0", Value::from(stored)).unwrap();
        assert_eq!(element(&realm, &view, "0"), Value::from(read), "{} <- {}", name, stored);
    }

    let doubles = construct(&realm, "Float64Array", &[Value::from(1.0)]);
    realm.put(doubles.as_object().unwrap(), "0", Value::from("not a number")).unwrap();
    assert!(element(&realm, &doubles, "0").as_number().unwrap().is_nan());
}

#[test]
fn test_out_of_range_indices_are_ignored() {
    let realm = Realm::default();
    let view = construct(&realm, "Int16Array", &[Value::from(2.0)]);
    realm.put(view.as_object().unwrap(), "5", Value::from(1.0)).unwrap();
    assert_eq!(element(&realm, &view, "5"), Value::Undefined);
    assert_eq!(element(&realm, &view, "length"), Value::from(2.0));
}

#[test]
fn test_data_view_byte_order() {
    let realm = Realm::default();
    let buffer = construct(&realm, "ArrayBuffer", &[Value::from(4.0)]);
    let view = construct(&realm, "DataView", &[buffer.clone()]);
    let bytes = construct(&realm, "Uint8Array", &[buffer]);

    realm.invoke(&view, "setUint16", &[Value::from(0.0), Value::from(0x1234 as f64)]).unwrap();
    assert_eq!(element(&realm, &bytes, "0"), Value::from(0x12 as f64));
    realm
        .invoke(&view, "setUint16", &[Value::from(2.0), Value::from(0x1234 as f64), Value::Boolean(true)])
        .unwrap();
    assert_eq!(element(&realm, &bytes, "2"), Value::from(0x34 as f64));

    let big = realm.invoke(&view, "getUint32", &[Value::from(0.0)]).unwrap();
    assert_eq!(big, Value::from(0x1234_3412u32 as f64));

    let err = realm.invoke(&view, "getUint32", &[Value::from(1.0)]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RangeError));
}

#[test]
fn test_constructor_errors() {
    let realm = Realm::default();
    let uint8 = global(&realm, "Uint8Array");
    let err = realm.call(&uint8, Value::Undefined, &[Value::from(1.0)]).unwrap_err();
    assert!(err.is_type_error());

    let buffer = construct(&realm, "ArrayBuffer", &[Value::from(3.0)]);
    let misaligned = realm.construct(&global(&realm, "Int16Array"), &[buffer.clone(), Value::from(1.0)]);
    assert_eq!(misaligned.unwrap_err().kind(), Some(ErrorKind::RangeError));
    let ragged = realm.construct(&global(&realm, "Int16Array"), &[buffer]);
    assert_eq!(ragged.unwrap_err().kind(), Some(ErrorKind::RangeError));

    let negative = realm.construct(&global(&realm, "ArrayBuffer"), &[Value::from(-1.0)]);
    assert_eq!(negative.unwrap_err().kind(), Some(ErrorKind::RangeError));

    let not_buffer = realm.construct(&global(&realm, "DataView"), &[Value::Object(realm.new_object())]);
    assert!(not_buffer.unwrap_err().is_type_error());
}
