//! Contract tests for Array objects and their `length`

use object_model::array_data::Backend;
use object_model::{ErrorKind, PropertyDescriptor, PropertyKey, Realm, Value};

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

#[test]
fn test_length_grows_with_index_writes() {
    let realm = Realm::default();
    let arr = realm.new_array(numbers(&[1.0, 2.0, 3.0]));
    assert_eq!(arr.array_length(), 3);
    realm.put(&arr, "9", Value::from("x")).unwrap();
    assert_eq!(realm.get(&arr, "length").unwrap(), Value::from(10.0));
    assert!(!arr.has_own_property(&PropertyKey::Index(5)));
    assert_eq!(realm.get(&arr, "5").unwrap(), Value::Undefined);

    // Named properties do not affect length
    realm.put(&arr, "foo", Value::Null).unwrap();
    assert_eq!(arr.array_length(), 10);
}

#[test]
fn test_length_truncation_deletes_elements() {
    let realm = Realm::default();
    let arr = realm.new_array(numbers(&[1.0, 2.0, 3.0, 4.0]));
    realm.put(&arr, "length", Value::from(2.0)).unwrap();
    assert_eq!(arr.array_length(), 2);
    assert!(!arr.has_own_property(&PropertyKey::Index(2)));

    realm.put(&arr, "length", Value::from(6.0)).unwrap();
    assert_eq!(arr.array_length(), 6);
    assert_eq!(realm.get(&arr, "1").unwrap(), Value::from(2.0));
    assert_eq!(realm.get(&arr, "3").unwrap(), Value::Undefined);
}

#[test]
fn test_invalid_length_is_range_error() {
    let realm = Realm::default();
    let arr = realm.new_array(Vec::new());
    for bad in [4294967296.0, -1.0, 1.5, f64::NAN] {
        let err = realm.put(&arr, "length", Value::from(bad)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RangeError), "{}", bad);
    }
    realm.put(&arr, "length", Value::from("3")).unwrap();
    assert_eq!(arr.array_length(), 3);
}

#[test]
fn test_index_beyond_max_is_a_named_property() {
    let realm = Realm::default();
    let arr = realm.new_array(Vec::new());
    realm.put(&arr, "4294967295", Value::from(1.0)).unwrap();
    assert_eq!(arr.array_length(), 0);
    assert_eq!(realm.get(&arr, "4294967295").unwrap(), Value::from(1.0));
}

#[test]
fn test_read_only_length_blocks_growth() {
    let realm = Realm::default();
    let arr = realm.new_array(numbers(&[1.0, 2.0, 3.0]));
    let read_only = PropertyDescriptor {
        writable: Some(false),
        ..PropertyDescriptor::default()
    };
    arr.define_own_property(&realm, PropertyKey::from("length"), read_only, true).unwrap();

    let err = realm.invoke(&Value::Object(arr.clone()), "push", &[Value::from(4.0)]).unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(arr.array_length(), 3);
    assert!(!arr.has_own_property(&PropertyKey::Index(3)));

    // Existing elements stay writable
    realm.put(&arr, "0", Value::from(9.0)).unwrap();
    assert_eq!(realm.get(&arr, "0").unwrap(), Value::from(9.0));
}

#[test]
fn test_storage_promotion() {
    let realm = Realm::default();
    let arr = realm.new_array(numbers(&[1.0, 2.0]));
    assert_eq!(arr.element_backend(), Backend::Int);
    realm.put(&arr, "2", Value::from(2.5)).unwrap();
    assert_eq!(arr.element_backend(), Backend::Double);
    realm.put(&arr, "3", Value::from("s")).unwrap();
    assert_eq!(arr.element_backend(), Backend::Object);
    realm.put(&arr, "100000", Value::Boolean(true)).unwrap();
    assert_eq!(arr.element_backend(), Backend::Sparse);

    assert_eq!(arr.array_length(), 100001);
    assert_eq!(realm.get(&arr, "2").unwrap(), Value::from(2.5));
    assert_eq!(realm.get(&arr, "3").unwrap(), Value::from("s"));
    assert_eq!(realm.get(&arr, "100000").unwrap(), Value::Boolean(true));
}

#[test]
fn test_holes_are_not_own_properties() {
    let realm = Realm::default();
    let arr = realm.new_array_with_length(4);
    realm.put(&arr, "2", Value::from(1.0)).unwrap();
    let keys: Vec<String> = arr.own_keys().iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["2", "length"]);

    assert!(arr.delete(&PropertyKey::Index(2), true).unwrap());
    assert_eq!(arr.array_length(), 4);
    assert!(!arr.has_own_property(&PropertyKey::Index(2)));
}

#[test]
fn test_frozen_array() {
    let realm = Realm::default();
    let arr = realm.new_array(numbers(&[1.0]));
    arr.freeze().unwrap();
    assert!(arr.is_frozen());
    realm.put(&arr, "0", Value::from(5.0)).unwrap();
    assert_eq!(realm.get(&arr, "0").unwrap(), Value::from(1.0));
    assert!(arr.put(&realm, PropertyKey::from("length"), Value::from(0.0), true).is_err());
    assert_eq!(arr.array_length(), 1);
}
