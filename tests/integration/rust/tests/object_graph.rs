//! Object graph scenarios driven through the global constructors
//!
//! Covers:
//! - Property map sharing between similarly built objects
//! - Object.freeze / Object.defineProperty through the Object constructor
//! - Arguments objects shared with parameter bindings
//! - Coercion through user-visible valueOf / toString
//! - Global regular expressions resuming from lastIndex

use std::cell::RefCell;
use std::rc::Rc;

use integration_tests::global;
use object_model::{JsString, PropertyKey, Realm, Value};

fn object_static(realm: &Realm, name: &str, args: &[Value]) -> Value {
    let object = global(realm, "Object");
    realm
        .invoke(&object, name, args)
        .unwrap_or_else(|e| panic!("Object.{} failed: {}", name, e))
}

// =============================================================================
// Property maps
// =============================================================================

#[test]
fn test_constructed_objects_share_maps() {
    let realm = Realm::default();
    let make = |n: f64| {
        let obj = realm.construct(&global(&realm, "Object"), &[]).unwrap();
        let handle = obj.as_object().unwrap().clone();
        realm.put(&handle, "x", Value::from(n)).unwrap();
        realm.put(&handle, "y", Value::from(n)).unwrap();
        handle
    };
    let shapes: Vec<_> = (0..10).map(|n| make(f64::from(n)).property_map()).collect();
    assert!(shapes.windows(2).all(|pair| Rc::ptr_eq(&pair[0], &pair[1])));
}

// =============================================================================
// Integrity levels
// =============================================================================

#[test]
fn test_frozen_object_rejects_every_change() {
    let realm = Realm::default();
    let obj = realm.new_object();
    realm.put(&obj, "a", Value::from(1.0)).unwrap();
    let value = Value::Object(obj.clone());
    object_static(&realm, "freeze", &[value.clone()]);
    assert_eq!(object_static(&realm, "isFrozen", &[value.clone()]), Value::Boolean(true));

    realm.put(&obj, "a", Value::from(2.0)).unwrap();
    realm.put(&obj, "b", Value::from(2.0)).unwrap();
    assert!(!obj.delete(&PropertyKey::from("a"), false).unwrap());
    assert_eq!(realm.get(&obj, "a").unwrap(), Value::from(1.0));
    assert_eq!(realm.get(&obj, "b").unwrap(), Value::Undefined);

    let descriptor = parse_descriptor(&realm, r#"{"value": 3}"#);
    let err = realm
        .invoke(&global(&realm, "Object"), "defineProperty", &[value, Value::from("a"), descriptor])
        .unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_define_property_defaults_to_locked_down() {
    let realm = Realm::default();
    let obj = Value::Object(realm.new_object());
    let descriptor = parse_descriptor(&realm, r#"{"value": 1}"#);
    object_static(&realm, "defineProperty", &[obj.clone(), Value::from("k"), descriptor]);

    let keys = object_static(&realm, "keys", &[obj.clone()]);
    assert_eq!(realm.get(keys.as_object().unwrap(), "length").unwrap(), Value::from(0.0));
    let names = object_static(&realm, "getOwnPropertyNames", &[obj.clone()]);
    assert_eq!(realm.get(names.as_object().unwrap(), "0").unwrap(), Value::from("k"));

    let desc = object_static(&realm, "getOwnPropertyDescriptor", &[obj, Value::from("k")]);
    let desc = desc.as_object().unwrap();
    assert_eq!(realm.get(desc, "writable").unwrap(), Value::Boolean(false));
    assert_eq!(realm.get(desc, "configurable").unwrap(), Value::Boolean(false));
}

fn parse_descriptor(realm: &Realm, text: &str) -> Value {
    integration_tests::parse(realm, text)
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn test_arguments_alias_parameters() {
    let realm = Realm::default();
    let callee = realm.new_native_function("f", 2, |_, _, _| Ok(Value::Undefined));
    let params: Vec<_> = [1.0, 2.0].iter().map(|&n| Rc::new(RefCell::new(Value::from(n)))).collect();
    let args = realm.create_arguments(&callee, &[Value::from(1.0), Value::from(2.0)], &params, false);

    // Array.prototype methods work on the arguments object and write through
    let array_proto = realm.get(global(&realm, "Array").as_object().unwrap(), "prototype").unwrap();
    let reverse = realm.get(array_proto.as_object().unwrap(), "reverse").unwrap();
    realm.call(&reverse, Value::Object(args.clone()), &[]).unwrap();
    assert_eq!(*params[0].borrow(), Value::from(2.0));
    assert_eq!(*params[1].borrow(), Value::from(1.0));

    let object_proto = realm.get(global(&realm, "Object").as_object().unwrap(), "prototype").unwrap();
    let to_string = realm.get(object_proto.as_object().unwrap(), "toString").unwrap();
    let class = realm.call(&to_string, Value::Object(args), &[]).unwrap();
    assert_eq!(class, Value::from("[object Arguments]"));
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn test_coercion_through_user_methods() {
    let realm = Realm::default();
    let obj = realm.new_object();
    let value_of = realm.new_native_function("valueOf", 0, |_, _, _| Ok(Value::from(41.0)));
    realm.put(&obj, "valueOf", Value::Object(value_of)).unwrap();
    let obj = Value::Object(obj);

    let number = realm.call(&global(&realm, "Number"), Value::Undefined, &[obj.clone()]).unwrap();
    assert_eq!(number, Value::from(41.0));
    // toString still comes from Object.prototype
    let string = realm.call(&global(&realm, "String"), Value::Undefined, &[obj.clone()]).unwrap();
    assert_eq!(string, Value::from("[object Object]"));

    // Coercing a primitive result again is a no-op
    let again = realm.call(&global(&realm, "Number"), Value::Undefined, &[number.clone()]).unwrap();
    assert_eq!(again, number);

    let throwing = realm.new_object_with_proto(None);
    let err = realm.call(&global(&realm, "String"), Value::Undefined, &[Value::Object(throwing)]);
    assert!(err.unwrap_err().is_type_error());
}

// =============================================================================
// Regular expressions
// =============================================================================

#[test]
fn test_global_regexp_walks_the_input() {
    let realm = Realm::default();
    let re = realm
        .construct(&global(&realm, "RegExp"), &[Value::from("o(\\w)"), Value::from("g")])
        .unwrap();
    let input = Value::from("foo bob robot");

    let mut found = Vec::new();
    loop {
        let result = realm.invoke(&re, "exec", &[input.clone()]).unwrap();
        let Value::Object(result) = result else { break };
        found.push((realm.get(&result, "index").unwrap(), realm.get(&result, "1").unwrap()));
    }
    assert_eq!(
        found,
        vec![
            (Value::from(1.0), Value::from("o")),
            (Value::from(5.0), Value::from("b")),
            (Value::from(9.0), Value::from("b")),
            (Value::from(11.0), Value::from("t")),
        ]
    );
    assert_eq!(realm.get(re.as_object().unwrap(), "lastIndex").unwrap(), Value::from(0.0));

    let matches = realm.invoke(&input, "match", &[re]).unwrap();
    assert_eq!(realm.invoke(&matches, "join", &[]).unwrap(), Value::from("oo,ob,ob,ot"));

    let source = realm.new_regexp(&JsString::from("a|"), &JsString::from("")).unwrap();
    assert_eq!(realm.get(&source, "source").unwrap(), Value::from("a|"));
}
