//! Contract tests for the standard library installed in every realm

use object_model::{JsString, PropertyKey, Realm, Value};

fn global(realm: &Realm, name: &str) -> Value {
    realm.global_value(name).unwrap()
}

fn class_of(realm: &Realm, value: Value) -> Value {
    let object = global(realm, "Object");
    let proto = realm.get(object.as_object().unwrap(), "prototype").unwrap();
    let to_string = realm.get(proto.as_object().unwrap(), "toString").unwrap();
    realm.call(&to_string, value, &[]).unwrap()
}

fn joined(realm: &Realm, array: &Value) -> Value {
    realm.invoke(array, "join", &[Value::from(",")]).unwrap()
}

fn array_of(realm: &Realm, values: &[f64]) -> Value {
    Value::Object(realm.new_array(values.iter().copied().map(Value::from).collect()))
}

#[test]
fn test_class_names() {
    let realm = Realm::default();
    assert_eq!(class_of(&realm, Value::Null), Value::from("[object Null]"));
    assert_eq!(class_of(&realm, Value::Undefined), Value::from("[object Undefined]"));
    assert_eq!(class_of(&realm, array_of(&realm, &[])), Value::from("[object Array]"));
    assert_eq!(class_of(&realm, global(&realm, "JSON")), Value::from("[object JSON]"));
    assert_eq!(class_of(&realm, global(&realm, "Math")), Value::from("[object Math]"));
    assert_eq!(class_of(&realm, global(&realm, "parseInt")), Value::from("[object Function]"));
    let date = realm.construct(&global(&realm, "Date"), &[Value::from(0.0)]).unwrap();
    assert_eq!(class_of(&realm, date), Value::from("[object Date]"));
    let error = realm.construct(&global(&realm, "RangeError"), &[Value::from("m")]).unwrap();
    assert_eq!(class_of(&realm, error), Value::from("[object Error]"));
}

#[test]
fn test_global_constructors_are_not_enumerable() {
    let realm = Realm::default();
    let enumerable = realm.global().own_enumerable_keys();
    assert!(enumerable.is_empty(), "{:?}", enumerable.iter().map(|k| k.to_string()).collect::<Vec<_>>());
    for name in ["Object", "Function", "Array", "String", "Date", "RegExp", "Error", "JSON", "Math", "encodeURIComponent", "unescape", "Uint8Array"] {
        assert!(realm.global().has_own_property(&PropertyKey::from(name)), "{}", name);
    }
    let nan = realm.global().get_own_property(&PropertyKey::from("NaN")).unwrap();
    assert!(!nan.writable() && !nan.configurable());
}

#[test]
fn test_call_apply_bind() {
    let realm = Realm::default();
    let describe = Value::Object(realm.new_native_function("describe", 2, |realm, this, args| {
        let mut parts = vec![this.clone()];
        parts.extend(args.iter().cloned());
        let list = Value::Object(realm.new_array(parts));
        realm.invoke(&list, "join", &[Value::from("|")])
    }));

    let called = realm.invoke(&describe, "call", &[Value::from("t"), Value::from(1.0), Value::from(2.0)]).unwrap();
    assert_eq!(called, Value::from("t|1|2"));

    let list = array_of(&realm, &[3.0, 4.0]);
    let applied = realm.invoke(&describe, "apply", &[Value::from("t"), list]).unwrap();
    assert_eq!(applied, Value::from("t|3|4"));

    let bound = realm.invoke(&describe, "bind", &[Value::from("b"), Value::from(1.0)]).unwrap();
    assert_eq!(realm.call(&bound, Value::from("ignored"), &[Value::from(2.0)]).unwrap(), Value::from("b|1|2"));
    assert_eq!(realm.get(bound.as_object().unwrap(), "length").unwrap(), Value::from(1.0));

    let not_callable = realm.invoke(&describe, "apply", &[Value::Null, Value::from(1.0)]);
    assert!(not_callable.unwrap_err().is_type_error());
}

#[test]
fn test_array_methods() {
    let realm = Realm::default();
    let arr = array_of(&realm, &[10.0, 9.0, 1.0]);
    realm.invoke(&arr, "sort", &[]).unwrap();
    assert_eq!(joined(&realm, &arr), Value::from("1,10,9"));

    let double = Value::Object(realm.new_native_function("double", 1, |realm, _, args| {
        let n = object_model::conversions::to_number(realm, &args[0])?;
        Ok(Value::from(n * 2.0))
    }));
    let doubled = realm.invoke(&arr, "map", &[double]).unwrap();
    assert_eq!(joined(&realm, &doubled), Value::from("2,20,18"));

    let removed = realm.invoke(&arr, "splice", &[Value::from(1.0), Value::from(1.0), Value::from("a"), Value::from("b")]).unwrap();
    assert_eq!(joined(&realm, &removed), Value::from("10"));
    assert_eq!(joined(&realm, &arr), Value::from("1,a,b,9"));

    let mixed = Value::Object(realm.new_array(vec![Value::Null, Value::Undefined, Value::from("x")]));
    assert_eq!(realm.invoke(&mixed, "join", &[]).unwrap(), Value::from(",,x"));
    assert_eq!(realm.invoke(&mixed, "indexOf", &[Value::from("x")]).unwrap(), Value::from(2.0));
}

#[test]
fn test_string_split_and_replace() {
    let realm = Realm::default();
    let csv = Value::from("a,b,,c");
    let parts = realm.invoke(&csv, "split", &[Value::from(",")]).unwrap();
    assert_eq!(realm.get(parts.as_object().unwrap(), "length").unwrap(), Value::from(4.0));
    assert_eq!(realm.get(parts.as_object().unwrap(), "2").unwrap(), Value::from(""));

    let limited = realm.invoke(&csv, "split", &[Value::from(","), Value::from(2.0)]).unwrap();
    assert_eq!(joined(&realm, &limited), Value::from("a,b"));

    let rx = realm.new_regexp(&JsString::from("(b)"), &JsString::from("g")).unwrap();
    let replaced = realm
        .invoke(&Value::from("abcb"), "replace", &[Value::Object(rx), Value::from("[$1$&]")])
        .unwrap();
    assert_eq!(replaced, Value::from("a[bb]c[bb]"));

    let first_only = realm.invoke(&Value::from("aa"), "replace", &[Value::from("a"), Value::from("b")]).unwrap();
    assert_eq!(first_only, Value::from("ba"));
}

#[test]
fn test_primitive_methods_see_primitive_receiver() {
    let realm = Realm::default();
    assert_eq!(realm.invoke(&Value::from("abc"), "charAt", &[Value::from(1.0)]).unwrap(), Value::from("b"));
    assert_eq!(realm.invoke(&Value::from(255.0), "toString", &[Value::from(16.0)]).unwrap(), Value::from("ff"));
    assert_eq!(realm.invoke(&Value::Boolean(true), "toString", &[]).unwrap(), Value::from("true"));
    assert!(realm.invoke(&Value::Null, "toString", &[]).unwrap_err().is_type_error());
}
