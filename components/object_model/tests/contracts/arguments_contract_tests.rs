//! Contract tests for mapped and unmapped arguments objects

use std::cell::RefCell;
use std::rc::Rc;

use object_model::{Binding, JsObject, PropertyDescriptor, PropertyKey, Realm, Value};

fn callee(realm: &Realm) -> JsObject {
    realm.new_native_function("f", 2, |_, _, _| Ok(Value::Undefined))
}

fn bindings(values: &[Value]) -> Vec<Binding> {
    values.iter().cloned().map(|v| Rc::new(RefCell::new(v))).collect()
}

#[test]
fn test_mapped_indices_track_parameters() {
    let realm = Realm::default();
    let params = bindings(&[Value::from(1.0), Value::from(2.0)]);
    let args = realm.create_arguments(&callee(&realm), &[Value::from(1.0), Value::from(2.0)], &params, false);
    assert_eq!(args.class_name(), "Arguments");
    assert_eq!(realm.get(&args, "length").unwrap(), Value::from(2.0));

    *params[0].borrow_mut() = Value::from("changed");
    assert_eq!(realm.get(&args, "0").unwrap(), Value::from("changed"));

    realm.put(&args, "1", Value::from(20.0)).unwrap();
    assert_eq!(*params[1].borrow(), Value::from(20.0));
}

#[test]
fn test_delete_severs_the_link() {
    let realm = Realm::default();
    let params = bindings(&[Value::from(1.0)]);
    let args = realm.create_arguments(&callee(&realm), &[Value::from(1.0)], &params, false);
    assert!(args.delete(&PropertyKey::Index(0), false).unwrap());
    assert_eq!(realm.get(&args, "0").unwrap(), Value::Undefined);

    realm.put(&args, "0", Value::from(5.0)).unwrap();
    assert_eq!(*params[0].borrow(), Value::from(1.0));
    *params[0].borrow_mut() = Value::from(7.0);
    assert_eq!(realm.get(&args, "0").unwrap(), Value::from(5.0));
}

#[test]
fn test_read_only_redefinition_unmaps() {
    let realm = Realm::default();
    let params = bindings(&[Value::from(1.0)]);
    let args = realm.create_arguments(&callee(&realm), &[Value::from(1.0)], &params, false);
    let desc = PropertyDescriptor {
        value: Some(Value::from(3.0)),
        writable: Some(false),
        ..PropertyDescriptor::default()
    };
    args.define_own_property(&realm, PropertyKey::Index(0), desc, true).unwrap();
    assert_eq!(*params[0].borrow(), Value::from(3.0));
    *params[0].borrow_mut() = Value::from(4.0);
    assert_eq!(realm.get(&args, "0").unwrap(), Value::from(3.0));
}

#[test]
fn test_extra_arguments_are_unmapped() {
    let realm = Realm::default();
    let params = bindings(&[Value::Undefined]);
    let actual = [Value::from(1.0), Value::from(2.0)];
    let args = realm.create_arguments(&callee(&realm), &actual, &params, false);
    realm.put(&args, "1", Value::from(9.0)).unwrap();
    assert_eq!(realm.get(&args, "1").unwrap(), Value::from(9.0));
    assert_eq!(*params[0].borrow(), Value::Undefined);
}

#[test]
fn test_missing_arguments_are_not_mapped() {
    let realm = Realm::default();
    let params = bindings(&[Value::from("a"), Value::from("b")]);
    let args = realm.create_arguments(&callee(&realm), &[Value::from("a")], &params, false);
    assert!(!args.has_own_property(&PropertyKey::Index(1)));
    realm.put(&args, "1", Value::from("x")).unwrap();
    assert_eq!(*params[1].borrow(), Value::from("b"));
}

#[test]
fn test_strict_arguments() {
    let realm = Realm::default();
    let params = bindings(&[Value::from(1.0)]);
    let f = callee(&realm);
    let args = realm.create_arguments(&f, &[Value::from(1.0)], &params, true);
    realm.put(&args, "0", Value::from(2.0)).unwrap();
    assert_eq!(*params[0].borrow(), Value::from(1.0));
    assert!(realm.get(&args, "callee").unwrap_err().is_type_error());
    assert!(realm.get(&args, "caller").unwrap_err().is_type_error());

    let sloppy = realm.create_arguments(&f, &[], &[], false);
    assert_eq!(realm.get(&sloppy, "callee").unwrap(), Value::Object(f));
}
