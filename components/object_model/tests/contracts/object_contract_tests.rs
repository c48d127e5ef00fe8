//! Contract tests for the object internal methods

use object_model::{PropertyDescriptor, PropertyFlags, PropertyKey, Realm, Value};

fn key(name: &str) -> PropertyKey {
    PropertyKey::from(name)
}

#[test]
fn test_inherited_properties_are_visible() {
    let realm = Realm::default();
    let parent = realm.new_object();
    realm.put(&parent, "greeting", Value::from("hi")).unwrap();
    let child = realm.new_object_with_proto(Some(parent.clone()));
    assert_eq!(realm.get(&child, "greeting").unwrap(), Value::from("hi"));
    assert!(child.has_property(&realm, &key("greeting")));
    assert!(!child.has_own_property(&key("greeting")));

    realm.put(&child, "greeting", Value::from("hello")).unwrap();
    assert_eq!(realm.get(&parent, "greeting").unwrap(), Value::from("hi"));
    assert_eq!(realm.get(&child, "greeting").unwrap(), Value::from("hello"));
}

#[test]
fn test_read_only_put_is_silent_or_throws() {
    let realm = Realm::default();
    let obj = realm.new_object();
    let desc = PropertyDescriptor::data(Value::from(1.0), PropertyFlags::data(false, true, true));
    obj.define_own_property(&realm, key("fixed"), desc, true).unwrap();

    obj.put(&realm, key("fixed"), Value::from(2.0), false).unwrap();
    assert_eq!(realm.get(&obj, "fixed").unwrap(), Value::from(1.0));
    let err = obj.put(&realm, key("fixed"), Value::from(2.0), true).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_non_configurable_cannot_be_redefined() {
    let realm = Realm::default();
    let obj = realm.new_object();
    let desc = PropertyDescriptor::data(Value::from(1.0), PropertyFlags::CONSTANT);
    obj.define_own_property(&realm, key("k"), desc, true).unwrap();

    let to_enumerable = PropertyDescriptor {
        enumerable: Some(true),
        ..PropertyDescriptor::default()
    };
    assert!(!obj.define_own_property(&realm, key("k"), to_enumerable.clone(), false).unwrap());
    assert!(obj.define_own_property(&realm, key("k"), to_enumerable, true).unwrap_err().is_type_error());

    let same_value = PropertyDescriptor::value_only(Value::from(1.0));
    assert!(obj.define_own_property(&realm, key("k"), same_value, true).unwrap());
    assert!(obj.delete(&key("k"), true).unwrap_err().is_type_error());
    assert!(!obj.delete(&key("k"), false).unwrap());
}

#[test]
fn test_accessor_receives_receiver() {
    let realm = Realm::default();
    let proto = realm.new_object();
    let getter = realm.new_native_function("get", 0, |realm, this, _| {
        let obj = this.as_object().cloned().unwrap_or_else(|| realm.new_object());
        realm.get(&obj, "name")
    });
    let desc = PropertyDescriptor::accessor(Value::Object(getter), Value::Undefined, false, true);
    proto.define_own_property(&realm, key("greeting"), desc, true).unwrap();

    let obj = realm.new_object_with_proto(Some(proto));
    realm.put(&obj, "name", Value::from("child")).unwrap();
    assert_eq!(realm.get(&obj, "greeting").unwrap(), Value::from("child"));

    // No setter: assignment is rejected and no own property appears
    obj.put(&realm, key("greeting"), Value::from(1.0), false).unwrap();
    assert!(!obj.has_own_property(&key("greeting")));
}

#[test]
fn test_prevent_extensions() {
    let realm = Realm::default();
    let obj = realm.new_object();
    realm.put(&obj, "a", Value::from(1.0)).unwrap();
    obj.prevent_extensions();
    obj.put(&realm, key("b"), Value::from(2.0), false).unwrap();
    assert!(!obj.has_own_property(&key("b")));
    assert!(obj.put(&realm, key("b"), Value::from(2.0), true).is_err());
    realm.put(&obj, "a", Value::from(3.0)).unwrap();
    assert_eq!(realm.get(&obj, "a").unwrap(), Value::from(3.0));
}

#[test]
fn test_seal_and_freeze() {
    let realm = Realm::default();
    let obj = realm.new_object();
    realm.put(&obj, "a", Value::from(1.0)).unwrap();
    obj.seal();
    assert!(obj.is_sealed());
    assert!(!obj.is_frozen());
    realm.put(&obj, "a", Value::from(2.0)).unwrap();
    assert_eq!(realm.get(&obj, "a").unwrap(), Value::from(2.0));
    assert!(!obj.delete(&key("a"), false).unwrap());

    obj.freeze().unwrap();
    assert!(obj.is_frozen());
    realm.put(&obj, "a", Value::from(3.0)).unwrap();
    assert_eq!(realm.get(&obj, "a").unwrap(), Value::from(2.0));
}

#[test]
fn test_own_keys_put_indices_first() {
    let realm = Realm::default();
    let obj = realm.new_object();
    for name in ["b", "10", "a", "2"] {
        realm.put(&obj, name, Value::Null).unwrap();
    }
    let keys: Vec<String> = obj.own_keys().iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["2", "10", "b", "a"]);
}

#[test]
fn test_prototype_cycles_are_refused() {
    let realm = Realm::default();
    let a = realm.new_object();
    let b = realm.new_object_with_proto(Some(a.clone()));
    assert!(!a.set_prototype_of(&realm, Some(b.clone())));
    assert!(b.set_prototype_of(&realm, None));
    assert!(b.prototype().is_none());
}
