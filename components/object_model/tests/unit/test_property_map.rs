//! Unit tests for shared property maps

use std::rc::Rc;

use object_model::property::PropertyMap;
use object_model::{PropertyFlags, PropertyKey, Realm, Value};

#[test]
fn test_objects_built_alike_share_a_map() {
    let realm = Realm::default();
    let build = |x: f64| {
        let obj = realm.new_object();
        realm.put(&obj, "x", Value::from(x)).unwrap();
        realm.put(&obj, "y", Value::from(x + 1.0)).unwrap();
        obj
    };
    let a = build(1.0);
    let b = build(10.0);
    assert!(Rc::ptr_eq(&a.property_map(), &b.property_map()));
    assert_eq!(realm.get(&b, "y").unwrap(), Value::from(11.0));

    // Diverging in attributes gives a different map
    b.freeze().unwrap();
    assert!(!Rc::ptr_eq(&a.property_map(), &b.property_map()));
    assert_eq!(realm.get(&b, "x").unwrap(), Value::from(10.0));
}

#[test]
fn test_order_matters() {
    let realm = Realm::default();
    let a = realm.new_object();
    let b = realm.new_object();
    realm.put(&a, "x", Value::Null).unwrap();
    realm.put(&a, "y", Value::Null).unwrap();
    realm.put(&b, "y", Value::Null).unwrap();
    realm.put(&b, "x", Value::Null).unwrap();
    assert!(!Rc::ptr_eq(&a.property_map(), &b.property_map()));
}

#[test]
fn test_remove_renumbers_slots() {
    let root = PropertyMap::root();
    let map = root
        .add("a".into(), PropertyFlags::DEFAULT)
        .add("b".into(), PropertyFlags::DEFAULT)
        .add("c".into(), PropertyFlags::DEFAULT);
    let removed = map.remove(&PropertyKey::from("a"));
    assert_eq!(removed.len(), 2);
    assert_eq!(removed.find(&PropertyKey::from("c")), Some((1, PropertyFlags::DEFAULT)));
    assert!(removed.find(&PropertyKey::from("a")).is_none());
    assert!(Rc::ptr_eq(&removed, &map.remove(&PropertyKey::from("a"))));
}

#[test]
fn test_deleted_property_values_stay_aligned() {
    let realm = Realm::default();
    let obj = realm.new_object();
    for (name, n) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
        realm.put(&obj, name, Value::from(n)).unwrap();
    }
    obj.delete(&PropertyKey::from("b"), true).unwrap();
    assert_eq!(realm.get(&obj, "a").unwrap(), Value::from(1.0));
    assert_eq!(realm.get(&obj, "c").unwrap(), Value::from(3.0));
    realm.put(&obj, "b", Value::from(4.0)).unwrap();
    let keys: Vec<String> = obj.own_keys().iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["a", "c", "b"]);
}

#[test]
fn test_change_flags_keeps_position() {
    let root = PropertyMap::root();
    let map = root.add("a".into(), PropertyFlags::DEFAULT).add("b".into(), PropertyFlags::DEFAULT);
    let changed = map.change_flags(&PropertyKey::from("a"), PropertyFlags::HIDDEN);
    assert_eq!(changed.find(&PropertyKey::from("a")), Some((0, PropertyFlags::HIDDEN)));
    assert!(Rc::ptr_eq(&changed.change_flags(&PropertyKey::from("a"), PropertyFlags::HIDDEN), &changed));
}
