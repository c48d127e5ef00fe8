//! Unit tests for realm configuration

use object_model::builtins::DatePrototype;
use object_model::{Realm, RealmConfig, TimeZone, Value};

#[test]
fn test_defaults() {
    let config = RealmConfig::default();
    assert_eq!(config.timezone, TimeZone::Local);
    assert!(!config.strict_by_default);
    assert_eq!(config.max_json_depth, 512);
    assert_eq!(RealmConfig::from_json("{}").unwrap(), config);
    assert_eq!(RealmConfig::from_json(r#"{"max_json_depth": 32}"#).unwrap().max_json_depth, 32);
}

#[test]
fn test_from_json() {
    let config = RealmConfig::from_json(r#"{"timezone": "utc", "strict_by_default": true}"#).unwrap();
    assert_eq!(config.timezone, TimeZone::Utc);
    assert!(config.strict_by_default);
    assert!(RealmConfig::from_json(r#"{"timezone": "mars"}"#).is_err());
    assert!(RealmConfig::from_json("not json").is_err());
}

#[test]
fn test_strict_by_default_changes_put() {
    let strict = Realm::new(RealmConfig {
        strict_by_default: true,
        ..RealmConfig::default()
    });
    let obj = strict.new_object();
    obj.prevent_extensions();
    assert!(strict.put(&obj, "x", Value::Null).unwrap_err().is_type_error());

    let sloppy = Realm::default();
    let obj = sloppy.new_object();
    obj.prevent_extensions();
    assert!(sloppy.put(&obj, "x", Value::Null).is_ok());
}

#[test]
fn test_timezone_drives_local_time() {
    let utc = Realm::new(RealmConfig {
        timezone: TimeZone::Utc,
        ..RealmConfig::default()
    });
    let tokyo = Realm::new(RealmConfig {
        timezone: TimeZone::Fixed(9 * 60),
        ..RealmConfig::default()
    });
    let hours = |realm: &Realm| {
        let date = Value::Object(realm.new_date(0.0));
        DatePrototype::get_hours(realm, &date, &[]).unwrap()
    };
    assert_eq!(hours(&utc), Value::from(0.0));
    assert_eq!(hours(&tokyo), Value::from(9.0));
}

#[test]
fn test_prototype_depth_limit() {
    let realm = Realm::new(RealmConfig {
        max_prototype_depth: 3,
        ..RealmConfig::default()
    });
    let mut chain = realm.new_object_with_proto(None);
    for _ in 0..4 {
        chain = realm.new_object_with_proto(Some(chain));
    }
    let obj = realm.new_object_with_proto(None);
    assert!(!obj.set_prototype_of(&realm, Some(chain)));
}
