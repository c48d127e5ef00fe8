//! Integration test suite for the Corten object model
//!
//! These tests drive the runtime only through its public surface: a realm,
//! its global object and the values builtins hand back.

use object_model::{Realm, Value};

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use object_model;
}

/// Look up a global binding, panicking if it is missing
pub fn global(realm: &Realm, name: &str) -> Value {
    realm
        .global_value(name)
        .unwrap_or_else(|e| panic!("global {} unavailable: {}", name, e))
}

/// `JSON.stringify(value)` as a Rust string
pub fn stringify(realm: &Realm, value: &Value) -> String {
    let json = global(realm, "JSON");
    match realm.invoke(&json, "stringify", &[value.clone()]) {
        Ok(Value::String(s)) => s.to_rust_string(),
        other => panic!("stringify produced {:?}", other),
    }
}

/// `JSON.parse(text)`
pub fn parse(realm: &Realm, text: &str) -> Value {
    let json = global(realm, "JSON");
    realm
        .invoke(&json, "parse", &[Value::from(text)])
        .unwrap_or_else(|e| panic!("JSON.parse({}) failed: {}", text, e))
}
