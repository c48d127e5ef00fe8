//! Array exotic [[DefineOwnProperty]] (ES5 15.4.5.1).
//!
//! `length` is not stored as a property: it is the extent of the element
//! storage plus a writability flag on the kind. Index definitions past the
//! end grow it; shrinking it deletes from the top down and stops at the
//! first element that refuses to go.

use core_types::PropertyKey;

use super::{reject, validate_property_change, JsObject, ObjectKind};
use crate::conversions::{to_number, to_uint32};
use crate::exception::{range_error, JsResult};
use crate::property::{PropertyDescriptor, PropertyFlags};
use crate::realm::Realm;
use crate::value::Value;

fn length_state(obj: &JsObject) -> (u32, bool) {
    let data = obj.borrow();
    let writable = matches!(data.kind, ObjectKind::Array { length_writable: true });
    (data.elements.length(), writable)
}

fn set_length_writable(obj: &JsObject, writable: bool) {
    if let ObjectKind::Array { length_writable } = &mut obj.borrow_mut().kind {
        *length_writable = writable;
    }
}

pub(crate) fn define_own_property(
    obj: &JsObject,
    realm: &Realm,
    key: PropertyKey,
    desc: PropertyDescriptor,
    throw: bool,
) -> JsResult<bool> {
    if key.is("length") {
        return define_length(obj, realm, desc, throw);
    }
    if let Some(index) = key.as_index() {
        let (old_len, length_writable) = length_state(obj);
        if index >= old_len && !length_writable {
            return reject(throw, || format!("Cannot add element {}, array length is read-only", index));
        }
        if !obj.borrow_mut().ordinary_define(key, &desc, false)? {
            return reject(throw, || format!("Cannot redefine array element {}", index));
        }
        return Ok(true);
    }
    obj.borrow_mut().ordinary_define(key, &desc, throw)
}

fn define_length(obj: &JsObject, realm: &Realm, desc: PropertyDescriptor, throw: bool) -> JsResult<bool> {
    let new_len = match &desc.value {
        None => None,
        Some(value) => {
            let len = to_uint32(realm, value)?;
            if f64::from(len) != to_number(realm, value)? {
                return range_error("Invalid array length");
            }
            Some(len)
        }
    };

    let (old_len, length_writable) = length_state(obj);
    let current = PropertyDescriptor::data(
        Value::from(old_len),
        PropertyFlags::data(length_writable, false, false),
    );
    let mut checked = desc.clone();
    if let Some(len) = new_len {
        checked.value = Some(Value::from(len));
    }

    let new_len = match new_len {
        Some(len) if len < old_len => len,
        _ => {
            if let Err(message) = validate_property_change(Some(&current), &checked, false) {
                return reject(throw, || format!("{}: length", message));
            }
            if let Some(len) = new_len {
                obj.borrow_mut().elements.set_length(len);
            }
            if desc.writable == Some(false) {
                set_length_writable(obj, false);
            }
            return Ok(true);
        }
    };

    if !length_writable {
        return reject(throw, || "Cannot assign to read only property 'length'".to_string());
    }
    checked.writable = None;
    if let Err(message) = validate_property_change(Some(&current), &checked, false) {
        return reject(throw, || format!("{}: length", message));
    }
    let new_writable = desc.writable != Some(false);

    let stuck_at = truncate(obj, new_len);
    if !new_writable {
        set_length_writable(obj, false);
    }
    match stuck_at {
        None => Ok(true),
        Some(index) => reject(throw, || format!("Cannot delete array element {}", index)),
    }
}

/// Delete elements at or past `new_len`, highest first. Returns the index of
/// the non-configurable element that stopped the truncation, if any.
fn truncate(obj: &JsObject, new_len: u32) -> Option<u32> {
    let mut data = obj.borrow_mut();
    let old_len = data.elements.length();
    let mut doomed: Vec<(u32, bool)> = data
        .map
        .entries()
        .iter()
        .filter_map(|entry| {
            entry
                .key
                .as_index()
                .filter(|&index| index >= new_len)
                .map(|index| (index, entry.flags.configurable))
        })
        .collect();

    if doomed.is_empty() && !data.elements.is_sealed() {
        data.elements.set_length(new_len);
        return None;
    }

    let elements_configurable = !data.elements.is_sealed();
    doomed.extend(
        data.elements
            .indices_in_range_desc(new_len, old_len)
            .into_iter()
            .map(|index| (index, elements_configurable)),
    );
    doomed.sort_unstable_by(|a, b| b.0.cmp(&a.0));

    for (index, configurable) in doomed {
        if !configurable {
            data.elements.set_length(index + 1);
            return Some(index);
        }
        data.remove(&PropertyKey::Index(index));
    }
    data.elements.set_length(new_len);
    None
}
