//! Array constructor and Array.prototype methods (ES5 15.4)
//!
//! Every method is generic over array-likes and follows the step order of
//! the standard algorithm, so a throwing getter or setter leaves the same
//! partial state behind. Real arrays whose prototype chain carries no
//! indexed properties take backend-level shortcuts for `push`, `pop`,
//! `shift`, `unshift` and `slice`.

use std::cmp::Ordering;

use core_types::{JsString, PropertyKey};

use super::{arg, callable_arg, constructor, length_of, method, relative_index, this_object};
use crate::conversions::{to_integer, to_number, to_object, to_string};
use crate::exception::{range_error, type_error, JsResult};
use crate::object::{JsObject, ObjectKind};
use crate::property::{PropertyDescriptor, PropertyFlags};
use crate::realm::Realm;
use crate::value::Value;

fn key(n: f64) -> PropertyKey {
    PropertyKey::from_number(n)
}

fn has(realm: &Realm, obj: &JsObject, n: f64) -> bool {
    obj.has_property(realm, &key(n))
}

fn get(realm: &Realm, obj: &JsObject, n: f64) -> JsResult<Value> {
    obj.get(realm, &key(n))
}

fn put(realm: &Realm, obj: &JsObject, n: f64, value: Value) -> JsResult<()> {
    obj.put(realm, key(n), value, true)
}

fn delete(obj: &JsObject, n: f64) -> JsResult<()> {
    obj.delete(&key(n), true).map(|_| ())
}

fn put_length(realm: &Realm, obj: &JsObject, len: f64) -> JsResult<()> {
    obj.put(realm, PropertyKey::from("length"), Value::from(len), true)
}

/// Define `obj[n]` as a fresh enumerable data property, as result arrays are built
fn create_data_property(realm: &Realm, obj: &JsObject, n: f64, value: Value) -> JsResult<()> {
    obj.define_own_property(realm, key(n), PropertyDescriptor::data(value, PropertyFlags::DEFAULT), true)
        .map(|_| ())
}

/// Whether `obj` is an extensible Array with writable `length` whose own
/// indexed properties all live in the element storage and whose prototype
/// chain has no indexed properties at all. For such arrays a hole reads as
/// undefined and backend moves are indistinguishable from per-index steps.
fn bulkable(realm: &Realm, obj: &JsObject) -> bool {
    let mut cursor = {
        let data = obj.borrow();
        let eligible = matches!(data.kind, ObjectKind::Array { length_writable: true })
            && data.extensible
            && !data.elements.is_sealed()
            && !data.map.entries().iter().any(|entry| entry.key.as_index().is_some());
        if !eligible {
            return false;
        }
        data.prototype.clone()
    };
    let mut depth = 0;
    while let Some(proto) = cursor {
        let data = proto.borrow();
        let indexed = data.elements.count() > 0
            || data.map.entries().iter().any(|entry| entry.key.as_index().is_some())
            || matches!(
                data.kind,
                ObjectKind::String(_) | ObjectKind::Arguments(_) | ObjectKind::TypedArray(_)
            );
        depth += 1;
        if indexed || depth > realm.config().max_prototype_depth {
            return false;
        }
        cursor = data.prototype.clone();
    }
    true
}

/// Stable merge sort with a fallible comparator
fn merge_sort(
    items: Vec<Value>,
    compare: &mut dyn FnMut(&Value, &Value) -> JsResult<Ordering>,
) -> JsResult<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = merge_sort(left, compare)?;
    let right = merge_sort(right, compare)?;
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut right = right.into_iter().peekable();
    for item in left {
        while let Some(candidate) = right.peek() {
            if compare(candidate, &item)? == Ordering::Less {
                merged.extend(right.next());
            } else {
                break;
            }
        }
        merged.push(item);
    }
    merged.extend(right);
    Ok(merged)
}

/// The Array constructor's own methods
pub struct ArrayConstructor;

impl ArrayConstructor {
    /// Array(...items) / new Array(len)
    pub fn construct(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        if let [Value::Number(n)] = args {
            let len = core_types::number::to_uint32(*n);
            if f64::from(len) != *n {
                return range_error("Invalid array length");
            }
            return Ok(Value::Object(realm.new_array_with_length(len)));
        }
        Ok(Value::Object(realm.new_array(args.to_vec())))
    }

    /// Array.isArray(arg)
    pub fn is_array(_realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::Boolean(arg(args, 0).as_object().map_or(false, JsObject::is_array)))
    }
}

/// Array.prototype methods
pub struct ArrayPrototype;

impl ArrayPrototype {
    /// Array.prototype.toString()
    pub fn to_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let join = obj.get(realm, &PropertyKey::from("join"))?;
        let receiver = Value::Object(obj);
        if join.is_callable() {
            realm.call(&join, receiver, &[])
        } else {
            super::ObjectPrototype::to_string(realm, &receiver, &[])
        }
    }

    /// Array.prototype.toLocaleString()
    pub fn to_locale_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        let mut out: Vec<u16> = Vec::new();
        for k in 0..len {
            if k > 0 {
                out.push(u16::from(b','));
            }
            let element = get(realm, &obj, f64::from(k))?;
            if element.is_nullish() {
                continue;
            }
            let element = Value::Object(to_object(realm, &element)?);
            let text = realm.invoke(&element, "toLocaleString", &[])?;
            out.extend_from_slice(to_string(realm, &text)?.as_units());
        }
        Ok(Value::String(JsString::from_units(out)))
    }

    /// Array.prototype.concat(...items)
    ///
    /// Holes in spread arrays stay holes; the result's `length` counts them.
    pub fn concat(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let first = Value::Object(this_object(realm, this)?);
        let result = realm.new_array(Vec::new());
        let mut n = 0.0;
        for item in std::iter::once(&first).chain(args) {
            match item.as_object().filter(|obj| obj.is_array()) {
                Some(source) => {
                    let len = length_of(realm, source)?;
                    for k in 0..len {
                        let k = f64::from(k);
                        if has(realm, source, k) {
                            let value = get(realm, source, k)?;
                            create_data_property(realm, &result, n + k, value)?;
                        }
                    }
                    n += f64::from(len);
                }
                None => {
                    create_data_property(realm, &result, n, item.clone())?;
                    n += 1.0;
                }
            }
        }
        put_length(realm, &result, n)?;
        Ok(Value::Object(result))
    }

    /// Array.prototype.join(separator)
    pub fn join(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        let separator = match arg(args, 0) {
            Value::Undefined => JsString::from(","),
            other => to_string(realm, &other)?,
        };
        let mut out: Vec<u16> = Vec::new();
        for k in 0..len {
            if k > 0 {
                out.extend_from_slice(separator.as_units());
            }
            let element = get(realm, &obj, f64::from(k))?;
            if !element.is_nullish() {
                out.extend_from_slice(to_string(realm, &element)?.as_units());
            }
        }
        Ok(Value::String(JsString::from_units(out)))
    }

    /// Array.prototype.pop()
    pub fn pop(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        if bulkable(realm, &obj) {
            return Ok(obj.borrow_mut().elements.pop().unwrap_or_default());
        }
        let len = length_of(realm, &obj)?;
        if len == 0 {
            put_length(realm, &obj, 0.0)?;
            return Ok(Value::Undefined);
        }
        let index = f64::from(len - 1);
        let element = get(realm, &obj, index)?;
        delete(&obj, index)?;
        put_length(realm, &obj, index)?;
        Ok(element)
    }

    /// Array.prototype.push(...items)
    pub fn push(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        let fits = u64::from(len) + args.len() as u64 <= u64::from(u32::MAX);
        if fits && bulkable(realm, &obj) {
            let mut data = obj.borrow_mut();
            for value in args {
                data.elements.push(value.clone());
            }
            return Ok(Value::from(data.elements.length()));
        }
        let mut n = f64::from(len);
        for value in args {
            put(realm, &obj, n, value.clone())?;
            n += 1.0;
        }
        put_length(realm, &obj, n)?;
        Ok(Value::from(n))
    }

    /// Array.prototype.reverse()
    pub fn reverse(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        let middle = len / 2;
        let mut lower = 0;
        while lower != middle {
            let upper = f64::from(len - lower - 1);
            let low = f64::from(lower);
            let lower_value = get(realm, &obj, low)?;
            let upper_value = get(realm, &obj, upper)?;
            let lower_exists = has(realm, &obj, low);
            let upper_exists = has(realm, &obj, upper);
            match (lower_exists, upper_exists) {
                (true, true) => {
                    put(realm, &obj, low, upper_value)?;
                    put(realm, &obj, upper, lower_value)?;
                }
                (false, true) => {
                    put(realm, &obj, low, upper_value)?;
                    delete(&obj, upper)?;
                }
                (true, false) => {
                    delete(&obj, low)?;
                    put(realm, &obj, upper, lower_value)?;
                }
                (false, false) => {}
            }
            lower += 1;
        }
        Ok(Value::Object(obj))
    }

    /// Array.prototype.shift()
    pub fn shift(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        if bulkable(realm, &obj) {
            let mut data = obj.borrow_mut();
            if data.elements.length() == 0 {
                return Ok(Value::Undefined);
            }
            let first = data.elements.get(0).unwrap_or_default();
            data.elements.shift_left(1);
            return Ok(first);
        }
        let len = length_of(realm, &obj)?;
        if len == 0 {
            put_length(realm, &obj, 0.0)?;
            return Ok(Value::Undefined);
        }
        let first = get(realm, &obj, 0.0)?;
        for k in 1..len {
            let (from, to) = (f64::from(k), f64::from(k - 1));
            if has(realm, &obj, from) {
                let value = get(realm, &obj, from)?;
                put(realm, &obj, to, value)?;
            } else {
                delete(&obj, to)?;
            }
        }
        delete(&obj, f64::from(len - 1))?;
        put_length(realm, &obj, f64::from(len - 1))?;
        Ok(first)
    }

    /// Array.prototype.slice(start, end)
    pub fn slice(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = f64::from(length_of(realm, &obj)?);
        let start = relative_index(realm, &arg(args, 0), len, 0.0)?;
        let end = relative_index(realm, &arg(args, 1), len, len)?;
        if bulkable(realm, &obj) {
            let elements = obj.borrow().elements.slice(start as u32, end as u32);
            return Ok(Value::Object(realm.array_from_data(elements)));
        }
        let result = realm.new_array(Vec::new());
        let mut n = 0.0;
        let mut k = start;
        while k < end {
            if has(realm, &obj, k) {
                let value = get(realm, &obj, k)?;
                create_data_property(realm, &result, n, value)?;
            }
            k += 1.0;
            n += 1.0;
        }
        put_length(realm, &result, n.max(0.0))?;
        Ok(Value::Object(result))
    }

    /// Array.prototype.sort(comparefn)
    ///
    /// Present values are sorted stably, undefineds follow them and holes
    /// are moved to the end.
    pub fn sort(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let comparefn = arg(args, 0);
        if !comparefn.is_undefined() && !comparefn.is_callable() {
            return type_error("The comparison function must be either a function or undefined");
        }
        let len = length_of(realm, &obj)?;
        let mut values = Vec::new();
        let mut undefined_count = 0u32;
        for k in 0..len {
            let k = f64::from(k);
            if has(realm, &obj, k) {
                match get(realm, &obj, k)? {
                    Value::Undefined => undefined_count += 1,
                    value => values.push(value),
                }
            }
        }

        let mut compare = |x: &Value, y: &Value| -> JsResult<Ordering> {
            if comparefn.is_callable() {
                let result = realm.call(&comparefn, Value::Undefined, &[x.clone(), y.clone()])?;
                let n = to_number(realm, &result)?;
                return Ok(n.partial_cmp(&0.0).unwrap_or(Ordering::Equal));
            }
            Ok(to_string(realm, x)?.cmp(&to_string(realm, y)?))
        };
        let sorted = merge_sort(values, &mut compare)?;

        let present = sorted.len() as u32 + undefined_count;
        for (k, value) in sorted.into_iter().enumerate() {
            put(realm, &obj, k as f64, value)?;
        }
        for k in (present - undefined_count)..present {
            put(realm, &obj, f64::from(k), Value::Undefined)?;
        }
        for k in present..len {
            delete(&obj, f64::from(k))?;
        }
        Ok(Value::Object(obj))
    }

    /// Array.prototype.splice(start, deleteCount, ...items)
    pub fn splice(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = f64::from(length_of(realm, &obj)?);
        let start = relative_index(realm, &arg(args, 0), len, 0.0)?;
        let delete_count = match args.len() {
            0 => 0.0,
            1 => len - start,
            _ => to_integer(realm, &args[1])?.max(0.0).min(len - start),
        };
        let items = args.get(2..).unwrap_or(&[]);
        let item_count = items.len() as f64;

        let removed = realm.new_array(Vec::new());
        let mut k = 0.0;
        while k < delete_count {
            let from = start + k;
            if has(realm, &obj, from) {
                let value = get(realm, &obj, from)?;
                create_data_property(realm, &removed, k, value)?;
            }
            k += 1.0;
        }
        put_length(realm, &removed, delete_count)?;

        if item_count < delete_count {
            let mut k = start;
            while k < len - delete_count {
                let (from, to) = (k + delete_count, k + item_count);
                if has(realm, &obj, from) {
                    let value = get(realm, &obj, from)?;
                    put(realm, &obj, to, value)?;
                } else {
                    delete(&obj, to)?;
                }
                k += 1.0;
            }
            let mut k = len;
            while k > len - delete_count + item_count {
                delete(&obj, k - 1.0)?;
                k -= 1.0;
            }
        } else if item_count > delete_count {
            let mut k = len - delete_count;
            while k > start {
                let (from, to) = (k + delete_count - 1.0, k + item_count - 1.0);
                if has(realm, &obj, from) {
                    let value = get(realm, &obj, from)?;
                    put(realm, &obj, to, value)?;
                } else {
                    delete(&obj, to)?;
                }
                k -= 1.0;
            }
        }
        for (i, item) in items.iter().enumerate() {
            put(realm, &obj, start + i as f64, item.clone())?;
        }
        put_length(realm, &obj, len - delete_count + item_count)?;
        Ok(Value::Object(removed))
    }

    /// Array.prototype.unshift(...items)
    pub fn unshift(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        let count = args.len() as u32;
        let fits = u64::from(len) + args.len() as u64 <= u64::from(u32::MAX);
        if fits && bulkable(realm, &obj) {
            let mut data = obj.borrow_mut();
            data.elements.shift_right(count);
            for (i, value) in args.iter().enumerate() {
                data.elements.set(i as u32, value.clone());
            }
            return Ok(Value::from(data.elements.length()));
        }
        let count = args.len() as f64;
        let mut k = f64::from(len);
        while k > 0.0 {
            let (from, to) = (k - 1.0, k + count - 1.0);
            if has(realm, &obj, from) {
                let value = get(realm, &obj, from)?;
                put(realm, &obj, to, value)?;
            } else {
                delete(&obj, to)?;
            }
            k -= 1.0;
        }
        for (j, value) in args.iter().enumerate() {
            put(realm, &obj, j as f64, value.clone())?;
        }
        let new_len = f64::from(len) + count;
        put_length(realm, &obj, new_len)?;
        Ok(Value::from(new_len))
    }

    /// Array.prototype.indexOf(searchElement, fromIndex)
    pub fn index_of(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = f64::from(length_of(realm, &obj)?);
        if len == 0.0 {
            return Ok(Value::from(-1));
        }
        let target = arg(args, 0);
        let mut k = relative_index(realm, &arg(args, 1), len, 0.0)?;
        while k < len {
            if has(realm, &obj, k) && get(realm, &obj, k)?.strict_equals(&target) {
                return Ok(Value::from(k));
            }
            k += 1.0;
        }
        Ok(Value::from(-1))
    }

    /// Array.prototype.lastIndexOf(searchElement, fromIndex)
    pub fn last_index_of(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = f64::from(length_of(realm, &obj)?);
        if len == 0.0 {
            return Ok(Value::from(-1));
        }
        let target = arg(args, 0);
        let mut k = if args.len() > 1 {
            let n = to_integer(realm, &args[1])?;
            if n >= 0.0 {
                n.min(len - 1.0)
            } else {
                len + n
            }
        } else {
            len - 1.0
        };
        while k >= 0.0 {
            if has(realm, &obj, k) && get(realm, &obj, k)?.strict_equals(&target) {
                return Ok(Value::from(k));
            }
            k -= 1.0;
        }
        Ok(Value::from(-1))
    }

    /// Array.prototype.every(callbackfn, thisArg)
    pub fn every(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let mut result = true;
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        iterate(realm, &obj, len, args, "Array.prototype.every", |verdict, _, _| {
            result = verdict.to_boolean();
            Ok(result)
        })?;
        Ok(Value::Boolean(result))
    }

    /// Array.prototype.some(callbackfn, thisArg)
    pub fn some(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let mut result = false;
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        iterate(realm, &obj, len, args, "Array.prototype.some", |verdict, _, _| {
            result = verdict.to_boolean();
            Ok(!result)
        })?;
        Ok(Value::Boolean(result))
    }

    /// Array.prototype.forEach(callbackfn, thisArg)
    pub fn for_each(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        iterate(realm, &obj, len, args, "Array.prototype.forEach", |_, _, _| Ok(true))?;
        Ok(Value::Undefined)
    }

    /// Array.prototype.map(callbackfn, thisArg)
    pub fn map(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        let result = realm.new_array_with_length(len);
        iterate(realm, &obj, len, args, "Array.prototype.map", |mapped, k, _| {
            create_data_property(realm, &result, k, mapped)?;
            Ok(true)
        })?;
        Ok(Value::Object(result))
    }

    /// Array.prototype.filter(callbackfn, thisArg)
    pub fn filter(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let result = realm.new_array(Vec::new());
        let mut to = 0.0;
        let obj = this_object(realm, this)?;
        let len = length_of(realm, &obj)?;
        iterate(realm, &obj, len, args, "Array.prototype.filter", |selected, _, value| {
            if selected.to_boolean() {
                create_data_property(realm, &result, to, value)?;
                to += 1.0;
            }
            Ok(true)
        })?;
        Ok(Value::Object(result))
    }

    /// Array.prototype.reduce(callbackfn, initialValue)
    pub fn reduce(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        fold(realm, this, args, false)
    }

    /// Array.prototype.reduceRight(callbackfn, initialValue)
    pub fn reduce_right(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        fold(realm, this, args, true)
    }
}

/// The shared loop of every/some/forEach/map/filter: calls `callbackfn` on
/// each present element and hands its result to `step`, which returns
/// whether to keep going.
fn iterate(
    realm: &Realm,
    obj: &JsObject,
    len: u32,
    args: &[Value],
    what: &str,
    mut step: impl FnMut(Value, f64, Value) -> JsResult<bool>,
) -> JsResult<()> {
    let callback = callable_arg(args, 0, what)?;
    let this_arg = arg(args, 1);
    let receiver = Value::Object(obj.clone());
    for k in 0..len {
        let k = f64::from(k);
        if !has(realm, obj, k) {
            continue;
        }
        let value = get(realm, obj, k)?;
        let result = realm.call(&callback, this_arg.clone(), &[value.clone(), Value::from(k), receiver.clone()])?;
        if !step(result, k, value)? {
            break;
        }
    }
    Ok(())
}

fn fold(realm: &Realm, this: &Value, args: &[Value], from_right: bool) -> JsResult<Value> {
    let obj = this_object(realm, this)?;
    let len = length_of(realm, &obj)?;
    let what = if from_right { "Array.prototype.reduceRight" } else { "Array.prototype.reduce" };
    let callback = callable_arg(args, 0, what)?;
    let receiver = Value::Object(obj.clone());
    let order: Box<dyn Iterator<Item = u32>> = if from_right {
        Box::new((0..len).rev())
    } else {
        Box::new(0..len)
    };
    let mut accumulator = if args.len() > 1 { Some(args[1].clone()) } else { None };
    for k in order {
        let k = f64::from(k);
        if !has(realm, &obj, k) {
            continue;
        }
        let value = get(realm, &obj, k)?;
        accumulator = Some(match accumulator {
            None => value,
            Some(previous) => realm.call(
                &callback,
                Value::Undefined,
                &[previous, value, Value::from(k), receiver.clone()],
            )?,
        });
    }
    match accumulator {
        Some(value) => Ok(value),
        None => type_error("Reduce of empty array with no initial value"),
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().array_prototype;
    let ctor = constructor(realm, "Array", 1, ArrayConstructor::construct, ArrayConstructor::construct, proto);
    method(realm, &ctor, "isArray", 1, ArrayConstructor::is_array);

    method(realm, proto, "toString", 0, ArrayPrototype::to_string);
    method(realm, proto, "toLocaleString", 0, ArrayPrototype::to_locale_string);
    method(realm, proto, "concat", 1, ArrayPrototype::concat);
    method(realm, proto, "join", 1, ArrayPrototype::join);
    method(realm, proto, "pop", 0, ArrayPrototype::pop);
    method(realm, proto, "push", 1, ArrayPrototype::push);
    method(realm, proto, "reverse", 0, ArrayPrototype::reverse);
    method(realm, proto, "shift", 0, ArrayPrototype::shift);
    method(realm, proto, "slice", 2, ArrayPrototype::slice);
    method(realm, proto, "sort", 1, ArrayPrototype::sort);
    method(realm, proto, "splice", 2, ArrayPrototype::splice);
    method(realm, proto, "unshift", 1, ArrayPrototype::unshift);
    method(realm, proto, "indexOf", 1, ArrayPrototype::index_of);
    method(realm, proto, "lastIndexOf", 1, ArrayPrototype::last_index_of);
    method(realm, proto, "every", 1, ArrayPrototype::every);
    method(realm, proto, "some", 1, ArrayPrototype::some);
    method(realm, proto, "forEach", 1, ArrayPrototype::for_each);
    method(realm, proto, "map", 1, ArrayPrototype::map);
    method(realm, proto, "filter", 1, ArrayPrototype::filter);
    method(realm, proto, "reduce", 1, ArrayPrototype::reduce);
    method(realm, proto, "reduceRight", 1, ArrayPrototype::reduce_right);
}
