//! ArrayBuffer, the typed array constructors and DataView.
//!
//! The nine typed array prototypes share one set of methods; each reads the
//! element kind from its receiver. Elements are stored little-endian.

use core_types::PropertyKey;

use super::{arg, constructor, getter, length_of, method, relative_index};
use crate::conversions::{to_integer, to_number};
use crate::exception::{range_error, type_error, JsResult};
use crate::function::NativeFn;
use crate::object::{DataViewData, JsObject, ObjectKind, TypedArrayKind};
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::value::Value;

/// Largest integer a byte offset or length argument may be
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn requires_new(_realm: &Realm, _this: &Value, _args: &[Value]) -> JsResult<Value> {
    type_error("Constructor requires 'new'")
}

/// A non-negative integer argument; undefined is 0
fn index_arg(realm: &Realm, value: &Value, what: &str) -> JsResult<usize> {
    let n = to_integer(realm, value)?;
    if !(0.0..=MAX_SAFE_INTEGER).contains(&n) {
        return range_error(format!("Invalid {}: {}", what, n));
    }
    Ok(n as usize)
}

// =============================================================================
// ArrayBuffer
// =============================================================================

fn buffer_bytes(this: &Value, what: &str) -> JsResult<Vec<u8>> {
    if let Value::Object(obj) = this {
        if let ObjectKind::ArrayBuffer(bytes) = &obj.borrow().kind {
            return Ok(bytes.borrow().clone());
        }
    }
    type_error(format!("{} called on incompatible receiver", what))
}

fn construct_array_buffer(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let length = index_arg(realm, &arg(args, 0), "array buffer length")?;
    Ok(Value::Object(realm.new_array_buffer(length)?))
}

/// ArrayBuffer.prototype methods
pub struct ArrayBufferPrototype;

impl ArrayBufferPrototype {
    /// get ArrayBuffer.prototype.byteLength
    pub fn byte_length(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let bytes = buffer_bytes(this, "ArrayBuffer.prototype.byteLength")?;
        Ok(Value::from(bytes.len()))
    }

    /// ArrayBuffer.prototype.slice(begin, end): a copy, not a view
    pub fn slice(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let bytes = buffer_bytes(this, "ArrayBuffer.prototype.slice")?;
        let len = bytes.len() as f64;
        let begin = relative_index(realm, &arg(args, 0), len, 0.0)? as usize;
        let end = (relative_index(realm, &arg(args, 1), len, len)? as usize).max(begin);
        Ok(Value::Object(realm.array_buffer_from_bytes(bytes[begin..end].to_vec())))
    }
}

// =============================================================================
// Typed arrays
// =============================================================================

/// The fields of a typed array receiver, copied out of its internal state
struct View {
    obj: JsObject,
    kind: TypedArrayKind,
    buffer: JsObject,
    byte_offset: usize,
    length: usize,
}

fn this_view(this: &Value, what: &str) -> JsResult<View> {
    if let Value::Object(obj) = this {
        if let ObjectKind::TypedArray(view) = &obj.borrow().kind {
            return Ok(View {
                obj: obj.clone(),
                kind: view.kind,
                buffer: view.buffer.clone(),
                byte_offset: view.byte_offset,
                length: view.length,
            });
        }
    }
    type_error(format!("{} called on incompatible receiver", what))
}

/// The elements of `obj` if it is a typed array
fn typed_elements(obj: &JsObject) -> Option<Vec<f64>> {
    match &obj.borrow().kind {
        ObjectKind::TypedArray(view) => Some((0..view.length as u32).filter_map(|i| view.get(i)).collect()),
        _ => None,
    }
}

/// Read `len` elements of an array-like through [[Get]] and ToNumber
fn array_like_elements(realm: &Realm, obj: &JsObject, len: u32) -> JsResult<Vec<f64>> {
    (0..len)
        .map(|i| to_number(realm, &obj.get(realm, &PropertyKey::from(i))?))
        .collect()
}

fn store_elements(target: &JsObject, start: usize, values: &[f64]) {
    if let ObjectKind::TypedArray(view) = &target.borrow().kind {
        for (i, n) in values.iter().enumerate() {
            view.set((start + i) as u32, *n);
        }
    }
}

fn construct_typed_array(realm: &Realm, kind: TypedArrayKind, args: &[Value]) -> JsResult<Value> {
    let source = match arg(args, 0) {
        Value::Object(source) => source,
        other => {
            let length = index_arg(realm, &other, "typed array length")?;
            return Ok(Value::Object(realm.new_typed_array_with_length(kind, length)?));
        }
    };

    let is_buffer = matches!(source.borrow().kind, ObjectKind::ArrayBuffer(_));
    if is_buffer {
        let byte_offset = index_arg(realm, &arg(args, 1), "typed array offset")?;
        let length = match arg(args, 2) {
            Value::Undefined => None,
            value => Some(index_arg(realm, &value, "typed array length")?),
        };
        return Ok(Value::Object(realm.new_typed_array(kind, &source, byte_offset, length)?));
    }

    if let Some(values) = typed_elements(&source) {
        let target = realm.new_typed_array_with_length(kind, values.len())?;
        store_elements(&target, 0, &values);
        return Ok(Value::Object(target));
    }
    let len = length_of(realm, &source)?;
    let target = realm.new_typed_array_with_length(kind, len as usize)?;
    let values = array_like_elements(realm, &source, len)?;
    store_elements(&target, 0, &values);
    Ok(Value::Object(target))
}

macro_rules! typed_array_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            fn $name(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
                construct_typed_array(realm, TypedArrayKind::$kind, args)
            }
        )*

        const TYPED_ARRAY_CONSTRUCTORS: [(TypedArrayKind, NativeFn); 9] = [$((TypedArrayKind::$kind, $name)),*];
    };
}

typed_array_constructors! {
    construct_int8 => Int8,
    construct_uint8 => Uint8,
    construct_uint8_clamped => Uint8Clamped,
    construct_int16 => Int16,
    construct_uint16 => Uint16,
    construct_int32 => Int32,
    construct_uint32 => Uint32,
    construct_float32 => Float32,
    construct_float64 => Float64,
}

/// Methods shared by the nine typed array prototypes
pub struct TypedArrayPrototype;

impl TypedArrayPrototype {
    /// get length
    pub fn length(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(this_view(this, "length")?.length))
    }

    /// get byteLength
    pub fn byte_length(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let view = this_view(this, "byteLength")?;
        Ok(Value::from(view.length * view.kind.element_size()))
    }

    /// get byteOffset
    pub fn byte_offset(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(this_view(this, "byteOffset")?.byte_offset))
    }

    /// get buffer
    pub fn buffer(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::Object(this_view(this, "buffer")?.buffer))
    }

    /// subarray(begin, end): a new view over the same buffer
    pub fn subarray(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let view = this_view(this, "subarray")?;
        let len = view.length as f64;
        let begin = relative_index(realm, &arg(args, 0), len, 0.0)? as usize;
        let end = (relative_index(realm, &arg(args, 1), len, len)? as usize).max(begin);
        let byte_offset = view.byte_offset + begin * view.kind.element_size();
        let sub = realm.new_typed_array(view.kind, &view.buffer, byte_offset, Some(end - begin))?;
        Ok(Value::Object(sub))
    }

    /// set(array, offset): copy a typed array or array-like into this one.
    /// A source sharing this buffer is read completely before any write.
    pub fn set(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let view = this_view(this, "set")?;
        let Value::Object(source) = arg(args, 0) else {
            return type_error("Invalid argument to set: expected an array or typed array");
        };
        let offset = to_integer(realm, &arg(args, 1))?;
        let copied = typed_elements(&source);
        let source_len = match &copied {
            Some(values) => values.len() as f64,
            None => f64::from(length_of(realm, &source)?),
        };
        if offset < 0.0 || offset + source_len > view.length as f64 {
            return type_error("Source is too large for the target offset");
        }
        let values = match copied {
            Some(values) => values,
            None => array_like_elements(realm, &source, source_len as u32)?,
        };
        store_elements(&view.obj, offset as usize, &values);
        Ok(Value::Undefined)
    }
}

// =============================================================================
// DataView
// =============================================================================

fn construct_data_view(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let buffer = match arg(args, 0) {
        Value::Object(obj) if matches!(obj.borrow().kind, ObjectKind::ArrayBuffer(_)) => obj,
        other => return type_error(format!("First argument to DataView constructor must be an ArrayBuffer, got {:?}", other)),
    };
    let byte_offset = index_arg(realm, &arg(args, 1), "DataView offset")?;
    let byte_length = match arg(args, 2) {
        Value::Undefined => None,
        value => Some(index_arg(realm, &value, "DataView length")?),
    };
    Ok(Value::Object(realm.new_data_view(&buffer, byte_offset, byte_length)?))
}

fn with_data_view<T>(this: &Value, what: &str, f: impl FnOnce(&DataViewData) -> T) -> JsResult<T> {
    if let Value::Object(obj) = this {
        if let ObjectKind::DataView(view) = &obj.borrow().kind {
            return Ok(f(view));
        }
    }
    type_error(format!("{} called on incompatible receiver", what))
}

fn data_view_get(realm: &Realm, this: &Value, args: &[Value], kind: TypedArrayKind) -> JsResult<Value> {
    let what = format!("DataView.prototype.get{}", kind.accessor_name());
    with_data_view(this, &what, |_| ())?;
    let offset = index_arg(realm, &arg(args, 0), "DataView offset")?;
    let little_endian = arg(args, 1).to_boolean();
    match with_data_view(this, &what, |view| view.get_value(kind, offset, little_endian))? {
        Some(n) => Ok(Value::from(n)),
        None => range_error("Offset is outside the bounds of the DataView"),
    }
}

fn data_view_set(realm: &Realm, this: &Value, args: &[Value], kind: TypedArrayKind) -> JsResult<Value> {
    let what = format!("DataView.prototype.set{}", kind.accessor_name());
    with_data_view(this, &what, |_| ())?;
    let offset = index_arg(realm, &arg(args, 0), "DataView offset")?;
    let n = to_number(realm, &arg(args, 1))?;
    let little_endian = arg(args, 2).to_boolean();
    if !with_data_view(this, &what, |view| view.set_value(kind, offset, n, little_endian))? {
        return range_error("Offset is outside the bounds of the DataView");
    }
    Ok(Value::Undefined)
}

/// DataView.prototype methods
pub struct DataViewPrototype;

macro_rules! data_view_accessors {
    ($($kind:ident: $get:ident, $set:ident;)*) => {
        impl DataViewPrototype {
            $(
                #[doc = concat!("DataView.prototype.get", stringify!($kind), "(byteOffset, littleEndian)")]
                pub fn $get(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
                    data_view_get(realm, this, args, TypedArrayKind::$kind)
                }

                #[doc = concat!("DataView.prototype.set", stringify!($kind), "(byteOffset, value, littleEndian)")]
                pub fn $set(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
                    data_view_set(realm, this, args, TypedArrayKind::$kind)
                }
            )*
        }

        const DATA_VIEW_ACCESSORS: [(TypedArrayKind, NativeFn, NativeFn); 8] =
            [$((TypedArrayKind::$kind, DataViewPrototype::$get, DataViewPrototype::$set)),*];
    };
}

data_view_accessors! {
    Int8: get_int8, set_int8;
    Uint8: get_uint8, set_uint8;
    Int16: get_int16, set_int16;
    Uint16: get_uint16, set_uint16;
    Int32: get_int32, set_int32;
    Uint32: get_uint32, set_uint32;
    Float32: get_float32, set_float32;
    Float64: get_float64, set_float64;
}

impl DataViewPrototype {
    /// get DataView.prototype.buffer
    pub fn buffer(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        with_data_view(this, "DataView.prototype.buffer", |view| Value::Object(view.buffer.clone()))
    }

    /// get DataView.prototype.byteLength
    pub fn byte_length(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        with_data_view(this, "DataView.prototype.byteLength", |view| Value::from(view.byte_length))
    }

    /// get DataView.prototype.byteOffset
    pub fn byte_offset(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        with_data_view(this, "DataView.prototype.byteOffset", |view| Value::from(view.byte_offset))
    }
}

pub(crate) fn install(realm: &Realm) {
    let intrinsics = realm.intrinsics();

    let buffer_proto = &intrinsics.array_buffer_prototype;
    constructor(realm, "ArrayBuffer", 1, requires_new, construct_array_buffer, buffer_proto);
    getter(realm, buffer_proto, "byteLength", ArrayBufferPrototype::byte_length);
    method(realm, buffer_proto, "slice", 2, ArrayBufferPrototype::slice);

    for (kind, construct) in TYPED_ARRAY_CONSTRUCTORS {
        let proto = intrinsics.typed_array_prototype(kind);
        let ctor = constructor(realm, kind.name(), 3, requires_new, construct, proto);
        let size = Value::from(kind.element_size());
        ctor.insert("BYTES_PER_ELEMENT", size.clone(), PropertyFlags::CONSTANT);
        proto.insert("BYTES_PER_ELEMENT", size, PropertyFlags::CONSTANT);
        getter(realm, proto, "length", TypedArrayPrototype::length);
        getter(realm, proto, "byteLength", TypedArrayPrototype::byte_length);
        getter(realm, proto, "byteOffset", TypedArrayPrototype::byte_offset);
        getter(realm, proto, "buffer", TypedArrayPrototype::buffer);
        method(realm, proto, "subarray", 2, TypedArrayPrototype::subarray);
        method(realm, proto, "set", 2, TypedArrayPrototype::set);
    }

    let view_proto = &intrinsics.data_view_prototype;
    constructor(realm, "DataView", 3, requires_new, construct_data_view, view_proto);
    getter(realm, view_proto, "buffer", DataViewPrototype::buffer);
    getter(realm, view_proto, "byteLength", DataViewPrototype::byte_length);
    getter(realm, view_proto, "byteOffset", DataViewPrototype::byte_offset);
    for (kind, get, set) in DATA_VIEW_ACCESSORS {
        method(realm, view_proto, &format!("get{}", kind.accessor_name()), 1, get);
        method(realm, view_proto, &format!("set{}", kind.accessor_name()), 2, set);
    }
}
