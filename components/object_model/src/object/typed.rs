//! Byte buffers and the views over them.
//!
//! An ArrayBuffer owns a [`ByteBuffer`]; every typed array and DataView
//! created over it holds a clone of the same `Rc`, so writes through one
//! view are immediately visible through all the others. Typed-array
//! elements are little-endian; DataView accessors take the byte order per
//! call.

use std::cell::RefCell;
use std::rc::Rc;

use core_types::number::{to_int16, to_int32, to_int8, to_uint16, to_uint32, to_uint8, to_uint8_clamp};

use super::{reject, JsObject, ObjectKind};
use crate::conversions::to_number;
use crate::exception::JsResult;
use crate::property::PropertyDescriptor;
use crate::realm::Realm;
use crate::value::Value;

/// Shared mutable bytes of an ArrayBuffer
pub type ByteBuffer = Rc<RefCell<Vec<u8>>>;

/// Element type of a typed array or DataView accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    Uint8,
    /// 8-bit unsigned integer, clamped on store
    Uint8Clamped,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    Uint16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    Uint32,
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64,
}

impl TypedArrayKind {
    /// Every kind, in constructor installation order
    pub const ALL: [TypedArrayKind; 9] = [
        TypedArrayKind::Int8,
        TypedArrayKind::Uint8,
        TypedArrayKind::Uint8Clamped,
        TypedArrayKind::Int16,
        TypedArrayKind::Uint16,
        TypedArrayKind::Int32,
        TypedArrayKind::Uint32,
        TypedArrayKind::Float32,
        TypedArrayKind::Float64,
    ];

    /// `BYTES_PER_ELEMENT`
    pub fn element_size(self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::Float64 => 8,
        }
    }

    /// Constructor name, which is also the [[Class]]
    pub fn name(self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
        }
    }

    /// Name used by the DataView accessors, e.g. `Int16` in `getInt16`
    pub fn accessor_name(self) -> &'static str {
        match self {
            TypedArrayKind::Uint8Clamped => "Uint8",
            other => other.name().trim_end_matches("Array"),
        }
    }

    /// Decode one element from the first `element_size` bytes
    pub fn read(self, bytes: &[u8], little_endian: bool) -> f64 {
        macro_rules! decode {
            ($ty:ty, $n:expr) => {{
                let mut raw = [0u8; $n];
                raw.copy_from_slice(&bytes[..$n]);
                if little_endian {
                    <$ty>::from_le_bytes(raw)
                } else {
                    <$ty>::from_be_bytes(raw)
                }
            }};
        }
        match self {
            TypedArrayKind::Int8 => f64::from(bytes[0] as i8),
            TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => f64::from(bytes[0]),
            TypedArrayKind::Int16 => f64::from(decode!(i16, 2)),
            TypedArrayKind::Uint16 => f64::from(decode!(u16, 2)),
            TypedArrayKind::Int32 => f64::from(decode!(i32, 4)),
            TypedArrayKind::Uint32 => f64::from(decode!(u32, 4)),
            TypedArrayKind::Float32 => f64::from(decode!(f32, 4)),
            TypedArrayKind::Float64 => decode!(f64, 8),
        }
    }

    /// Encode `n` into the first `element_size` bytes, wrapping or clamping
    /// the way stores into this element type do
    pub fn write(self, bytes: &mut [u8], n: f64, little_endian: bool) {
        macro_rules! encode {
            ($value:expr) => {{
                let value = $value;
                let raw = if little_endian {
                    value.to_le_bytes()
                } else {
                    value.to_be_bytes()
                };
                bytes[..raw.len()].copy_from_slice(&raw);
            }};
        }
        match self {
            TypedArrayKind::Int8 => bytes[0] = to_int8(n) as u8,
            TypedArrayKind::Uint8 => bytes[0] = to_uint8(n),
            TypedArrayKind::Uint8Clamped => bytes[0] = to_uint8_clamp(n),
            TypedArrayKind::Int16 => encode!(to_int16(n)),
            TypedArrayKind::Uint16 => encode!(to_uint16(n)),
            TypedArrayKind::Int32 => encode!(to_int32(n)),
            TypedArrayKind::Uint32 => encode!(to_uint32(n)),
            TypedArrayKind::Float32 => encode!(n as f32),
            TypedArrayKind::Float64 => encode!(n),
        }
    }
}

/// Internal state of a typed array.
pub struct TypedArrayData {
    /// Element type
    pub kind: TypedArrayKind,
    /// The ArrayBuffer object this view was created over
    pub buffer: JsObject,
    pub(crate) bytes: ByteBuffer,
    /// Start of the view within the buffer, a multiple of the element size
    pub byte_offset: usize,
    /// Number of elements
    pub length: usize,
}

impl TypedArrayData {
    pub(crate) fn new(kind: TypedArrayKind, buffer: JsObject, bytes: ByteBuffer, byte_offset: usize, length: usize) -> Self {
        TypedArrayData {
            kind,
            buffer,
            bytes,
            byte_offset,
            length,
        }
    }

    /// Size of the view in bytes
    pub fn byte_length(&self) -> usize {
        self.length * self.kind.element_size()
    }

    fn position(&self, index: u32) -> Option<usize> {
        let index = index as usize;
        (index < self.length).then(|| self.byte_offset + index * self.kind.element_size())
    }

    /// Element at `index`, or `None` past the end
    pub fn get(&self, index: u32) -> Option<f64> {
        let at = self.position(index)?;
        let bytes = self.bytes.borrow();
        Some(self.kind.read(&bytes[at..], true))
    }

    /// Store `n` at `index`; out-of-range stores are dropped
    pub fn set(&self, index: u32, n: f64) {
        if let Some(at) = self.position(index) {
            let mut bytes = self.bytes.borrow_mut();
            self.kind.write(&mut bytes[at..], n, true);
        }
    }
}

/// Internal state of a DataView.
pub struct DataViewData {
    /// The ArrayBuffer object this view was created over
    pub buffer: JsObject,
    pub(crate) bytes: ByteBuffer,
    /// Start of the view within the buffer
    pub byte_offset: usize,
    /// Size of the view in bytes
    pub byte_length: usize,
}

impl DataViewData {
    pub(crate) fn new(buffer: JsObject, bytes: ByteBuffer, byte_offset: usize, byte_length: usize) -> Self {
        DataViewData {
            buffer,
            bytes,
            byte_offset,
            byte_length,
        }
    }

    fn position(&self, kind: TypedArrayKind, offset: usize) -> Option<usize> {
        let end = offset.checked_add(kind.element_size())?;
        (end <= self.byte_length).then_some(self.byte_offset + offset)
    }

    /// Read a `kind` value at `offset`; `None` if it does not fit in the view
    pub fn get_value(&self, kind: TypedArrayKind, offset: usize, little_endian: bool) -> Option<f64> {
        let at = self.position(kind, offset)?;
        let bytes = self.bytes.borrow();
        Some(kind.read(&bytes[at..], little_endian))
    }

    /// Write a `kind` value at `offset`; false if it does not fit in the view
    pub fn set_value(&self, kind: TypedArrayKind, offset: usize, n: f64, little_endian: bool) -> bool {
        match self.position(kind, offset) {
            Some(at) => {
                let mut bytes = self.bytes.borrow_mut();
                kind.write(&mut bytes[at..], n, little_endian);
                true
            }
            None => false,
        }
    }
}

/// [[Put]] of an index on a typed array. The value is converted before the
/// bounds check, so a `valueOf` side effect is observable even when the
/// store is dropped.
pub(crate) fn put_element(obj: &JsObject, realm: &Realm, index: u32, value: &Value) -> JsResult<()> {
    let n = to_number(realm, value)?;
    if let ObjectKind::TypedArray(view) = &obj.borrow().kind {
        view.set(index, n);
    }
    Ok(())
}

/// [[DefineOwnProperty]] of an index on a typed array. Elements are always
/// writable, enumerable and non-configurable; anything else is refused.
pub(crate) fn define_element(
    obj: &JsObject,
    realm: &Realm,
    index: u32,
    desc: PropertyDescriptor,
    throw: bool,
) -> JsResult<bool> {
    let in_range = match &obj.borrow().kind {
        ObjectKind::TypedArray(view) => (index as usize) < view.length,
        _ => false,
    };
    if !in_range {
        return reject(throw, || format!("Index {} is out of range", index));
    }
    if desc.is_accessor_descriptor()
        || desc.configurable == Some(true)
        || desc.enumerable == Some(false)
        || desc.writable == Some(false)
    {
        return reject(throw, || format!("Cannot redefine typed array element {}", index));
    }
    if let Some(value) = &desc.value {
        put_element(obj, realm, index, value)?;
    }
    Ok(true)
}
