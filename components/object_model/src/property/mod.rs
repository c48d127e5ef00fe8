//! Property attributes, storage slots and descriptors.

mod map;

pub use map::{MapEntry, PropertyMap};

use crate::value::Value;

/// Attributes of a named property, plus whether its slot holds an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyFlags {
    /// [[Writable]]; always false for accessors
    pub writable: bool,
    /// [[Enumerable]]
    pub enumerable: bool,
    /// [[Configurable]]
    pub configurable: bool,
    /// Slot holds a getter/setter pair instead of a value
    pub accessor: bool,
}

impl PropertyFlags {
    /// Writable, enumerable, configurable data property
    pub const DEFAULT: PropertyFlags = PropertyFlags::data(true, true, true);
    /// Writable, configurable, non-enumerable; the attributes of builtin methods
    pub const HIDDEN: PropertyFlags = PropertyFlags::data(true, false, true);
    /// Read-only, non-enumerable, non-configurable
    pub const CONSTANT: PropertyFlags = PropertyFlags::data(false, false, false);

    /// Data property attributes
    pub const fn data(writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyFlags {
            writable,
            enumerable,
            configurable,
            accessor: false,
        }
    }

    /// Accessor property attributes
    pub const fn accessor(enumerable: bool, configurable: bool) -> Self {
        PropertyFlags {
            writable: false,
            enumerable,
            configurable,
            accessor: true,
        }
    }

    /// The attributes after `Object.seal`
    pub fn sealed(self) -> Self {
        PropertyFlags {
            configurable: false,
            ..self
        }
    }

    /// The attributes after `Object.freeze`
    pub fn frozen(self) -> Self {
        PropertyFlags {
            configurable: false,
            writable: false,
            ..self
        }
    }
}

/// Per-object storage for one named property.
#[derive(Debug, Clone)]
pub enum Slot {
    /// A data property's value
    Data(Value),
    /// An accessor pair; absent functions are `undefined`
    Accessor {
        /// [[Get]]
        get: Value,
        /// [[Set]]
        set: Value,
    },
}

/// A (possibly partial) property descriptor.
///
/// Fields left as `None` are absent, which matters for
/// `[[DefineOwnProperty]]`: absent fields keep the existing attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// [[Value]]
    pub value: Option<Value>,
    /// [[Writable]]
    pub writable: Option<bool>,
    /// [[Get]]
    pub get: Option<Value>,
    /// [[Set]]
    pub set: Option<Value>,
    /// [[Enumerable]]
    pub enumerable: Option<bool>,
    /// [[Configurable]]
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// A complete data descriptor
    pub fn data(value: Value, flags: PropertyFlags) -> Self {
        PropertyDescriptor {
            value: Some(value),
            writable: Some(flags.writable),
            get: None,
            set: None,
            enumerable: Some(flags.enumerable),
            configurable: Some(flags.configurable),
        }
    }

    /// A complete accessor descriptor
    pub fn accessor(get: Value, set: Value, enumerable: bool, configurable: bool) -> Self {
        PropertyDescriptor {
            value: None,
            writable: None,
            get: Some(get),
            set: Some(set),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    /// A descriptor carrying only `[[Value]]`, as `[[Put]]` issues for existing properties
    pub fn value_only(value: Value) -> Self {
        PropertyDescriptor {
            value: Some(value),
            ..Default::default()
        }
    }

    /// The complete descriptor for a stored slot
    pub fn from_slot(slot: &Slot, flags: PropertyFlags) -> Self {
        match slot {
            Slot::Data(value) => PropertyDescriptor::data(value.clone(), flags),
            Slot::Accessor { get, set } => {
                PropertyDescriptor::accessor(get.clone(), set.clone(), flags.enumerable, flags.configurable)
            }
        }
    }

    /// IsAccessorDescriptor
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    /// IsDataDescriptor
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// IsGenericDescriptor
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    /// Whether every field is absent
    pub fn is_empty(&self) -> bool {
        self == &PropertyDescriptor::default()
    }

    /// [[Enumerable]], absent meaning false
    pub fn enumerable(&self) -> bool {
        self.enumerable.unwrap_or(false)
    }

    /// [[Configurable]], absent meaning false
    pub fn configurable(&self) -> bool {
        self.configurable.unwrap_or(false)
    }

    /// [[Writable]], absent meaning false
    pub fn writable(&self) -> bool {
        self.writable.unwrap_or(false)
    }

    /// The attributes a new property created from this descriptor gets
    pub fn flags(&self) -> PropertyFlags {
        if self.is_accessor_descriptor() {
            PropertyFlags::accessor(self.enumerable(), self.configurable())
        } else {
            PropertyFlags::data(self.writable(), self.enumerable(), self.configurable())
        }
    }

    /// The slot a new property created from this descriptor gets
    pub fn to_slot(&self) -> Slot {
        if self.is_accessor_descriptor() {
            Slot::Accessor {
                get: self.get.clone().unwrap_or_default(),
                set: self.set.clone().unwrap_or_default(),
            }
        } else {
            Slot::Data(self.value.clone().unwrap_or_default())
        }
    }
}
