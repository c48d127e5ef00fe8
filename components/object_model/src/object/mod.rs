//! Objects and their internal methods.
//!
//! A [`JsObject`] is a shared, interior-mutable handle. Named properties are
//! described by a shared [`PropertyMap`] with the values in a per-object slot
//! vector; array-index properties with default attributes live in an
//! [`ArrayData`]. Index properties with any other attributes are promoted
//! into the map, so a key is always stored in exactly one of the two.
//!
//! The internal methods follow ES5 §8.12. Kinds with exotic behaviour
//! (arrays, string wrappers, arguments objects, typed arrays) are dispatched
//! on [`ObjectKind`] inside the same methods.
//!
//! No method keeps a `RefCell` borrow alive while calling back into script
//! code (getters, setters, `valueOf`).

pub(crate) mod arguments;
pub(crate) mod array;
pub mod typed;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use core_types::{ErrorKind, JsString, PropertyKey};
use tracing::trace;

use crate::array_data::{ArrayData, Backend};
use crate::conversions::{self, Hint};
use crate::exception::{type_error, JsResult};
use crate::function::FunctionData;
use crate::property::{PropertyDescriptor, PropertyFlags, PropertyMap, Slot};
use crate::realm::Realm;
use crate::regexp_engine::RegExpMatcher;
use crate::value::Value;

pub use arguments::{ArgumentsData, Binding};
pub use typed::{ByteBuffer, DataViewData, TypedArrayData, TypedArrayKind};

/// What kind of object this is, with any kind-specific internal state.
pub enum ObjectKind {
    /// A plain object
    Ordinary,
    /// A non-callable singleton such as `JSON`, reported under its own class name
    Namespace(&'static str),
    /// An array; `length` is synthesised from the element storage
    Array {
        /// [[Writable]] of `length`
        length_writable: bool,
    },
    /// A callable object
    Function(FunctionData),
    /// `new Boolean(..)`
    Boolean(bool),
    /// `new Number(..)`
    Number(f64),
    /// `new String(..)`; indices and `length` are synthesised
    String(JsString),
    /// A Date and its time value
    Date(f64),
    /// A RegExp and its compiled pattern
    RegExp(Rc<RegExpMatcher>),
    /// An arguments object
    Arguments(ArgumentsData),
    /// An Error instance
    Error(ErrorKind),
    /// Raw bytes shared by views
    ArrayBuffer(ByteBuffer),
    /// A typed view over an ArrayBuffer
    TypedArray(TypedArrayData),
    /// A DataView over an ArrayBuffer
    DataView(DataViewData),
}

/// Interior state of an object.
pub struct ObjectData {
    pub(crate) map: Rc<PropertyMap>,
    pub(crate) slots: Vec<Slot>,
    pub(crate) elements: ArrayData,
    pub(crate) prototype: Option<JsObject>,
    pub(crate) extensible: bool,
    /// Kind-specific state
    pub kind: ObjectKind,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Exotic {
    None,
    Array,
    String,
    Arguments,
    TypedArray,
}

/// Turn a failed operation into `false`, or into a TypeError when `throw` is set.
pub(crate) fn reject(throw: bool, message: impl FnOnce() -> String) -> JsResult<bool> {
    if throw {
        type_error(message())
    } else {
        Ok(false)
    }
}

/// A shared reference to a JavaScript object.
///
/// Equality is identity.
#[derive(Clone)]
pub struct JsObject(Rc<RefCell<ObjectData>>);

impl PartialEq for JsObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}>", self.class_name())
    }
}

impl JsObject {
    pub(crate) fn from_parts(map: Rc<PropertyMap>, prototype: Option<JsObject>, kind: ObjectKind) -> Self {
        JsObject::with_elements(map, prototype, kind, ArrayData::new())
    }

    pub(crate) fn with_elements(
        map: Rc<PropertyMap>,
        prototype: Option<JsObject>,
        kind: ObjectKind,
        elements: ArrayData,
    ) -> Self {
        JsObject(Rc::new(RefCell::new(ObjectData {
            map,
            slots: Vec::new(),
            elements,
            prototype,
            extensible: true,
            kind,
        })))
    }

    pub(crate) fn borrow(&self) -> Ref<'_, ObjectData> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    /// Whether both handles refer to the same object
    pub fn ptr_eq(&self, other: &JsObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The [[Class]] tag used by `Object.prototype.toString`
    pub fn class_name(&self) -> &'static str {
        match &self.borrow().kind {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Namespace(name) => *name,
            ObjectKind::Array { .. } => "Array",
            ObjectKind::Function(_) => "Function",
            ObjectKind::Boolean(_) => "Boolean",
            ObjectKind::Number(_) => "Number",
            ObjectKind::String(_) => "String",
            ObjectKind::Date(_) => "Date",
            ObjectKind::RegExp(_) => "RegExp",
            ObjectKind::Arguments(_) => "Arguments",
            ObjectKind::Error(_) => "Error",
            ObjectKind::ArrayBuffer(_) => "ArrayBuffer",
            ObjectKind::TypedArray(view) => view.kind.name(),
            ObjectKind::DataView(_) => "DataView",
        }
    }

    /// Whether this object has a [[Call]] internal method
    pub fn is_callable(&self) -> bool {
        matches!(self.borrow().kind, ObjectKind::Function(_))
    }

    /// Whether this is an Array object
    pub fn is_array(&self) -> bool {
        matches!(self.borrow().kind, ObjectKind::Array { .. })
    }

    /// [[Extensible]]
    pub fn is_extensible(&self) -> bool {
        self.borrow().extensible
    }

    /// [[Prototype]]
    pub fn prototype(&self) -> Option<JsObject> {
        self.borrow().prototype.clone()
    }

    /// The shared map describing this object's named properties
    pub fn property_map(&self) -> Rc<PropertyMap> {
        Rc::clone(&self.borrow().map)
    }

    /// The current element storage representation
    pub fn element_backend(&self) -> Backend {
        self.borrow().elements.backend()
    }

    /// `length` of an Array, or the element storage extent of any other object
    pub fn array_length(&self) -> u32 {
        self.borrow().elements.length()
    }

    fn exotic(&self) -> Exotic {
        match &self.borrow().kind {
            ObjectKind::Array { .. } => Exotic::Array,
            ObjectKind::String(_) => Exotic::String,
            ObjectKind::Arguments(_) => Exotic::Arguments,
            ObjectKind::TypedArray(_) => Exotic::TypedArray,
            _ => Exotic::None,
        }
    }

    /// Add or overwrite a property without validation, as builtin setup does.
    pub(crate) fn insert(&self, key: impl Into<PropertyKey>, value: Value, flags: PropertyFlags) {
        self.borrow_mut().store(key.into(), Slot::Data(value), flags);
    }

    /// Add or overwrite an accessor property without validation.
    pub(crate) fn insert_accessor(&self, key: impl Into<PropertyKey>, get: Value, set: Value, flags: PropertyFlags) {
        self.borrow_mut().store(key.into(), Slot::Accessor { get, set }, flags);
    }

    // =========================================================================
    // [[GetOwnProperty]] / [[GetProperty]] / [[Get]]
    // =========================================================================

    /// [[GetOwnProperty]]
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        let data = self.borrow();
        match &data.kind {
            ObjectKind::String(s) => {
                if let Some(desc) = string_own_property(s, key) {
                    return Some(desc);
                }
            }
            ObjectKind::Array { length_writable } if key.is("length") => {
                return Some(PropertyDescriptor::data(
                    Value::from(data.elements.length()),
                    PropertyFlags::data(*length_writable, false, false),
                ));
            }
            ObjectKind::TypedArray(view) => {
                if let Some(index) = key.as_index() {
                    return view
                        .get(index)
                        .map(|n| PropertyDescriptor::data(Value::Number(n), PropertyFlags::data(true, true, false)));
                }
            }
            ObjectKind::Arguments(args) => {
                let mut desc = data.ordinary_own_property(key)?;
                if let Some(binding) = key.as_index().and_then(|index| args.binding(index)) {
                    desc.value = Some(binding.borrow().clone());
                }
                return Some(desc);
            }
            _ => {}
        }
        data.ordinary_own_property(key)
    }

    /// Whether `key` is an own property
    pub fn has_own_property(&self, key: &PropertyKey) -> bool {
        self.get_own_property(key).is_some()
    }

    /// [[GetProperty]]: the first descriptor for `key` along the prototype chain
    pub fn get_property(&self, realm: &Realm, key: &PropertyKey) -> Option<PropertyDescriptor> {
        let max_depth = realm.config().max_prototype_depth;
        let mut current = Some(self.clone());
        let mut depth = 0;
        while let Some(obj) = current {
            if let Some(desc) = obj.get_own_property(key) {
                return Some(desc);
            }
            depth += 1;
            if depth > max_depth {
                trace!(%key, depth, "prototype walk exceeded depth cap");
                return None;
            }
            current = obj.prototype();
        }
        None
    }

    /// [[HasProperty]]
    pub fn has_property(&self, realm: &Realm, key: &PropertyKey) -> bool {
        self.get_property(realm, key).is_some()
    }

    /// [[Get]]
    pub fn get(&self, realm: &Realm, key: &PropertyKey) -> JsResult<Value> {
        self.get_with_receiver(realm, key, &Value::Object(self.clone()))
    }

    /// [[Get]] with getters invoked on `receiver`, which differs from the
    /// holder when a primitive's property is read through its wrapper prototype
    pub fn get_with_receiver(&self, realm: &Realm, key: &PropertyKey, receiver: &Value) -> JsResult<Value> {
        match self.get_property(realm, key) {
            None => Ok(Value::Undefined),
            Some(desc) if desc.is_accessor_descriptor() => match desc.get {
                Some(getter) if getter.is_callable() => realm.call(&getter, receiver.clone(), &[]),
                _ => Ok(Value::Undefined),
            },
            Some(desc) => Ok(desc.value.unwrap_or_default()),
        }
    }

    // =========================================================================
    // [[Put]]
    // =========================================================================

    /// [[CanPut]]
    pub fn can_put(&self, realm: &Realm, key: &PropertyKey) -> bool {
        if let Some(desc) = self.get_own_property(key) {
            return if desc.is_accessor_descriptor() {
                desc.set.map_or(false, |setter| !setter.is_undefined())
            } else {
                desc.writable()
            };
        }
        let inherited = self.prototype().and_then(|proto| proto.get_property(realm, key));
        match inherited {
            None => self.is_extensible(),
            Some(desc) if desc.is_accessor_descriptor() => desc.set.map_or(false, |setter| !setter.is_undefined()),
            Some(desc) => self.is_extensible() && desc.writable(),
        }
    }

    /// [[Put]]: assign through setters, refuse read-only properties, or
    /// create an own data property. Refusals throw only when `strict`.
    pub fn put(&self, realm: &Realm, key: PropertyKey, value: Value, strict: bool) -> JsResult<()> {
        if let Some(index) = key.as_index() {
            match self.exotic() {
                Exotic::TypedArray => return typed::put_element(self, realm, index, &value),
                Exotic::None | Exotic::Array => {
                    let mut data = self.borrow_mut();
                    if data.elements.has(index) && !data.elements.is_frozen() {
                        data.elements.set(index, value);
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        let own = self.get_own_property(&key);
        if let Some(own) = &own {
            if own.is_data_descriptor() {
                if !own.writable() {
                    reject(strict, || format!("Cannot assign to read only property '{}' of {:?}", key, self))?;
                    return Ok(());
                }
                self.define_own_property(realm, key, PropertyDescriptor::value_only(value), strict)?;
                return Ok(());
            }
        }

        let found = match own {
            Some(desc) => Some(desc),
            None => self.prototype().and_then(|proto| proto.get_property(realm, &key)),
        };
        match found {
            Some(desc) if desc.is_accessor_descriptor() => match desc.set {
                Some(setter) if setter.is_callable() => {
                    realm.call(&setter, Value::Object(self.clone()), &[value])?;
                    Ok(())
                }
                _ => {
                    reject(strict, || format!("Cannot set property '{}' of {:?} which has only a getter", key, self))?;
                    Ok(())
                }
            },
            Some(desc) if !desc.writable() => {
                reject(strict, || format!("Cannot assign to read only property '{}' of {:?}", key, self))?;
                Ok(())
            }
            _ => {
                if !self.is_extensible() {
                    reject(strict, || format!("Cannot add property '{}', {:?} is not extensible", key, self))?;
                    return Ok(());
                }
                self.define_own_property(realm, key, PropertyDescriptor::data(value, PropertyFlags::DEFAULT), strict)?;
                Ok(())
            }
        }
    }

    // =========================================================================
    // [[DefineOwnProperty]]
    // =========================================================================

    /// [[DefineOwnProperty]]: returns false, or throws when `throw` is set,
    /// if the change is not allowed.
    pub fn define_own_property(
        &self,
        realm: &Realm,
        key: PropertyKey,
        desc: PropertyDescriptor,
        throw: bool,
    ) -> JsResult<bool> {
        match self.exotic() {
            Exotic::Array => array::define_own_property(self, realm, key, desc, throw),
            Exotic::Arguments => arguments::define_own_property(self, key, desc, throw),
            Exotic::TypedArray => match key.as_index() {
                Some(index) => typed::define_element(self, realm, index, desc, throw),
                None => self.borrow_mut().ordinary_define(key, &desc, throw),
            },
            Exotic::String => {
                let synthesized = match &self.borrow().kind {
                    ObjectKind::String(s) => string_own_property(s, &key),
                    _ => None,
                };
                match synthesized {
                    Some(current) => match validate_property_change(Some(&current), &desc, false) {
                        Ok(()) => Ok(true),
                        Err(message) => reject(throw, || format!("{}: {}", message, key)),
                    },
                    None => self.borrow_mut().ordinary_define(key, &desc, throw),
                }
            }
            Exotic::None => self.borrow_mut().ordinary_define(key, &desc, throw),
        }
    }

    // =========================================================================
    // [[Delete]]
    // =========================================================================

    /// [[Delete]]: non-configurable properties survive; that is a TypeError when `strict`.
    pub fn delete(&self, key: &PropertyKey, strict: bool) -> JsResult<bool> {
        let desc = match self.get_own_property(key) {
            None => return Ok(true),
            Some(desc) => desc,
        };
        if !desc.configurable() {
            return reject(strict, || format!("Cannot delete property '{}' of {:?}", key, self));
        }
        let mut data = self.borrow_mut();
        data.remove(key);
        if let (ObjectKind::Arguments(args), Some(index)) = (&mut data.kind, key.as_index()) {
            args.unmap(index);
        }
        Ok(true)
    }

    // =========================================================================
    // [[DefaultValue]]
    // =========================================================================

    /// [[DefaultValue]] with the given hint; `None` picks String for Dates
    /// and Number for everything else.
    pub fn default_value(&self, realm: &Realm, hint: Option<Hint>) -> JsResult<Value> {
        conversions::default_value(realm, self, hint)
    }

    // =========================================================================
    // Prototype and integrity levels
    // =========================================================================

    /// Replace [[Prototype]]. Fails on non-extensible objects and on
    /// changes that would make the chain cyclic.
    pub fn set_prototype_of(&self, realm: &Realm, prototype: Option<JsObject>) -> bool {
        let current = self.prototype();
        let unchanged = match (&current, &prototype) {
            (None, None) => true,
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        };
        if unchanged {
            return true;
        }
        if !self.is_extensible() {
            return false;
        }
        let max_depth = realm.config().max_prototype_depth;
        let mut cursor = prototype.clone();
        let mut depth = 0;
        while let Some(obj) = cursor {
            if obj.ptr_eq(self) || depth > max_depth {
                trace!(depth, "rejected cyclic prototype chain");
                return false;
            }
            depth += 1;
            cursor = obj.prototype();
        }
        self.borrow_mut().prototype = prototype;
        true
    }

    /// `Object.preventExtensions`
    pub fn prevent_extensions(&self) {
        self.borrow_mut().extensible = false;
    }

    /// `Object.seal`
    pub fn seal(&self) {
        let mut data = self.borrow_mut();
        data.extensible = false;
        data.map = data.map.map_flags(PropertyFlags::sealed);
        data.elements.seal();
    }

    /// `Object.freeze`; typed arrays with elements cannot be frozen.
    pub fn freeze(&self) -> JsResult<()> {
        let mut data = self.borrow_mut();
        if let ObjectKind::TypedArray(view) = &data.kind {
            if view.length > 0 {
                return type_error("Cannot freeze array buffer views with elements");
            }
        }
        data.extensible = false;
        data.map = data.map.map_flags(PropertyFlags::frozen);
        data.elements.freeze();
        let unmapped = match &mut data.kind {
            ObjectKind::Array { length_writable } => {
                *length_writable = false;
                Vec::new()
            }
            ObjectKind::Arguments(args) => args.unmap_all(),
            _ => Vec::new(),
        };
        for (index, value) in unmapped {
            data.overwrite_value(&PropertyKey::Index(index), value);
        }
        Ok(())
    }

    /// `Object.isSealed`
    pub fn is_sealed(&self) -> bool {
        let data = self.borrow();
        !data.extensible
            && data.map.entries().iter().all(|entry| !entry.flags.configurable)
            && (data.elements.count() == 0 || data.elements.is_sealed())
    }

    /// `Object.isFrozen`
    pub fn is_frozen(&self) -> bool {
        if !self.is_sealed() {
            return false;
        }
        let data = self.borrow();
        let props_frozen = data
            .map
            .entries()
            .iter()
            .all(|entry| entry.flags.accessor || !entry.flags.writable);
        let kind_frozen = match &data.kind {
            ObjectKind::Array { length_writable } => !length_writable,
            ObjectKind::TypedArray(view) => view.length == 0,
            ObjectKind::Arguments(args) => !args.has_mappings(),
            _ => true,
        };
        props_frozen && kind_frozen && (data.elements.count() == 0 || data.elements.is_frozen())
    }

    // =========================================================================
    // Key enumeration
    // =========================================================================

    /// Own property names: array indices ascending, then the remaining
    /// names in insertion order.
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        let data = self.borrow();
        let mut indices: Vec<u32> = match &data.kind {
            ObjectKind::String(s) => (0..s.len() as u32).collect(),
            ObjectKind::TypedArray(view) => (0..view.length as u32).collect(),
            _ => Vec::new(),
        };
        indices.extend(data.elements.indices());
        indices.extend(data.map.entries().iter().filter_map(|entry| entry.key.as_index()));
        indices.sort_unstable();
        indices.dedup();

        let mut keys: Vec<PropertyKey> = indices.into_iter().map(PropertyKey::Index).collect();
        if matches!(data.kind, ObjectKind::Array { .. } | ObjectKind::String(_)) {
            keys.push(PropertyKey::from("length"));
        }
        keys.extend(
            data.map
                .entries()
                .iter()
                .filter(|entry| entry.key.as_index().is_none())
                .map(|entry| entry.key.clone()),
        );
        keys
    }

    /// Own enumerable property names, in [`own_keys`](Self::own_keys) order
    pub fn own_enumerable_keys(&self) -> Vec<PropertyKey> {
        self.own_keys()
            .into_iter()
            .filter(|key| self.get_own_property(key).map_or(false, |desc| desc.enumerable()))
            .collect()
    }
}

impl ObjectData {
    /// Own property lookup ignoring exotic behaviour
    pub(crate) fn ordinary_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        if let Some(index) = key.as_index() {
            if let Some(value) = self.elements.get(index) {
                return Some(PropertyDescriptor::data(value, self.elements.element_flags()));
            }
        }
        let (slot, flags) = self.map.find(key)?;
        Some(PropertyDescriptor::from_slot(&self.slots[slot], flags))
    }

    /// ES5 8.12.9 without exotic behaviour
    pub(crate) fn ordinary_define(&mut self, key: PropertyKey, desc: &PropertyDescriptor, throw: bool) -> JsResult<bool> {
        let current = self.ordinary_own_property(&key);
        if let Err(message) = validate_property_change(current.as_ref(), desc, self.extensible) {
            return reject(throw, || format!("{}: {}", message, key));
        }
        let merged = match &current {
            None => desc.clone(),
            Some(current) => merge_descriptor(current, desc),
        };
        self.store(key, merged.to_slot(), merged.flags());
        Ok(true)
    }

    /// Write a property, choosing element storage or the map.
    pub(crate) fn store(&mut self, key: PropertyKey, slot: Slot, flags: PropertyFlags) {
        if let Some(index) = key.as_index() {
            let in_map = self.map.find(&key).is_some();
            let as_element = !in_map && flags == self.elements.element_flags();
            let slot = match slot {
                Slot::Data(value) if as_element => {
                    self.elements.set(index, value);
                    return;
                }
                other => other,
            };
            self.elements.delete(index);
            if index >= self.elements.length() {
                self.elements.set_length(index + 1);
            }
            self.store_named(key, slot, flags);
            return;
        }
        self.store_named(key, slot, flags);
    }

    fn store_named(&mut self, key: PropertyKey, slot: Slot, flags: PropertyFlags) {
        match self.map.find(&key) {
            Some((position, old_flags)) => {
                if old_flags != flags {
                    self.map = self.map.change_flags(&key, flags);
                }
                self.slots[position] = slot;
            }
            None => {
                self.map = self.map.add(key, flags);
                self.slots.push(slot);
            }
        }
    }

    /// Replace the value of an existing data property, keeping its attributes
    pub(crate) fn overwrite_value(&mut self, key: &PropertyKey, value: Value) {
        match self.map.find(key) {
            Some((position, _)) => self.slots[position] = Slot::Data(value),
            None => {
                if let Some(index) = key.as_index() {
                    self.elements.set(index, value);
                }
            }
        }
    }

    /// Remove a property without checking attributes
    pub(crate) fn remove(&mut self, key: &PropertyKey) -> bool {
        if let Some(index) = key.as_index() {
            if self.elements.delete(index) {
                return true;
            }
        }
        match self.map.find(key) {
            Some((position, _)) => {
                self.map = self.map.remove(key);
                self.slots.remove(position);
                true
            }
            None => false,
        }
    }
}

/// Synthesised own properties of a String object
fn string_own_property(s: &JsString, key: &PropertyKey) -> Option<PropertyDescriptor> {
    if key.is("length") {
        return Some(PropertyDescriptor::data(Value::from(s.len()), PropertyFlags::CONSTANT));
    }
    let index = key.as_index()? as usize;
    let unit = s.unit_at(index)?;
    Some(PropertyDescriptor::data(
        Value::String(JsString::from_units(vec![unit])),
        PropertyFlags::data(false, true, false),
    ))
}

/// Steps 1-11 of ES5 8.12.9: may `desc` be applied over `current`?
pub(crate) fn validate_property_change(
    current: Option<&PropertyDescriptor>,
    desc: &PropertyDescriptor,
    extensible: bool,
) -> Result<(), &'static str> {
    let current = match current {
        None if extensible => return Ok(()),
        None => return Err("Cannot define property, object is not extensible"),
        Some(current) => current,
    };
    if desc.is_empty() {
        return Ok(());
    }
    if !current.configurable() {
        if desc.configurable == Some(true) {
            return Err("Cannot redefine property");
        }
        if desc.enumerable.map_or(false, |e| e != current.enumerable()) {
            return Err("Cannot redefine property");
        }
    }
    if desc.is_generic_descriptor() {
        return Ok(());
    }
    if current.is_data_descriptor() != desc.is_data_descriptor() {
        return if current.configurable() {
            Ok(())
        } else {
            Err("Cannot redefine property")
        };
    }
    if current.is_data_descriptor() {
        if !current.configurable() && !current.writable() {
            if desc.writable == Some(true) {
                return Err("Cannot redefine property");
            }
            let current_value = current.value.clone().unwrap_or_default();
            if desc.value.as_ref().map_or(false, |v| !v.same_value(&current_value)) {
                return Err("Cannot redefine property");
            }
        }
        return Ok(());
    }
    if !current.configurable() {
        let current_get = current.get.clone().unwrap_or_default();
        let current_set = current.set.clone().unwrap_or_default();
        if desc.get.as_ref().map_or(false, |g| !g.same_value(&current_get))
            || desc.set.as_ref().map_or(false, |s| !s.same_value(&current_set))
        {
            return Err("Cannot redefine property");
        }
    }
    Ok(())
}

/// Step 12 of ES5 8.12.9: the complete descriptor after applying `desc`
pub(crate) fn merge_descriptor(current: &PropertyDescriptor, desc: &PropertyDescriptor) -> PropertyDescriptor {
    let converting = !desc.is_generic_descriptor() && current.is_data_descriptor() != desc.is_data_descriptor();
    let mut merged = if converting {
        if desc.is_accessor_descriptor() {
            PropertyDescriptor::accessor(
                Value::Undefined,
                Value::Undefined,
                current.enumerable(),
                current.configurable(),
            )
        } else {
            PropertyDescriptor::data(
                Value::Undefined,
                PropertyFlags::data(false, current.enumerable(), current.configurable()),
            )
        }
    } else {
        current.clone()
    };
    if desc.value.is_some() {
        merged.value = desc.value.clone();
    }
    if desc.writable.is_some() {
        merged.writable = desc.writable;
    }
    if desc.get.is_some() {
        merged.get = desc.get.clone();
    }
    if desc.set.is_some() {
        merged.set = desc.set.clone();
    }
    if desc.enumerable.is_some() {
        merged.enumerable = desc.enumerable;
    }
    if desc.configurable.is_some() {
        merged.configurable = desc.configurable;
    }
    merged
}
