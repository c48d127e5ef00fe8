//! Arguments objects (ES5 10.6).
//!
//! A mapped arguments object shares each of its leading indices with a
//! formal parameter binding owned by the scope layer. Reads and writes
//! through either side are visible on the other until the index is deleted,
//! or redefined as an accessor or as read-only; after that the link is gone
//! for good. Strict-mode arguments objects are created with no mappings.

use std::cell::RefCell;
use std::rc::Rc;

use core_types::PropertyKey;

use super::{reject, JsObject, ObjectKind};
use crate::exception::JsResult;
use crate::property::PropertyDescriptor;
use crate::value::Value;

/// A variable binding shared between a scope and an arguments object
pub type Binding = Rc<RefCell<Value>>;

/// Parameter mappings of an arguments object.
#[derive(Default)]
pub struct ArgumentsData {
    mapped: Vec<Option<Binding>>,
}

impl ArgumentsData {
    pub(crate) fn new(mapped: Vec<Option<Binding>>) -> Self {
        ArgumentsData { mapped }
    }

    /// Whether `index` is still linked to a parameter
    pub fn is_mapped(&self, index: u32) -> bool {
        self.binding(index).is_some()
    }

    pub(crate) fn binding(&self, index: u32) -> Option<&Binding> {
        self.mapped.get(index as usize).and_then(Option::as_ref)
    }

    pub(crate) fn has_mappings(&self) -> bool {
        self.mapped.iter().any(Option::is_some)
    }

    pub(crate) fn unmap(&mut self, index: u32) {
        if let Some(slot) = self.mapped.get_mut(index as usize) {
            *slot = None;
        }
    }

    /// Sever every link, returning the last value seen through each
    pub(crate) fn unmap_all(&mut self) -> Vec<(u32, Value)> {
        self.mapped
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.take().map(|binding| (index as u32, binding.borrow().clone())))
            .collect()
    }
}

fn binding_of(obj: &JsObject, index: u32) -> Option<Binding> {
    match &obj.borrow().kind {
        ObjectKind::Arguments(args) => args.binding(index).cloned(),
        _ => None,
    }
}

fn unmap(obj: &JsObject, index: u32) {
    if let ObjectKind::Arguments(args) = &mut obj.borrow_mut().kind {
        args.unmap(index);
    }
}

pub(crate) fn define_own_property(
    obj: &JsObject,
    key: PropertyKey,
    mut desc: PropertyDescriptor,
    throw: bool,
) -> JsResult<bool> {
    let index = key.as_index();
    let binding = index.and_then(|index| binding_of(obj, index));
    if let Some(binding) = &binding {
        // Freezing a mapped index keeps the value it had through the link.
        if desc.value.is_none() && desc.writable == Some(false) {
            desc.value = Some(binding.borrow().clone());
        }
    }
    if !obj.borrow_mut().ordinary_define(key.clone(), &desc, false)? {
        return reject(throw, || format!("Cannot redefine property: {}", key));
    }
    if let (Some(binding), Some(index)) = (binding, index) {
        if desc.is_accessor_descriptor() {
            unmap(obj, index);
        } else {
            if let Some(value) = &desc.value {
                *binding.borrow_mut() = value.clone();
            }
            if desc.writable == Some(false) {
                unmap(obj, index);
            }
        }
    }
    Ok(true)
}
