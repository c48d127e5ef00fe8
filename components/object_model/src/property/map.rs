//! Shared property maps.
//!
//! A [`PropertyMap`] describes the set, order and attributes of an object's
//! named properties. Maps are immutable: adding, removing or reconfiguring a
//! property yields another map. Each map caches its outgoing transitions, so
//! objects that gain the same properties in the same order end up holding
//! the very same `Rc<PropertyMap>`. Property values live in the owning
//! object's slot vector, at the position the map assigns.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use core_types::PropertyKey;
use tracing::trace;

use super::PropertyFlags;

/// Dead transition entries are swept once a cache grows past this size.
const TRANSITION_SWEEP_THRESHOLD: usize = 64;

/// One property as recorded in a map
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Property name
    pub key: PropertyKey,
    /// Attributes and slot kind
    pub flags: PropertyFlags,
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum Transition {
    Add(PropertyKey, PropertyFlags),
    Remove(PropertyKey),
    Change(PropertyKey, PropertyFlags),
}

/// An immutable, shareable description of an object's named properties.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use object_model::property::{PropertyFlags, PropertyMap};
///
/// let root = PropertyMap::root();
/// let a = root.add("x".into(), PropertyFlags::DEFAULT);
/// let b = root.add("x".into(), PropertyFlags::DEFAULT);
/// assert!(Rc::ptr_eq(&a, &b));
/// assert_eq!(a.find(&"x".into()).map(|(slot, _)| slot), Some(0));
/// ```
pub struct PropertyMap {
    entries: Vec<MapEntry>,
    lookup: HashMap<PropertyKey, usize>,
    transitions: RefCell<HashMap<Transition, Weak<PropertyMap>>>,
}

impl PropertyMap {
    /// A fresh map with no properties and no cached transitions
    pub fn root() -> Rc<Self> {
        Rc::new(PropertyMap {
            entries: Vec::new(),
            lookup: HashMap::new(),
            transitions: RefCell::new(HashMap::new()),
        })
    }

    fn from_entries(entries: Vec<MapEntry>) -> Self {
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.key.clone(), slot))
            .collect();
        PropertyMap {
            entries,
            lookup,
            transitions: RefCell::new(HashMap::new()),
        }
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no properties
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot and flags of `key`
    pub fn find(&self, key: &PropertyKey) -> Option<(usize, PropertyFlags)> {
        self.lookup
            .get(key)
            .map(|&slot| (slot, self.entries[slot].flags))
    }

    /// Properties in insertion order; an entry's position is its slot
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    /// The map with `key` appended at the next slot
    pub fn add(self: &Rc<Self>, key: PropertyKey, flags: PropertyFlags) -> Rc<Self> {
        self.transition(Transition::Add(key.clone(), flags), || {
            let mut entries = self.entries.clone();
            entries.push(MapEntry { key, flags });
            entries
        })
    }

    /// The map without `key`; later slots move down by one
    pub fn remove(self: &Rc<Self>, key: &PropertyKey) -> Rc<Self> {
        self.transition(Transition::Remove(key.clone()), || {
            self.entries
                .iter()
                .filter(|entry| &entry.key != key)
                .cloned()
                .collect()
        })
    }

    /// The map with the attributes of `key` replaced, keeping its slot
    pub fn change_flags(self: &Rc<Self>, key: &PropertyKey, flags: PropertyFlags) -> Rc<Self> {
        if self.find(key).map(|(_, old)| old) == Some(flags) {
            return Rc::clone(self);
        }
        self.transition(Transition::Change(key.clone(), flags), || {
            self.entries
                .iter()
                .map(|entry| {
                    if &entry.key == key {
                        MapEntry {
                            key: entry.key.clone(),
                            flags,
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect()
        })
    }

    /// The map with every property's attributes passed through `f`
    pub fn map_flags(self: &Rc<Self>, f: impl Fn(PropertyFlags) -> PropertyFlags) -> Rc<Self> {
        let mut map = Rc::clone(self);
        for entry in &self.entries {
            map = map.change_flags(&entry.key, f(entry.flags));
        }
        map
    }

    fn transition(self: &Rc<Self>, transition: Transition, build: impl FnOnce() -> Vec<MapEntry>) -> Rc<Self> {
        if let Some(existing) = self.transitions.borrow().get(&transition).and_then(Weak::upgrade) {
            return existing;
        }
        let next = Rc::new(PropertyMap::from_entries(build()));
        trace!(from = self.len(), to = next.len(), "property map transition");
        let mut transitions = self.transitions.borrow_mut();
        if transitions.len() >= TRANSITION_SWEEP_THRESHOLD {
            transitions.retain(|_, target| target.strong_count() > 0);
        }
        transitions.insert(transition, Rc::downgrade(&next));
        next
    }
}

impl fmt::Debug for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_add_sequence_shares_map() {
        let root = PropertyMap::root();
        let a = root.add("x".into(), PropertyFlags::DEFAULT).add("y".into(), PropertyFlags::DEFAULT);
        let b = root.add("x".into(), PropertyFlags::DEFAULT).add("y".into(), PropertyFlags::DEFAULT);
        assert!(Rc::ptr_eq(&a, &b));
        let c = root.add("y".into(), PropertyFlags::DEFAULT).add("x".into(), PropertyFlags::DEFAULT);
        assert!(!Rc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_different_flags_give_different_maps() {
        let root = PropertyMap::root();
        let a = root.add("x".into(), PropertyFlags::DEFAULT);
        let b = root.add("x".into(), PropertyFlags::HIDDEN);
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_remove_shifts_later_slots() {
        let map = PropertyMap::root()
            .add("a".into(), PropertyFlags::DEFAULT)
            .add("b".into(), PropertyFlags::DEFAULT)
            .add("c".into(), PropertyFlags::DEFAULT);
        let removed = map.remove(&"a".into());
        assert_eq!(removed.find(&"c".into()).map(|(slot, _)| slot), Some(1));
        assert!(removed.find(&"a".into()).is_none());
        assert!(Rc::ptr_eq(&removed, &map.remove(&"a".into())));
    }

    #[test]
    fn test_change_flags_keeps_slot() {
        let map = PropertyMap::root()
            .add("a".into(), PropertyFlags::DEFAULT)
            .add("b".into(), PropertyFlags::DEFAULT);
        let frozen = map.map_flags(PropertyFlags::frozen);
        let (slot, flags) = frozen.find(&"b".into()).unwrap();
        assert_eq!(slot, 1);
        assert!(!flags.writable && !flags.configurable && flags.enumerable);
    }

    #[test]
    fn test_dropped_target_is_rebuilt() {
        let root = PropertyMap::root();
        drop(root.add("x".into(), PropertyFlags::DEFAULT));
        let second = root.add("x".into(), PropertyFlags::DEFAULT);
        assert_eq!(second.len(), 1);
        assert!(Rc::ptr_eq(&second, &root.add("x".into(), PropertyFlags::DEFAULT)));
    }
}
