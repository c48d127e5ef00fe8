//! Element storage for array-indexed properties.
//!
//! Every object keeps its array-index properties with default attributes in
//! an [`ArrayData`]. The storage starts as an unboxed `i32` vector and is
//! promoted, never demoted, as incompatible values or index patterns show
//! up:
//!
//! ```text
//! Int ──► Double ──► Object ──► Sparse
//! ```
//!
//! The dense backends keep elements in `[0, vec.len())` and treat
//! `[vec.len(), length)` as trailing holes. Only the `Object` backend can
//! represent interior holes; the `Sparse` backend stores present indices in
//! an ordered map and is used once the index range gets too wide.

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

use crate::property::PropertyFlags;
use crate::value::Value;

/// Dense storage is never grown beyond this many elements.
pub const MAX_DENSE_LENGTH: u32 = 1 << 24;

/// A store this far past the end of dense storage switches to sparse.
pub const SPARSE_GAP: u32 = 1024;

/// Which representation an [`ArrayData`] currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Backend {
    /// Unboxed 32-bit integers without holes
    Int,
    /// Unboxed doubles without holes
    Double,
    /// Boxed values with holes
    Object,
    /// Ordered map of present indices
    Sparse,
}

#[derive(Debug, Clone)]
enum Storage {
    Int(VecDeque<i32>),
    Double(VecDeque<f64>),
    Object(VecDeque<Option<Value>>),
    Sparse(BTreeMap<u32, Value>),
}

impl Storage {
    fn backend(&self) -> Backend {
        match self {
            Storage::Int(_) => Backend::Int,
            Storage::Double(_) => Backend::Double,
            Storage::Object(_) => Backend::Object,
            Storage::Sparse(_) => Backend::Sparse,
        }
    }

    /// Length of the dense vector, or `None` for sparse storage
    fn dense_len(&self) -> Option<u32> {
        let len = match self {
            Storage::Int(v) => v.len(),
            Storage::Double(v) => v.len(),
            Storage::Object(v) => v.len(),
            Storage::Sparse(_) => return None,
        };
        Some(len as u32)
    }
}

/// The narrowest backend able to hold `value`
fn backend_for(value: &Value) -> Backend {
    match value {
        Value::Number(n) => {
            let fits_int = n.fract() == 0.0
                && *n >= f64::from(i32::MIN)
                && *n <= f64::from(i32::MAX)
                && !(*n == 0.0 && n.is_sign_negative());
            if fits_int {
                Backend::Int
            } else {
                Backend::Double
            }
        }
        _ => Backend::Object,
    }
}

/// Array element storage with a `length` and element-level seal/freeze state.
///
/// # Examples
///
/// ```
/// use object_model::array_data::{ArrayData, Backend};
/// use object_model::Value;
///
/// let mut data = ArrayData::new();
/// data.push(Value::from(1.0));
/// assert_eq!(data.backend(), Backend::Int);
/// data.push(Value::from(1.5));
/// assert_eq!(data.backend(), Backend::Double);
/// data.set(5, Value::from("x"));
/// assert_eq!(data.backend(), Backend::Object);
/// assert_eq!(data.length(), 6);
/// assert!(!data.has(3));
/// ```
#[derive(Debug, Clone)]
pub struct ArrayData {
    storage: Storage,
    length: u32,
    sealed: bool,
    frozen: bool,
}

impl Default for ArrayData {
    fn default() -> Self {
        ArrayData::new()
    }
}

impl ArrayData {
    /// Empty storage
    pub fn new() -> Self {
        ArrayData::with_length(0)
    }

    /// Storage of the given length with every index a hole
    pub fn with_length(length: u32) -> Self {
        ArrayData {
            storage: Storage::Int(VecDeque::new()),
            length,
            sealed: false,
            frozen: false,
        }
    }

    /// Storage holding `values` at indices `0..values.len()`
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut data = ArrayData::new();
        for value in values {
            data.push(value);
        }
        data
    }

    /// The current representation
    pub fn backend(&self) -> Backend {
        self.storage.backend()
    }

    /// One past the highest index this storage covers
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Attributes every stored element has
    pub fn element_flags(&self) -> PropertyFlags {
        PropertyFlags::data(!self.frozen, true, !self.sealed)
    }

    /// Whether elements are non-configurable
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Whether elements are non-writable and non-configurable
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Make every element non-configurable
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Make every element non-writable and non-configurable
    pub fn freeze(&mut self) {
        self.sealed = true;
        self.frozen = true;
    }

    fn promote(&mut self, to: Backend) {
        let from = self.backend();
        if to <= from {
            return;
        }
        trace!(?from, ?to, length = self.length, "array storage promoted");
        let storage = std::mem::replace(&mut self.storage, Storage::Sparse(BTreeMap::new()));
        self.storage = match (storage, to) {
            (Storage::Int(v), Backend::Double) => Storage::Double(v.into_iter().map(f64::from).collect()),
            (Storage::Int(v), Backend::Object) => Storage::Object(
                v.into_iter()
                    .map(|n| Some(Value::Number(f64::from(n))))
                    .collect(),
            ),
            (Storage::Double(v), Backend::Object) => {
                Storage::Object(v.into_iter().map(|n| Some(Value::Number(n))).collect())
            }
            (storage, _) => {
                let mut map = BTreeMap::new();
                match storage {
                    Storage::Int(v) => {
                        for (i, n) in v.into_iter().enumerate() {
                            map.insert(i as u32, Value::Number(f64::from(n)));
                        }
                    }
                    Storage::Double(v) => {
                        for (i, n) in v.into_iter().enumerate() {
                            map.insert(i as u32, Value::Number(n));
                        }
                    }
                    Storage::Object(v) => {
                        for (i, slot) in v.into_iter().enumerate() {
                            if let Some(value) = slot {
                                map.insert(i as u32, value);
                            }
                        }
                    }
                    Storage::Sparse(m) => map = m,
                }
                Storage::Sparse(map)
            }
        };
    }

    /// Element at `index`, if present
    pub fn get(&self, index: u32) -> Option<Value> {
        let i = index as usize;
        match &self.storage {
            Storage::Int(v) => v.get(i).map(|&n| Value::Number(f64::from(n))),
            Storage::Double(v) => v.get(i).map(|&n| Value::Number(n)),
            Storage::Object(v) => v.get(i).cloned().flatten(),
            Storage::Sparse(m) => m.get(&index).cloned(),
        }
    }

    /// Whether an element is present at `index`
    pub fn has(&self, index: u32) -> bool {
        let i = index as usize;
        match &self.storage {
            Storage::Int(v) => i < v.len(),
            Storage::Double(v) => i < v.len(),
            Storage::Object(v) => v.get(i).map_or(false, Option::is_some),
            Storage::Sparse(m) => m.contains_key(&index),
        }
    }

    /// Store `value` at `index`, growing `length` past it when needed.
    pub fn set(&mut self, index: u32, value: Value) {
        self.promote(backend_for(&value));
        if let Some(dense_len) = self.storage.dense_len() {
            if index > dense_len {
                let gap = index - dense_len;
                if gap > SPARSE_GAP || index >= MAX_DENSE_LENGTH {
                    self.promote(Backend::Sparse);
                } else {
                    self.promote(Backend::Object);
                }
            } else if index == dense_len && index >= MAX_DENSE_LENGTH {
                self.promote(Backend::Sparse);
            }
        }
        let i = index as usize;
        match &mut self.storage {
            Storage::Int(v) => {
                let n = value.as_number().unwrap_or_default() as i32;
                if i < v.len() {
                    v[i] = n;
                } else {
                    v.push_back(n);
                }
            }
            Storage::Double(v) => {
                let n = value.as_number().unwrap_or_default();
                if i < v.len() {
                    v[i] = n;
                } else {
                    v.push_back(n);
                }
            }
            Storage::Object(v) => {
                if i >= v.len() {
                    v.resize(i + 1, None);
                }
                v[i] = Some(value);
            }
            Storage::Sparse(m) => {
                m.insert(index, value);
            }
        }
        if index >= self.length {
            self.length = index + 1;
        }
    }

    /// Remove the element at `index`, leaving a hole. Returns whether one was present.
    pub fn delete(&mut self, index: u32) -> bool {
        if !self.has(index) {
            return false;
        }
        let i = index as usize;
        let is_last = self.storage.dense_len().map_or(false, |len| index + 1 == len);
        if is_last {
            match &mut self.storage {
                Storage::Int(v) => {
                    v.pop_back();
                }
                Storage::Double(v) => {
                    v.pop_back();
                }
                Storage::Object(v) => {
                    v.pop_back();
                    trim_trailing_holes(v);
                }
                Storage::Sparse(_) => {}
            }
            return true;
        }
        self.promote(Backend::Object);
        match &mut self.storage {
            Storage::Object(v) => v[i] = None,
            Storage::Sparse(m) => {
                m.remove(&index);
            }
            _ => {}
        }
        true
    }

    /// Change `length`; elements at or past the new length are dropped.
    pub fn set_length(&mut self, length: u32) {
        if length < self.length {
            let keep = length as usize;
            match &mut self.storage {
                Storage::Int(v) => v.truncate(keep),
                Storage::Double(v) => v.truncate(keep),
                Storage::Object(v) => {
                    v.truncate(keep);
                    trim_trailing_holes(v);
                }
                Storage::Sparse(m) => {
                    m.split_off(&length);
                }
            }
        }
        self.length = length;
    }

    /// Append at `length`; returns the new length, or `None` when the
    /// index space is exhausted.
    pub fn push(&mut self, value: Value) -> Option<u32> {
        if self.length > core_types::MAX_ARRAY_INDEX {
            return None;
        }
        self.set(self.length, value);
        Some(self.length)
    }

    /// Remove and return the element at `length - 1` (`None` for a hole),
    /// shrinking `length` by one. Does nothing on empty storage.
    pub fn pop(&mut self) -> Option<Value> {
        if self.length == 0 {
            return None;
        }
        let last = self.length - 1;
        let value = self.get(last);
        self.set_length(last);
        value
    }

    /// Drop the first `by` positions and move everything else down.
    pub fn shift_left(&mut self, by: u32) {
        let by = by.min(self.length);
        if by == 0 {
            return;
        }
        let n = by as usize;
        match &mut self.storage {
            Storage::Int(v) => drain_front(v, n),
            Storage::Double(v) => drain_front(v, n),
            Storage::Object(v) => {
                drain_front(v, n);
                trim_trailing_holes(v);
            }
            Storage::Sparse(m) => {
                let kept = m.split_off(&by);
                *m = kept.into_iter().map(|(k, v)| (k - by, v)).collect();
            }
        }
        self.length -= by;
    }

    /// Open `by` holes at the front and move everything else up.
    ///
    /// The caller guarantees `length + by` stays a valid array length.
    pub fn shift_right(&mut self, by: u32) {
        if by == 0 {
            return;
        }
        let dense_len = self.storage.dense_len();
        if dense_len.map_or(false, |len| u64::from(len) + u64::from(by) > u64::from(MAX_DENSE_LENGTH)) {
            self.promote(Backend::Sparse);
        } else if dense_len.map_or(false, |len| len > 0) {
            self.promote(Backend::Object);
        }
        match &mut self.storage {
            Storage::Object(v) => {
                for _ in 0..by {
                    v.push_front(None);
                }
            }
            Storage::Sparse(m) => {
                let moved = std::mem::take(m);
                *m = moved.into_iter().map(|(k, v)| (k + by, v)).collect();
            }
            // Empty dense storage: every position is a trailing hole already.
            Storage::Int(_) | Storage::Double(_) => {}
        }
        self.length += by;
    }

    /// Copy of positions `from..to`, re-based at 0
    pub fn slice(&self, from: u32, to: u32) -> ArrayData {
        let to = to.min(self.length);
        let from = from.min(to);
        let mut out = ArrayData::with_length(to - from);
        let (a, b) = (from as usize, to as usize);
        out.storage = match &self.storage {
            Storage::Int(v) => Storage::Int(v.range(a.min(v.len())..b.min(v.len())).copied().collect()),
            Storage::Double(v) => Storage::Double(v.range(a.min(v.len())..b.min(v.len())).copied().collect()),
            Storage::Object(v) => {
                let mut slice: VecDeque<Option<Value>> = v.range(a.min(v.len())..b.min(v.len())).cloned().collect();
                trim_trailing_holes(&mut slice);
                Storage::Object(slice)
            }
            Storage::Sparse(m) => Storage::Sparse(m.range(from..to).map(|(k, v)| (k - from, v.clone())).collect()),
        };
        out
    }

    /// Present indices in ascending order
    pub fn indices(&self) -> Vec<u32> {
        match &self.storage {
            Storage::Int(v) => (0..v.len() as u32).collect(),
            Storage::Double(v) => (0..v.len() as u32).collect(),
            Storage::Object(v) => v
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.is_some())
                .map(|(i, _)| i as u32)
                .collect(),
            Storage::Sparse(m) => m.keys().copied().collect(),
        }
    }

    /// Present indices in `from..to`, descending
    pub fn indices_in_range_desc(&self, from: u32, to: u32) -> Vec<u32> {
        match &self.storage {
            Storage::Sparse(m) => m.range(from..to).rev().map(|(k, _)| *k).collect(),
            _ => {
                let mut present: Vec<u32> = self
                    .indices()
                    .into_iter()
                    .filter(|i| (from..to).contains(i))
                    .collect();
                present.reverse();
                present
            }
        }
    }

    /// Number of present elements
    pub fn count(&self) -> usize {
        match &self.storage {
            Storage::Int(v) => v.len(),
            Storage::Double(v) => v.len(),
            Storage::Object(v) => v.iter().filter(|slot| slot.is_some()).count(),
            Storage::Sparse(m) => m.len(),
        }
    }
}

fn drain_front<T>(v: &mut VecDeque<T>, n: usize) {
    let n = n.min(v.len());
    v.drain(..n);
}

fn trim_trailing_holes(v: &mut VecDeque<Option<Value>>) {
    while matches!(v.back(), Some(None)) {
        v.pop_back();
    }
}
