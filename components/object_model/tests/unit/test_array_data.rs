//! Unit tests for array element storage

use object_model::array_data::{ArrayData, Backend, MAX_DENSE_LENGTH, SPARSE_GAP};
use object_model::Value;

fn filled(n: u32) -> ArrayData {
    ArrayData::from_values((0..n).map(Value::from).collect())
}

#[test]
fn test_integer_storage_stays_unboxed() {
    let mut data = filled(4);
    assert_eq!(data.backend(), Backend::Int);
    data.set(1, Value::from(-7.0));
    assert_eq!(data.backend(), Backend::Int);
    data.set(2, Value::from(-0.0));
    assert_eq!(data.backend(), Backend::Double);
    assert!(data.get(2).unwrap().as_number().unwrap().is_sign_negative());
}

#[test]
fn test_far_writes_go_sparse() {
    let mut data = filled(2);
    data.set(2 + SPARSE_GAP, Value::from(1.0));
    assert_eq!(data.backend(), Backend::Object);

    let mut data = filled(2);
    data.set(3 + SPARSE_GAP, Value::from(1.0));
    assert_eq!(data.backend(), Backend::Sparse);
    assert_eq!(data.count(), 3);
    assert_eq!(data.indices(), vec![0, 1, 3 + SPARSE_GAP]);

    let mut data = ArrayData::new();
    data.set(MAX_DENSE_LENGTH, Value::Null);
    assert_eq!(data.backend(), Backend::Sparse);
    assert_eq!(data.length(), MAX_DENSE_LENGTH + 1);
}

#[test]
fn test_delete_leaves_holes() {
    let mut data = filled(3);
    assert!(data.delete(1));
    assert!(!data.delete(1));
    assert!(!data.has(1));
    assert_eq!(data.length(), 3);
    assert_eq!(data.indices(), vec![0, 2]);

    // Removing the last element keeps the length
    assert!(data.delete(2));
    assert_eq!(data.length(), 3);
    assert_eq!(data.count(), 1);
}

#[test]
fn test_length_changes() {
    let mut data = filled(5);
    data.set_length(2);
    assert_eq!(data.indices(), vec![0, 1]);
    data.set_length(8);
    assert_eq!(data.length(), 8);
    assert_eq!(data.count(), 2);
    assert_eq!(data.pop(), None);
    assert_eq!(data.length(), 7);
}

#[test]
fn test_shifts() {
    let mut data = filled(4);
    data.shift_left(1);
    assert_eq!(data.length(), 3);
    assert_eq!(data.get(0), Some(Value::from(1.0)));
    data.shift_right(2);
    assert_eq!(data.length(), 5);
    assert!(!data.has(0) && !data.has(1));
    assert_eq!(data.get(2), Some(Value::from(1.0)));
    assert_eq!(data.get(4), Some(Value::from(3.0)));
}

#[test]
fn test_slice_rebases() {
    let mut data = filled(6);
    data.delete(3);
    let slice = data.slice(2, 5);
    assert_eq!(slice.length(), 3);
    assert_eq!(slice.get(0), Some(Value::from(2.0)));
    assert!(!slice.has(1));
    assert_eq!(slice.get(2), Some(Value::from(4.0)));
}

#[test]
fn test_seal_and_freeze_flags() {
    let mut data = filled(1);
    data.seal();
    assert!(data.is_sealed() && !data.is_frozen());
    assert!(data.element_flags().writable);
    assert!(!data.element_flags().configurable);
    data.freeze();
    assert!(!data.element_flags().writable);
}
