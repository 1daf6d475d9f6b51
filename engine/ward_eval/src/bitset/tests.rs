use pretty_assertions::assert_eq;

use super::Bitset;

fn from_indices(len: usize, indices: &[usize]) -> Bitset {
    let mut set = Bitset::new(len);
    for index in indices {
        set.set(*index);
    }
    set
}

#[test]
fn test_set_get_count() {
    let set = from_indices(70, &[0, 63, 64, 69]);
    assert!(set.get(0));
    assert!(set.get(63));
    assert!(set.get(64));
    assert!(!set.get(1));
    assert_eq!(set.count(), 4);
    assert!(!set.is_empty());
    assert!(Bitset::new(70).is_empty());
}

#[test]
fn test_iter_ones() {
    let set = from_indices(8, &[1, 3, 7]);
    assert_eq!(set.iter_ones().collect::<Vec<_>>(), vec![1, 3, 7]);
}

#[test]
fn test_union_and_containment() {
    let mut a = from_indices(8, &[1, 2]);
    let b = from_indices(8, &[2, 5]);
    a.union_with(&b);
    assert_eq!(a.iter_ones().collect::<Vec<_>>(), vec![1, 2, 5]);
    assert!(a.contains_all(&b));
    assert!(!b.contains_all(&a));
}

#[test]
fn test_intersection_and_difference() {
    let a = from_indices(8, &[1, 2, 5]);
    let b = from_indices(8, &[2, 5, 6]);
    assert_eq!(a.intersection(&b), from_indices(8, &[2, 5]));
    assert_eq!(a.intersect_count(&b), 2);
    assert_eq!(a.and_not(&b), from_indices(8, &[1]));
}

#[test]
fn test_complement_masks_trailing_bits() {
    let a = from_indices(4, &[0, 2]);
    assert_eq!(a.complement(), from_indices(4, &[1, 3]));
    // A full-width set has an empty complement.
    let full = from_indices(64, &(0..64).collect::<Vec<_>>());
    assert!(full.complement().is_empty());
}

#[test]
fn test_single() {
    let set = Bitset::single(16, 9);
    assert_eq!(set.iter_ones().collect::<Vec<_>>(), vec![9]);
}
