//! Positional ordering of sibling collections.
//!
//! Lists within a board and cards within a list both carry an `order` field
//! that must equal the item's index in its collection once a move settles.

use crate::error::{Result, TaskifyError};

/// An item ranked within a sibling collection
pub trait Ordered {
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

/// Moves the element at `from` so that it ends up at `to`.
///
/// This is a remove-then-insert, not a swap: every element between the two
/// positions shifts by one. Both indices must be within `0..items.len()`.
///
/// # Examples
/// ```
/// use taskify_core::domain::ordering::reorder;
///
/// let mut items = vec!['a', 'b', 'c'];
/// reorder(&mut items, 2, 0).unwrap();
/// assert_eq!(items, vec!['c', 'a', 'b']);
/// ```
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    check_index(from, items.len())?;
    check_index(to, items.len())?;

    if from != to {
        let moved = items.remove(from);
        items.insert(to, moved);
    }
    Ok(())
}

/// Rewrites every item's order to its position in the slice
pub fn renumber<T: Ordered>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as u32);
    }
}

/// Checks that orders form the sequence `0..len` in slice order
pub fn is_contiguous<T: Ordered>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.order() == index as u32)
}

/// Sorts by the stored order field, then renumbers to close any gaps.
///
/// Used when installing a snapshot that came from the store, where the
/// collection may arrive in arbitrary order.
pub fn normalize<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.order());
    renumber(items);
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(TaskifyError::InvalidIndex { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        order: u32,
    }

    impl Ordered for Item {
        fn order(&self) -> u32 {
            self.order
        }

        fn set_order(&mut self, order: u32) {
            self.order = order;
        }
    }

    fn items(names: &[&'static str]) -> Vec<Item> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Item {
                name: *name,
                order: i as u32,
            })
            .collect()
    }

    fn names(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.name).collect()
    }

    #[test]
    fn test_reorder_moves_not_swaps() {
        let mut v = items(&["a", "b", "c", "d"]);
        reorder(&mut v, 0, 2).unwrap();
        assert_eq!(names(&v), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_reorder_backwards() {
        let mut v = items(&["a", "b", "c", "d"]);
        reorder(&mut v, 3, 1).unwrap();
        assert_eq!(names(&v), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut v = items(&["a", "b"]);
        reorder(&mut v, 1, 1).unwrap();
        assert_eq!(names(&v), vec!["a", "b"]);
    }

    #[test]
    fn test_reorder_out_of_range() {
        let mut v = items(&["a", "b"]);
        let err = reorder(&mut v, 0, 2).unwrap_err();
        assert!(matches!(err, TaskifyError::InvalidIndex { index: 2, len: 2 }));
        assert_eq!(names(&v), vec!["a", "b"]);
    }

    #[test]
    fn test_reorder_then_renumber_is_contiguous() {
        let mut v = items(&["a", "b", "c"]);
        reorder(&mut v, 2, 0).unwrap();
        assert!(!is_contiguous(&v));

        renumber(&mut v);
        assert!(is_contiguous(&v));
        assert_eq!(v[0].name, "c");
        assert_eq!(v[0].order, 0);
    }

    #[test]
    fn test_normalize_sorts_and_closes_gaps() {
        let mut v = vec![
            Item { name: "c", order: 9 },
            Item { name: "a", order: 1 },
            Item { name: "b", order: 4 },
        ];
        normalize(&mut v);
        assert_eq!(names(&v), vec!["a", "b", "c"]);
        assert!(is_contiguous(&v));
    }

    #[test]
    fn test_empty_is_contiguous() {
        let v: Vec<Item> = Vec::new();
        assert!(is_contiguous(&v));
    }
}
