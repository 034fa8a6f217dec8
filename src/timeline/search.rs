//! Ordered-list lookups shared by the timeline and the track event lists.

use alloc::vec::Vec;

/// Index of the last item whose key is `<= value`.
///
/// `items` must be sorted ascending by `key`. When several items share the
/// matching key the last of them wins. Returns `None` when every key is
/// greater than `value`, or the slice is empty.
pub fn search<T>(items: &[T], value: f64, key: impl Fn(&T) -> f64) -> Option<usize> {
    items.partition_point(|item| key(item) <= value).checked_sub(1)
}

/// Insert `item` keeping `items` sorted by `key`.
///
/// The item goes after every existing item with an equal key, so equal keys
/// keep their insertion order.
pub fn insert<T, K: PartialOrd>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let new_key = key(&item);
    let index = items.partition_point(|existing| key(existing) <= new_key);
    items.insert(index, item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn finds_last_less_or_equal() {
        let keys = [0., 10., 10., 20.];
        let by_value = |v: &f64| *v;
        assert_eq!(search(&keys, -1., by_value), None);
        assert_eq!(search(&keys, 0., by_value), Some(0));
        assert_eq!(search(&keys, 5., by_value), Some(0));
        assert_eq!(search(&keys, 10., by_value), Some(2));
        assert_eq!(search(&keys, 19.9, by_value), Some(2));
        assert_eq!(search(&keys, 1000., by_value), Some(3));
        assert_eq!(search(&[] as &[f64], 3., by_value), None);
    }

    #[test]
    fn inserts_after_equal_keys() {
        let mut items = vec![(0, 'a'), (5, 'b'), (9, 'c')];
        insert(&mut items, (5, 'd'), |i| i.0);
        insert(&mut items, (0, 'e'), |i| i.0);
        insert(&mut items, (10, 'f'), |i| i.0);
        assert_eq!(
            items,
            vec![(0, 'a'), (0, 'e'), (5, 'b'), (5, 'd'), (9, 'c'), (10, 'f')]
        );
    }
}
