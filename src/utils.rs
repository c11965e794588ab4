//! Utility traits and std conversions for `ProbingMap`

use std::{borrow::Borrow, hash::Hash};

use crate::{DEFAULT_CAPACITY, ProbingMap};

/// Extension trait for bulk updates of a map
pub trait HashMapExtensions<K, V> {
    /// Puts every pair and returns how many keys were new
    fn put_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>;

    /// Removes every key and returns how many were present
    fn remove_all<'q, Q, I>(&mut self, keys: I) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>;
}

impl<K, V> HashMapExtensions<K, V> for ProbingMap<K, V>
where
    K: Hash + Eq,
{
    fn put_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut added: usize = 0;
        for (key, value) in pairs {
            if self.put(key, value).is_none() {
                added = added.saturating_add(1);
            }
        }
        added
    }

    fn remove_all<'q, Q, I>(&mut self, keys: I) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        keys.into_iter().filter_map(|key| self.remove(key)).count()
    }
}

impl<K, V> Default for ProbingMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<K, V> Extend<(K, V)> for ProbingMap<K, V>
where
    K: Hash + Eq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ProbingMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_iter() {
        let data = vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)];

        let map: ProbingMap<String, i32> = data.into_iter().collect();

        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));
        assert_eq!(map.get("c"), Some(&3));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_default() {
        let map: ProbingMap<String, i32> = ProbingMap::default();
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert!(map.is_empty());
        assert!(map.warnings().is_empty());
    }

    #[test]
    fn test_extend_overwrites() {
        let mut map = ProbingMap::default();
        map.extend([(1, "one"), (2, "two")]);
        map.extend([(2, "deux"), (3, "trois")]);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&2), Some(&"deux"));
    }

    #[test]
    fn test_put_all_counts_new_keys() {
        let mut map = ProbingMap::default();
        map.put("a".to_string(), 1);

        let added = map.put_all([("a".to_string(), 10), ("b".to_string(), 2)]);

        assert_eq!(added, 1);
        assert_eq!(map.get("a"), Some(&10));
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_remove_all_counts_present_keys() {
        let mut map: ProbingMap<String, i32> =
            [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();

        let removed = map.remove_all(["a", "b", "c"]);

        assert_eq!(removed, 2);
        assert!(map.is_empty());
        assert_eq!(map.tombstones(), 2);
    }
}
