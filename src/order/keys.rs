//! Sorted key vector
//!
//! Binary-search insert and remove over a `Vec<K>`.

use std::borrow::Borrow;

/// Ascending, duplicate-free sequence of keys
#[derive(Debug, Clone)]
pub(crate) struct SortedKeys<K> {
    keys: Vec<K>,
}

impl<K: Ord> SortedKeys<K> {
    /// Create an empty sequence
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Create an empty sequence with room for `capacity` keys
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Insert `key` at its sorted position and return that position.
    ///
    /// The position is the leftmost index whose predecessors are all
    /// strictly less than `key`. The caller must ensure `key` is absent;
    /// this method does not deduplicate.
    pub(crate) fn insert(&mut self, key: K) -> usize {
        let position = self.keys.partition_point(|k| *k < key);
        self.keys.insert(position, key);
        position
    }

    /// Remove `key` and return the position it occupied.
    ///
    /// Returns `None` (and leaves the sequence untouched) when `key` is absent.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.position(key)?;
        self.keys.remove(position);
        Some(position)
    }

    /// Check whether `key` is present (binary search)
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Number of keys
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// Iterate keys in ascending order
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    /// Walk the whole sequence and check every neighbour pair is `<`
    pub(crate) fn is_strictly_ascending(&self) -> bool {
        self.keys.windows(2).all(|pair| pair[0] < pair[1])
    }

    /// Leftmost position not less than `key`, if it holds `key`
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.keys.partition_point(|k| k.borrow() < key);
        match self.keys.get(position) {
            Some(found) if found.borrow() == key => Some(position),
            _ => None,
        }
    }
}

impl<K: Ord + Clone> SortedKeys<K> {
    /// Owned copy of the keys in ascending order
    pub(crate) fn to_vec(&self) -> Vec<K> {
        self.keys.clone()
    }
}
