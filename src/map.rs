//! SortedMap
//!
//! A hash index paired with a sorted key vector, both behind one `RwLock`.
//!
//! ## Responsibilities
//! - O(1) expected lookup by key through the hash index
//! - Ascending key enumeration without a sort step
//! - Keep both stores consistent under concurrent mutation
//! - Detect and refuse to continue past a broken invariant

use std::borrow::Borrow;
use std::collections::hash_map::{Entry, RandomState};
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use parking_lot::RwLock;
use tracing::{debug, error, trace};

use crate::config::Config;
use crate::error::{Result, SortedMapError};
use crate::order::SortedKeys;

#[cfg(feature = "serde")]
mod serde_impl;

/// Both stores, always locked together
struct Inner<K, V, S> {
    /// Index store: key → value
    index: HashMap<K, V, S>,

    /// Order store: every key of `index`, ascending
    order: SortedKeys<K>,
}

/// A thread-safe map whose keys are always kept in ascending order
///
/// ## Concurrency Model
///
/// A single `parking_lot::RwLock` guards the index store and the order store
/// as one unit:
/// - **Writes** (`set`, `insert`, `delete`, `remove`): exclusive guard for the
///   whole operation. The existence check and the order-store update happen
///   inside the same critical section, so the order store never holds a
///   duplicate key.
/// - **Reads** (`get`, `contains_*`, `len`, `keys`, `values`, `entries`):
///   shared guard, any number of concurrent readers.
///
/// Every method takes `&self`, so a map shared through an `Arc` can be
/// mutated from any thread. Mutators return `&Self` for chaining.
///
/// ## Example
///
/// ```
/// use sortedmap::{SortedMap, SortedMapError};
///
/// let map = SortedMap::new();
/// map.set("key2", 2).set("key1", 1).set("key3", 3);
///
/// assert_eq!(map.keys(), vec!["key1", "key2", "key3"]);
/// assert_eq!(map.values(), vec![1, 2, 3]);
/// assert_eq!(map.get("key4"), Err(SortedMapError::KeyNotFound));
/// ```
pub struct SortedMap<K, V, S = RandomState> {
    inner: RwLock<Inner<K, V, S>>,

    /// Run the O(n) sortedness check in `len()`
    verify_order: bool,
}

impl<K, V> SortedMap<K, V, RandomState>
where
    K: Ord + Hash + Clone,
{
    /// Create an empty map. Nothing is allocated until the first insert.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty map with room for `capacity` entries in both stores
    ///
    /// Behaves exactly like [`SortedMap::new`]; only allocation differs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config::builder().capacity(capacity).build())
    }

    /// Create a map holding exactly one entry
    pub fn with_entry(key: K, value: V) -> Self {
        let map = Self::new();
        map.set(key, value);
        map
    }

    /// Create an empty map from a [`Config`]
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S> SortedMap<K, V, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher,
{
    /// Create an empty map whose index store uses `hasher`
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(Config::default(), hasher)
    }

    /// Create an empty map from a [`Config`] and a custom hasher
    pub fn with_config_and_hasher(config: Config, hasher: S) -> Self {
        debug!(
            capacity = config.capacity,
            verify_order = config.verify_order,
            "Creating sorted map"
        );

        Self {
            inner: RwLock::new(Inner {
                index: HashMap::with_capacity_and_hasher(config.capacity, hasher),
                order: SortedKeys::with_capacity(config.capacity),
            }),
            verify_order: config.verify_order,
        }
    }

    // =========================================================================
    // Mutation (write guard)
    // =========================================================================

    /// Insert `key`, or overwrite its value if already present
    ///
    /// A new key is placed at its sorted position; an existing key keeps its
    /// position and only the value changes. Returns `self` for chaining.
    pub fn set(&self, key: K, value: V) -> &Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite, returning the previous value if there was one
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Remove every given key that is present; absent keys are skipped
    ///
    /// All keys are removed under a single write guard, with the same effect
    /// as removing them one at a time in iteration order. Returns `self` for
    /// chaining.
    pub fn delete<'a, Q, I>(&self, keys: I) -> &Self
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let mut inner = self.inner.write();
        for key in keys {
            inner.remove(key);
        }
        self
    }

    /// Remove a single key, returning its value if it was present
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.inner.write().remove(key)
    }

    // =========================================================================
    // Lookup (read guard)
    // =========================================================================

    /// Get a copy of the value stored under `key`
    ///
    /// Returns [`SortedMapError::KeyNotFound`] if the key is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.with_value(key, V::clone)
    }

    /// Get the value stored under a key the caller knows is present
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent. Use [`SortedMap::get`] unless presence is
    /// guaranteed by an invariant outside the map.
    pub fn get_required<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => panic!("get_required called on an absent key: {}", e),
        }
    }

    /// Run `f` on the value stored under `key` while holding the read guard
    ///
    /// Useful when `V` is not `Clone` or only part of it is needed. `f` must
    /// not call back into this map.
    pub fn with_value<Q, R, F>(&self, key: &Q, f: F) -> Result<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        let inner = self.inner.read();
        inner.index.get(key).map(f).ok_or(SortedMapError::KeyNotFound)
    }

    /// Check whether `key` is present
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().index.contains_key(key)
    }

    /// Check whether every given key is present
    ///
    /// Stops at the first absent key. An empty set of keys yields `true`.
    pub fn contains_all<'a, Q, I>(&self, keys: I) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let inner = self.inner.read();
        keys.into_iter().all(|key| inner.index.contains_key(key))
    }

    /// Check whether at least one given key is present
    ///
    /// Stops at the first present key. An empty set of keys yields `false`.
    pub fn contains_any<'a, Q, I>(&self, keys: I) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let inner = self.inner.read();
        keys.into_iter().any(|key| inner.index.contains_key(key))
    }

    /// Number of entries
    ///
    /// # Panics
    ///
    /// Panics if the index store and the order store disagree on their size,
    /// or (with [`Config::verify_order`]) if the keys are not strictly
    /// ascending. Either means the mutation logic is broken.
    pub fn len(&self) -> usize {
        self.inner.read().checked_len(self.verify_order)
    }

    /// Check whether the map holds no entries (same checks as `len`)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Enumeration (read guard, owned snapshots)
    // =========================================================================

    /// Copy of all keys in ascending order
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().order.to_vec()
    }

    /// Copy of all values, ordered by their keys
    ///
    /// `values()[i]` belongs to `keys()[i]` as long as no write happens in
    /// between; use [`SortedMap::entries`] for a snapshot of both at once.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .map(|key| inner.value_of(key).clone())
            .collect()
    }

    /// Copy of all entries in ascending key order, taken under one read guard
    pub fn entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .map(|key| (key.clone(), inner.value_of(key).clone()))
            .collect()
    }
}

// =============================================================================
// Critical Sections
// =============================================================================

impl<K, V, S> Inner<K, V, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher,
{
    /// Caller holds the write guard
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = match self.index.entry(key) {
            Entry::Occupied(mut occupied) => Some(occupied.insert(value)),
            Entry::Vacant(vacant) => {
                debug_assert!(!self.order.contains(vacant.key()));

                let position = self.order.insert(vacant.key().clone());
                trace!(position, len = self.order.len(), "Inserted key into order store");

                vacant.insert(value);
                None
            }
        };

        debug_assert_eq!(self.index.len(), self.order.len());
        previous
    }

    /// Caller holds the write guard
    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        let value = self.index.remove(key)?;

        match self.order.remove(key) {
            Some(position) => {
                trace!(position, len = self.order.len(), "Removed key from order store");
            }
            None => out_of_sync(self.index.len(), self.order.len()),
        }

        debug_assert_eq!(self.index.len(), self.order.len());
        Some(value)
    }

    /// Caller holds either guard
    fn checked_len(&self, verify_order: bool) -> usize {
        let indexed = self.index.len();
        let ordered = self.order.len();

        if indexed != ordered {
            out_of_sync(indexed, ordered);
        }

        if verify_order && !self.order.is_strictly_ascending() {
            error!(len = ordered, "Sorted keys are not strictly ascending");
            panic!("sorted keys are not strictly ascending");
        }

        indexed
    }
}

impl<K, V, S> Inner<K, V, S>
where
    K: Ord + Hash,
    S: BuildHasher,
{
    /// Value for a key taken from the order store
    fn value_of(&self, key: &K) -> &V {
        match self.index.get(key) {
            Some(value) => value,
            None => out_of_sync(self.index.len(), self.order.len()),
        }
    }
}

#[cold]
fn out_of_sync(indexed: usize, ordered: usize) -> ! {
    error!(indexed, ordered, "Sorted keys and index are out of sync");
    panic!(
        "sorted keys and index are out of sync ({} indexed, {} ordered)",
        indexed, ordered
    );
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<K, V, S> Default for SortedMap<K, V, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Clone for SortedMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// Clones a consistent snapshot taken under the read guard
    fn clone(&self) -> Self {
        let inner = self.inner.read();
        Self {
            inner: RwLock::new(Inner {
                index: inner.index.clone(),
                order: inner.order.clone(),
            }),
            verify_order: self.verify_order,
        }
    }
}

impl<K, V, S> fmt::Debug for SortedMap<K, V, S>
where
    K: Ord + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_map()
            .entries(inner.order.iter().map(|key| (key, inner.value_of(key))))
            .finish()
    }
}

impl<K, V, S> Extend<(K, V)> for SortedMap<K, V, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher,
{
    /// Later duplicates overwrite earlier ones
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let inner = self.inner.get_mut();
        for (key, value) in iter {
            inner.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for SortedMap<K, V, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}
