//! Serde support (feature `serde`)
//!
//! A `SortedMap` serializes as a plain map in ascending key order and
//! deserializes from any map, re-sorting keys on the way in.

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use super::SortedMap;
use crate::config::Config;

/// Upper bound on capacity reserved from an untrusted size hint
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

impl<K, V, S> Serialize for SortedMap<K, V, S>
where
    K: Serialize + Ord + Hash,
    V: Serialize,
    S: BuildHasher,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let inner = self.inner.read();
        serializer.collect_map(inner.order.iter().map(|key| (key, inner.value_of(key))))
    }
}

struct SortedMapVisitor<K, V, S> {
    marker: PhantomData<fn() -> SortedMap<K, V, S>>,
}

impl<'de, K, V, S> Visitor<'de> for SortedMapVisitor<K, V, S>
where
    K: Deserialize<'de> + Ord + Hash + Clone,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    type Value = SortedMap<K, V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let capacity = access
            .size_hint()
            .unwrap_or(0)
            .min(MAX_PREALLOCATED_ENTRIES);
        let config = Config::builder().capacity(capacity).build();

        let mut map = SortedMap::with_config_and_hasher(config, S::default());
        let inner = map.inner.get_mut();
        while let Some((key, value)) = access.next_entry()? {
            inner.insert(key, value);
        }

        Ok(map)
    }
}

impl<'de, K, V, S> Deserialize<'de> for SortedMap<K, V, S>
where
    K: Deserialize<'de> + Ord + Hash + Clone,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SortedMapVisitor {
            marker: PhantomData,
        })
    }
}
