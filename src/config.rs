//! Configuration for SortedMap
//!
//! Centralized construction options with sensible defaults.

/// Construction options for a [`SortedMap`](crate::SortedMap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Allocation
    // -------------------------------------------------------------------------
    /// Number of entries to reserve up front in both the hash index and the
    /// sorted key vector. Affects allocation only, never observable behavior.
    pub capacity: usize,

    // -------------------------------------------------------------------------
    // Consistency Checks
    // -------------------------------------------------------------------------
    /// When set, `len()` also walks the key vector and verifies it is
    /// strictly ascending (O(n) per call). The cardinality cross-check
    /// always runs regardless of this flag.
    pub verify_order: bool,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of entries to pre-reserve
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Enable or disable full order verification in `len()`
    pub fn verify_order(mut self, enabled: bool) -> Self {
        self.config.verify_order = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
