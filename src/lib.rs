//! # sortedmap
//!
//! A thread-safe key-value map that keeps its keys in sorted order:
//! - O(1) expected lookup through a hash index
//! - Ascending key enumeration with no separate sort step
//! - Single-writer/multi-reader concurrency through one `RwLock`
//! - Loud failure on broken internal invariants
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SortedMap                             │
//! │            (any number of threads, &self methods)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  RwLock (parking_lot)                        │
//! │        write guard: set/delete   read guard: everything else │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Index Store │          │ Order Store │
//!   │  (HashMap)  │          │ (sorted Vec)│
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use sortedmap::SortedMap;
//!
//! let map = SortedMap::new();
//! map.set("key1", 1).set("key2", 2).set("key2", -2).set("key3", 3);
//!
//! assert_eq!(map.len(), 3);
//! assert_eq!(map.keys(), vec!["key1", "key2", "key3"]);
//! assert_eq!(map.get("key2"), Ok(-2));
//!
//! map.delete(["key1", "key2"]);
//! assert_eq!(map.keys(), vec!["key3"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

mod order;
pub mod map;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SortedMapError, Result};
pub use config::{Config, ConfigBuilder};
pub use map::SortedMap;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sortedmap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
