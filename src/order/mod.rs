//! Order Module
//!
//! The order store: every key of the map, kept in ascending order.
//!
//! ## Responsibilities
//! - Keep keys sorted ascending with no duplicates
//! - Locate positions by binary search (O(log n))
//! - Shift elements on insert/remove (O(n))
//! - Hand out owned copies for enumeration
//!
//! ## Data Structure Choice
//! A flat `Vec<K>` rather than a tree:
//! - Contiguous memory, cheap full enumeration
//! - Binary search for positioning
//! - Deduplication is the caller's job: the map checks its hash index
//!   under the same write guard before inserting here

mod keys;

pub(crate) use keys::SortedKeys;
