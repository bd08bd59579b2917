//! Error types for sortedmap
//!
//! Only expected, recoverable conditions live here. Broken internal
//! invariants and violated caller contracts panic instead.

use thiserror::Error;

/// Result type alias using SortedMapError
pub type Result<T> = std::result::Result<T, SortedMapError>;

/// Recoverable error type for SortedMap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SortedMapError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// The requested key is not present in the map
    #[error("key does not exist")]
    KeyNotFound,
}
