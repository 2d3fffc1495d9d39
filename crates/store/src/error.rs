//! Store-boundary errors

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by a store backend
///
/// Connectivity and backend failures propagate through the mapping layer
/// unmodified; no retry policy is applied above this boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The key holds a structure of a different shape than the operation expects
    #[error("wrong type at key {key:?}: operation expects {expected}, key holds {found}")]
    WrongType {
        /// Key that was accessed
        key: String,
        /// Structure the operation expects
        expected: &'static str,
        /// Structure actually stored
        found: &'static str,
    },

    /// Backend-specific failure (connectivity, protocol, resource limits)
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for objmap_core::Error {
    fn from(e: StoreError) -> Self {
        objmap_core::Error::Store(e.to_string())
    }
}
