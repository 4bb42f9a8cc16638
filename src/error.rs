//! Error taxonomy shared by every collection in the crate.

use crate::hashing::HashToken;
use thiserror::Error;

/// Failures surfaced by collection operations.
///
/// Every failing call leaves the collection (and any views registered on
/// it) exactly as it was before the call.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Index argument outside the valid bound of the target list or view.
    /// `len` is the target's own length, not its parent's.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// First/last element requested from an empty ordered structure.
    #[error("collection is empty")]
    Underflow,

    /// Reverse lookup of a hash token that no entry carries.
    #[error("no key stored under hash token {token}")]
    KeyNotFound { token: HashToken },

    /// Optional mutator invoked on a structure that does not support it.
    #[error("operation '{operation}' is not supported by this collection")]
    UnsupportedOperation { operation: &'static str },

    /// A comparator refused to order two keys.
    #[error("cannot compare {left} with {right}")]
    Incomparable { left: String, right: String },
}

impl CollectionError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        CollectionError::OutOfRange { index, len }
    }

    /// Check if this error indicates an index outside the target's bounds.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, CollectionError::OutOfRange { .. })
    }

    /// Check if this error indicates a reverse lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CollectionError::KeyNotFound { .. })
    }
}
