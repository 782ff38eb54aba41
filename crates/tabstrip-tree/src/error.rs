//! Error types for tab-strip operations.

use thiserror::Error;

/// Errors that can occur during tab-strip structural operations.
///
/// Corruption of the tree itself (for example, an unpinned tab whose parent
/// is not a tree node) is not represented here: the container and the model
/// are assumed consistent at every API boundary, so such a state aborts
/// instead of surfacing as a recoverable error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StripError {
    /// A flat index was outside the valid range for the operation.
    ///
    /// Inserts accept `[0, len]`; removes and lookups accept `[0, len)`.
    #[error("flat index {index} out of range for {len} tabs")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// The size of the valid range for the operation.
        len: usize,
    },

    /// The referenced tab or collection is not a direct child of the
    /// collection the operation expected it in.
    #[error("child not found in collection")]
    NotFound,
}

/// Result type for tab-strip operations.
pub type Result<T> = std::result::Result<T, StripError>;
