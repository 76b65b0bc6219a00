//! Error types for sage-vector.

use thiserror::Error;

/// Result type for sage-vector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sage-vector operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Index was built (or would be built) from zero entries.
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// Dimension mismatch between a vector and the index.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions.
        expected: usize,
        /// Actual dimensions provided.
        actual: usize,
    },

    /// Invalid vector (e.g., empty, contains NaN or infinity).
    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    /// No persisted index exists at the given location.
    #[error("Index not found at '{0}'")]
    IndexNotFound(String),

    /// The persisted index exists but cannot be read back.
    #[error("Index corrupt: {0}")]
    IndexCorrupt(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
