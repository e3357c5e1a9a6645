//! Index error types.

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Vector dimensions do not match the index.
    #[error("dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Persisted index file could not be read or written.
    #[error("persistence failed: {0}")]
    Persistence(#[from] std::io::Error),

    /// Persisted index file could not be decoded.
    #[error("corrupt index file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl IndexError {
    /// Creates a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}
