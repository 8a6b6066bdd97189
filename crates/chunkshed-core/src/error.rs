//! Error types for chunkshed-core
//!
//! Provides a unified error type for geometry, halo exchange and
//! composition. Each variant captures enough context for diagnostics
//! without exposing internal implementation details.

use thiserror::Error;

/// chunkshed-core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Chunk or halo sizing is inconsistent with the domain shape
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Two arrays that must be co-indexed have different shapes
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for chunkshed-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::ShapeMismatch`] unless both shapes are identical.
pub fn ensure_same_shape(expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected != actual {
        return Err(Error::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}
