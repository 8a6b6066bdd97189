//! Error types for chunkshed-region

use thiserror::Error;

/// Errors that can occur during watershed operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] chunkshed_core::Error),

    /// No cell of the marker image is nonzero
    #[error("empty markers: no seed to flood from")]
    EmptyMarkers,

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
