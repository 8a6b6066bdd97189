//! Error types for chunkshed-reconcile

use chunkshed_core::Label;
use thiserror::Error;

/// Errors that can occur while running a chunked segmentation
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Core library error (geometry, shapes)
    #[error("core error: {0}")]
    Core(#[from] chunkshed_core::Error),

    /// Watershed error
    #[error("region error: {0}")]
    Region(#[from] chunkshed_region::RegionError),

    /// A seed carries the label reserved for undetermined cells
    #[error("seed label {label} collides with the sentinel label")]
    SentinelCollision { label: Label },

    /// Configuration rejected at setup
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The run was cancelled between passes
    #[error("segmentation cancelled")]
    Cancelled,
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
