//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// A fixture was asked for with inconsistent parameters
    #[error("invalid fixture '{name}': {message}")]
    InvalidFixture { name: &'static str, message: String },

    /// A marker position lies outside the fixture shape
    #[error("marker {point:?} outside shape {shape:?}")]
    MarkerOutOfBounds {
        point: Vec<usize>,
        shape: Vec<usize>,
    },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
