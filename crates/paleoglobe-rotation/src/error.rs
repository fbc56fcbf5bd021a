//! Error types for rotation catalog operations.

use std::fmt;

/// Errors that can occur while building a rotation index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    /// The catalog holds no usable rotation, so no time range exists.
    EmptyCatalog,
}

impl fmt::Display for RotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "rotation catalog contains no rotations"),
        }
    }
}

impl std::error::Error for RotationError {}

/// Result type for rotation operations.
pub type RotationResult<T> = Result<T, RotationError>;
