//! Error types for surface operations.

use std::fmt;

/// Errors that can occur while loading a grid or displacing a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Elevation payload length does not match the configured dimensions.
    PayloadSizeMismatch { expected: usize, actual: usize },
    /// Grid dimensions are unusable (zero or overflowing).
    InvalidDimensions { width: usize, height: usize },
    /// A mesh buffer has a length that cannot describe triangles.
    BufferLengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A triangle index points past the end of the position buffer.
    IndexOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "elevation payload size mismatch: expected {expected} bytes, got {actual}"
                )
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::BufferLengthMismatch {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{context} length {actual} is not a multiple of {expected}"
                )
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;
