//! Error types for the paleoglobe crate.

use std::fmt;

use paleoglobe_rotation::RotationError;
use paleoglobe_surface::SurfaceError;

/// Result type for paleoglobe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or serving globe data.
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed.
    Http {
        /// The URL that failed.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// Reading a local file failed.
    Io {
        /// The file that could not be read.
        path: String,
        /// The error message.
        message: String,
    },
    /// Elevation payload or mesh buffers were rejected.
    Surface(SurfaceError),
    /// Rotation catalog could not be indexed.
    Rotation(RotationError),
    /// Cache operation failed.
    Cache {
        /// The operation that failed.
        operation: &'static str,
        /// The error message.
        message: String,
    },
    /// Invalid data in a response or source description.
    InvalidData {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::Io { path, message } => {
                write!(f, "failed to read {path}: {message}")
            }
            Error::Surface(e) => write!(f, "surface error: {e}"),
            Error::Rotation(e) => write!(f, "rotation error: {e}"),
            Error::Cache { operation, message } => {
                write!(f, "cache {operation} failed: {message}")
            }
            Error::InvalidData { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Surface(e) => Some(e),
            Error::Rotation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SurfaceError> for Error {
    fn from(e: SurfaceError) -> Self {
        Error::Surface(e)
    }
}

impl From<RotationError> for Error {
    fn from(e: RotationError) -> Self {
        Error::Rotation(e)
    }
}
