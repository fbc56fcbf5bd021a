//! Plate rotation catalogs and their interpolation over geological time.
//!
//! A rotation catalog lists finite rotations (a pole and an angle) per plate
//! at discrete times in millions of years (negative values lie in the past).
//! This crate parses the line-oriented catalog text, indexes it by plate and
//! resolves a rotation matrix for any plate at any time.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Immutable indexes**: Rebuilding yields a new [`RotationIndex`]; swapping
//!   it in is the owner's concern
//! - **Unknown is identity**: Plates or times without data resolve to the
//!   identity transform instead of an error
//!
//! # Example
//!
//! ```
//! use paleoglobe_rotation::{RotationIndex, parse_catalog};
//!
//! let text = "\
//! ! plate time lat lon angle fixed comment
//! 101   0.0  0.0  0.0  0.0 000 !NAM-AFR present day
//! 101 -100.0 10.0 20.0 30.0 000 !NAM-AFR
//! ";
//! let index = RotationIndex::build(parse_catalog(text)).unwrap();
//! let rotation = index.interpolate(101, -50.0).unwrap();
//! assert!((rotation.angle - 15.0).abs() < 1e-9);
//!
//! let matrix = index.resolve(101, -50.0);
//! assert!((matrix.determinant() - 1.0).abs() < 1e-9);
//! ```

mod catalog;
mod error;
mod index;
mod interpolate;

pub use catalog::parse_catalog;
pub use error::{RotationError, RotationResult};
pub use index::{CatalogSummary, PlateRotation, RotationIndex, TimeRange};
pub use interpolate::FiniteRotation;
