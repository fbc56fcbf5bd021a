//! Elevation sampling, sphere displacement and altitude coloring for globe meshes.
//!
//! This crate owns the numerical side of building a colored, displaced globe:
//! a raster of elevations, bilinear sampling over it, radial displacement of
//! sphere vertices and a piecewise smooth color ramp driven by altitude and
//! latitude.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **No globals**: Samplers, displacers and classifiers are plain values
//!   constructed by the caller
//! - **Degrade, don't fail**: A missing grid samples as sea level
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use paleoglobe_surface::{
//!     ColorClassifier, DisplacementConfig, ElevationGrid, ElevationSampler, GridDimensions,
//!     SurfaceDisplacer, SurfaceMesh,
//! };
//!
//! let dims = GridDimensions::new(4, 3);
//! let grid = ElevationGrid::new(dims, vec![1000.0; 12]).unwrap();
//! let sampler = ElevationSampler::new(Arc::new(grid));
//!
//! let mut mesh = SurfaceMesh::from_positions(vec![glam::Vec3::Y, glam::Vec3::X, glam::Vec3::Z]);
//! SurfaceDisplacer::new(sampler.clone(), DisplacementConfig::default())
//!     .displace(&mut mesh)
//!     .unwrap();
//!
//! let rgb = ColorClassifier::default().classify(sampler.sample(10.0, 20.0), 10.0);
//! assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)));
//! ```

pub mod color;
pub mod config;
pub mod displace;
mod error;
pub mod grid;
mod sampler;

pub use color::{ColorClassifier, Hsl, smoothstep};
pub use config::{DisplacementConfig, ElevationRange, GridDimensions};
pub use displace::{SurfaceDisplacer, SurfaceMesh, compute_vertex_normals, direction_to_lat_lon};
pub use error::{SurfaceError, SurfaceResult};
pub use grid::{ElevationGrid, ElevationStats, HemisphereStats};
pub use sampler::ElevationSampler;
