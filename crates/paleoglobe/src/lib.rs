//! Loading and serving the data behind an animated paleogeographic globe.
//!
//! This crate ties the pure [`paleoglobe_surface`] and
//! [`paleoglobe_rotation`] crates to the outside world: an async client that
//! fetches elevation grids and rotation catalogs over HTTP or from disk, a
//! pluggable payload cache, and long-lived services that hold the loaded data
//! and hand out samplers, displacers, classifiers and plate transforms.
//!
//! # Design principles
//!
//! - **Web-compatible**: URL sources work on desktop and WASM via reqwest;
//!   file sources are native only and read synchronously
//! - **Runtime-agnostic**: Returns `impl Future`, works with any executor
//! - **Atomic reloads**: Services swap whole values, readers keep snapshots
//!
//! # Example
//!
//! ```ignore
//! use paleoglobe::{Client, Config, ElevationService, RotationService};
//!
//! let config = Config::default().with_base_url("https://data.example.org/");
//! let client = Client::new().with_base_url(config.base_url.clone().unwrap());
//!
//! let elevation = ElevationService::new(&config);
//! elevation.load(&client, &config.elevation_source()).await?;
//!
//! let rotations = RotationService::new();
//! rotations.load(&client, &config.rotation_source()).await?;
//!
//! let mut mesh = build_sphere_mesh();
//! elevation.displacer().displace(&mut mesh)?;
//! let colors = elevation.classifier().colorize(&mesh, &elevation.sampler());
//! let transform = rotations.resolve(101, -50.0);
//! ```

pub mod cache;
mod client;
pub mod config;
mod error;
mod service;

pub use cache::{Cache, MemoryCache, NoCache};
pub use client::{Client, Source};
pub use config::Config;
pub use error::{Error, Result};
pub use service::{ElevationService, RotationService};

// Re-export the data types callers work with.
pub use paleoglobe_rotation::{
    CatalogSummary, FiniteRotation, PlateRotation, RotationError, RotationIndex, TimeRange,
    parse_catalog,
};
pub use paleoglobe_surface::{
    ColorClassifier, DisplacementConfig, ElevationGrid, ElevationRange, ElevationSampler,
    ElevationStats, GridDimensions, SurfaceDisplacer, SurfaceError, SurfaceMesh,
};
