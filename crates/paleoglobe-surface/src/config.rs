//! Tunable constants for grids, displacement and coloring.

use serde::{Deserialize, Serialize};

/// Default grid width (longitude samples) of the simplified ETOPO1 payload.
pub const DEFAULT_GRID_WIDTH: usize = 1200;
/// Default grid height (latitude samples) of the simplified ETOPO1 payload.
pub const DEFAULT_GRID_HEIGHT: usize = 600;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f32 = 6_371_000.0;

/// Size of an elevation raster.
///
/// The payload carries no header, so producer and consumer must agree on
/// these values out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Samples per row (longitude axis).
    pub width: usize,
    /// Number of rows (latitude axis).
    pub height: usize,
}

impl GridDimensions {
    /// Create dimensions for a `width x height` raster.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of samples in the raster, or `None` on overflow.
    #[must_use]
    pub fn sample_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Expected payload size in bytes, or `None` on overflow.
    #[must_use]
    pub fn byte_len(&self) -> Option<usize> {
        self.sample_count()?.checked_mul(std::mem::size_of::<f32>())
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

/// Parameters for radial displacement of sphere vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplacementConfig {
    /// Radius of the sea-level sphere in scene units.
    pub base_radius: f32,
    /// Planetary radius in meters; elevations are taken relative to it.
    pub earth_radius_meters: f32,
    /// Display-only multiplier on elevation. `1.0` is true scale.
    pub exaggeration: f32,
}

impl DisplacementConfig {
    /// Set the sea-level radius.
    #[must_use]
    pub fn with_base_radius(mut self, base_radius: f32) -> Self {
        self.base_radius = base_radius;
        self
    }

    /// Set the planetary radius in meters.
    #[must_use]
    pub fn with_earth_radius(mut self, earth_radius_meters: f32) -> Self {
        self.earth_radius_meters = earth_radius_meters;
        self
    }

    /// Set the elevation exaggeration multiplier.
    #[must_use]
    pub fn with_exaggeration(mut self, exaggeration: f32) -> Self {
        self.exaggeration = exaggeration;
        self
    }

    /// Radial distance of a vertex whose ground sits at `elevation_meters`.
    #[must_use]
    pub fn radius_at(&self, elevation_meters: f32) -> f32 {
        self.base_radius
            * (1.0 + elevation_meters * self.exaggeration / self.earth_radius_meters)
    }
}

impl Default for DisplacementConfig {
    fn default() -> Self {
        Self {
            base_radius: 5.0,
            earth_radius_meters: EARTH_RADIUS_METERS,
            exaggeration: 1.0,
        }
    }
}

/// Elevation extremes used to normalize heights for coloring.
///
/// Defaults are the summit of Everest and the bottom of the Mariana Trench.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationRange {
    /// Highest elevation in meters (maps to `1.0`).
    pub max_elevation: f32,
    /// Lowest elevation in meters (maps to `-1.0`).
    pub min_elevation: f32,
}

impl ElevationRange {
    /// Create a range from explicit extremes.
    #[must_use]
    pub const fn new(max_elevation: f32, min_elevation: f32) -> Self {
        Self {
            max_elevation,
            min_elevation,
        }
    }

    /// Normalize an elevation: negative values against `|min|`, the rest against `max`.
    #[must_use]
    pub fn normalize(&self, elevation_meters: f32) -> f32 {
        if elevation_meters < 0.0 {
            elevation_meters / self.min_elevation.abs()
        } else {
            elevation_meters / self.max_elevation
        }
    }
}

impl Default for ElevationRange {
    fn default() -> Self {
        Self::new(8848.0, -11034.0)
    }
}
