//! Long-lived holders of the loaded elevation grid and rotation index.
//!
//! Each service keeps its data in a copy-on-write slot: a load builds the new
//! value completely, then swaps the `Arc` in one step. Readers take an `Arc`
//! snapshot, so a reload never exposes a half-built grid or index and
//! in-flight readers finish on the data they started with.

use std::sync::{Arc, PoisonError, RwLock};

use glam::DMat4;
use paleoglobe_rotation::{
    CatalogSummary, FiniteRotation, PlateRotation, RotationIndex, TimeRange,
};
use paleoglobe_surface::{
    ColorClassifier, DisplacementConfig, ElevationGrid, ElevationRange, ElevationSampler,
    ElevationStats, GridDimensions, SurfaceDisplacer,
};

use crate::cache::Cache;
use crate::client::{Client, Source};
use crate::config::Config;
use crate::error::Result;

/// A value that is replaced whole and read through snapshots.
#[derive(Debug)]
struct Slot<T> {
    value: RwLock<Option<Arc<T>>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }
}

impl<T> Slot<T> {
    fn get(&self) -> Option<Arc<T>> {
        // The slot only ever holds a complete value, so a poisoned lock is
        // still safe to read.
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, value: T) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(value));
    }
}

/// Owns the session's elevation grid and hands out samplers over it.
///
/// Until a grid is loaded every sampler returns sea level, displacers put
/// vertices on the base sphere and colors are those of a flat ocean.
#[derive(Debug, Default)]
pub struct ElevationService {
    grid: Slot<ElevationGrid>,
    dims: GridDimensions,
    displacement: DisplacementConfig,
    colors: ElevationRange,
}

impl ElevationService {
    /// Create an empty service using the grid, displacement and color
    /// settings of `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            grid: Slot::default(),
            dims: config.grid,
            displacement: config.displacement,
            colors: config.colors,
        }
    }

    /// Fetch and install the grid at `source`.
    ///
    /// On failure the error is logged and returned and the previously loaded
    /// grid, if any, stays in place. Calling again retries the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or the payload does not match the
    /// configured grid dimensions.
    pub async fn load<C: Cache>(
        &self,
        client: &Client<C>,
        source: &Source,
    ) -> Result<ElevationStats> {
        match client.fetch_elevation(source, self.dims).await {
            Ok(grid) => {
                tracing::info!(%source, "elevation grid loaded");
                Ok(self.replace(grid))
            }
            Err(e) => {
                tracing::error!(%source, error = %e, "failed to load elevation grid");
                Err(e)
            }
        }
    }

    /// Install a grid the caller already holds.
    pub fn replace(&self, grid: ElevationGrid) -> ElevationStats {
        let stats = grid.stats();
        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            "elevation grid installed"
        );
        tracing::debug!(
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            below_sea_level = stats.below_sea_level,
            north_mean = stats.north.mean,
            south_mean = stats.south.mean,
            "elevation statistics"
        );
        self.grid.set(grid);
        stats
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.grid.get().is_some()
    }

    /// Snapshot of the current grid.
    #[must_use]
    pub fn grid(&self) -> Option<Arc<ElevationGrid>> {
        self.grid.get()
    }

    /// Sampler over the current grid; samples `0.0` while nothing is loaded.
    #[must_use]
    pub fn sampler(&self) -> ElevationSampler {
        self.grid
            .get()
            .map_or_else(ElevationSampler::empty, ElevationSampler::new)
    }

    /// Displacer over the current grid with the configured parameters.
    #[must_use]
    pub fn displacer(&self) -> SurfaceDisplacer {
        SurfaceDisplacer::new(self.sampler(), self.displacement)
    }

    /// Classifier with the configured normalization range.
    #[must_use]
    pub fn classifier(&self) -> ColorClassifier {
        ColorClassifier::new(self.colors)
    }
}

/// Owns the session's rotation index and resolves plate transforms from it.
///
/// Until a catalog is loaded every plate resolves to the identity.
#[derive(Debug, Default)]
pub struct RotationService {
    index: Slot<RotationIndex>,
}

impl RotationService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch, parse and install the catalog at `source`.
    ///
    /// On failure the error is logged and returned and the previous index,
    /// if any, stays in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails, the text is not UTF-8 or the
    /// catalog holds no rotation.
    pub async fn load<C: Cache>(
        &self,
        client: &Client<C>,
        source: &Source,
    ) -> Result<CatalogSummary> {
        match client.fetch_rotations(source).await {
            Ok(index) => {
                tracing::info!(%source, "rotation catalog loaded");
                Ok(self.install(index))
            }
            Err(e) => {
                tracing::error!(%source, error = %e, "failed to load rotation catalog");
                Err(e)
            }
        }
    }

    /// Index `rotations` and install the result.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::EmptyCatalog`](paleoglobe_rotation::RotationError::EmptyCatalog)
    /// for an empty list, keeping the previous index.
    pub fn replace(&self, rotations: Vec<PlateRotation>) -> Result<CatalogSummary> {
        match RotationIndex::build(rotations) {
            Ok(index) => Ok(self.install(index)),
            Err(e) => {
                tracing::error!(error = %e, "rejected rotation catalog");
                Err(e.into())
            }
        }
    }

    fn install(&self, index: RotationIndex) -> CatalogSummary {
        let summary = index.summary();
        tracing::info!(
            rotations = summary.total_rotations,
            plates = summary.unique_plates,
            min_time = summary.time_range.min,
            max_time = summary.time_range.max,
            "rotation index installed"
        );
        self.index.set(index);
        summary
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.index.get().is_some()
    }

    /// Snapshot of the current index.
    #[must_use]
    pub fn index(&self) -> Option<Arc<RotationIndex>> {
        self.index.get()
    }

    /// Time range of the loaded catalog.
    #[must_use]
    pub fn time_range(&self) -> Option<TimeRange> {
        self.index.get().map(|index| index.time_range())
    }

    /// Clamp an animation time into the loaded catalog's range. Without a
    /// catalog the time is returned unchanged.
    #[must_use]
    pub fn clamp_time(&self, time: f64) -> f64 {
        self.index
            .get()
            .map_or(time, |index| index.clamp_time(time))
    }

    /// Interpolated finite rotation of `plate_id` at `time`.
    #[must_use]
    pub fn interpolate(&self, plate_id: u32, time: f64) -> Option<FiniteRotation> {
        self.index.get()?.interpolate(plate_id, time)
    }

    /// Transform of `plate_id` at `time`; identity while nothing is loaded.
    #[must_use]
    pub fn resolve(&self, plate_id: u32, time: f64) -> DMat4 {
        self.index
            .get()
            .map_or(DMat4::IDENTITY, |index| index.resolve(plate_id, time))
    }
}
