//! Bilinear elevation lookup by geographic coordinate.

use std::sync::Arc;

use crate::grid::ElevationGrid;

/// Resolves elevations for arbitrary latitude/longitude pairs.
///
/// A sampler is a cheap handle onto a shared, read-only grid. Without a grid
/// every query answers `0.0` (sea level), which keeps a globe renderable
/// before its elevation payload has arrived.
#[derive(Debug, Clone, Default)]
pub struct ElevationSampler {
    grid: Option<Arc<ElevationGrid>>,
}

impl ElevationSampler {
    /// Create a sampler over a loaded grid.
    #[must_use]
    pub fn new(grid: Arc<ElevationGrid>) -> Self {
        Self { grid: Some(grid) }
    }

    /// Create a sampler with no grid; all samples are `0.0`.
    #[must_use]
    pub fn empty() -> Self {
        Self { grid: None }
    }

    /// Whether a grid backs this sampler.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.grid.is_some()
    }

    /// The backing grid, if any.
    #[must_use]
    pub fn grid(&self) -> Option<&Arc<ElevationGrid>> {
        self.grid.as_ref()
    }

    /// Elevation in meters at (`lat`, `lon`) in degrees.
    ///
    /// Longitude wraps into `[-180, 180)`, latitude clamps into `[-90, 90]`.
    /// The four surrounding cells are blended bilinearly; rows clamp at the
    /// poles and columns never read past the last sample. Returns `0.0` when
    /// no grid is loaded or either coordinate is not finite.
    #[must_use]
    pub fn sample(&self, lat: f64, lon: f64) -> f32 {
        let Some(grid) = self.grid.as_deref() else {
            return 0.0;
        };
        if !lat.is_finite() || !lon.is_finite() {
            return 0.0;
        }

        let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        let lat = lat.clamp(-90.0, 90.0);

        #[allow(clippy::cast_precision_loss)]
        let (max_x, max_y) = ((grid.width() - 1) as f64, (grid.height() - 1) as f64);
        let x = ((lon + 180.0) / 360.0 * max_x).clamp(0.0, max_x);
        let y = ((90.0 - lat) / 180.0 * max_y).clamp(0.0, max_y);

        // Both coordinates are clamped non-negative above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (x0, y0) = (x.floor() as usize, y.floor() as usize);
        let x1 = (x0 + 1).min(grid.width() - 1);
        let y1 = (y0 + 1).min(grid.height() - 1);

        #[allow(clippy::cast_precision_loss)]
        let (fx, fy) = (x - x0 as f64, y - y0 as f64);

        let top = lerp(
            f64::from(grid.cell(y0, x0)),
            f64::from(grid.cell(y0, x1)),
            fx,
        );
        let bottom = lerp(
            f64::from(grid.cell(y1, x0)),
            f64::from(grid.cell(y1, x1)),
            fx,
        );

        #[allow(clippy::cast_possible_truncation)]
        let value = lerp(top, bottom, fy) as f32;
        value
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    // Exact at t == 0 so grid nodes reproduce stored values bit for bit.
    if t == 0.0 { a } else { a + (b - a) * t }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridDimensions;
    use proptest::prelude::*;

    /// 5 columns x 3 rows; value encodes (row, col) as `row * 10 + col`.
    fn indexed_grid() -> Arc<ElevationGrid> {
        let dims = GridDimensions::new(5, 3);
        let samples = (0..3)
            .flat_map(|row| (0..5).map(move |col| (row * 10 + col) as f32))
            .collect();
        Arc::new(ElevationGrid::new(dims, samples).unwrap())
    }

    #[test]
    fn test_empty_sampler_returns_zero() {
        let sampler = ElevationSampler::empty();
        assert!(!sampler.is_loaded());
        assert_eq!(sampler.sample(45.0, 45.0), 0.0);
    }

    #[test]
    fn test_corners_exact() {
        let sampler = ElevationSampler::new(indexed_grid());
        // North-west corner: row 0, col 0.
        assert_eq!(sampler.sample(90.0, -180.0), 0.0);
        // South-west corner: row 2, col 0.
        assert_eq!(sampler.sample(-90.0, -180.0), 20.0);
    }

    #[test]
    fn test_interior_node_exact() {
        let sampler = ElevationSampler::new(indexed_grid());
        // Column 2 of 0..=4 sits at lon 0; row 1 of 0..=2 sits at lat 0.
        assert_eq!(sampler.sample(0.0, 0.0), 12.0);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let sampler = ElevationSampler::new(indexed_grid());
        // Halfway between rows 0 and 1, halfway between cols 0 and 1.
        // Corners 0, 1, 10, 11 -> mean 5.5.
        let value = sampler.sample(45.0, -135.0);
        assert!((value - 5.5).abs() < 1e-5, "got {value}");
    }

    #[test]
    fn test_latitude_clamped() {
        let sampler = ElevationSampler::new(indexed_grid());
        assert_eq!(sampler.sample(120.0, -180.0), sampler.sample(90.0, -180.0));
        assert_eq!(sampler.sample(-95.0, -180.0), sampler.sample(-90.0, -180.0));
    }

    #[test]
    fn test_longitude_wraps() {
        let sampler = ElevationSampler::new(indexed_grid());
        assert_eq!(sampler.sample(30.0, 190.0), sampler.sample(30.0, -170.0));
        assert_eq!(sampler.sample(30.0, -540.0), sampler.sample(30.0, -180.0));
    }

    #[test]
    fn test_antimeridian_seam() {
        let sampler = ElevationSampler::new(indexed_grid());
        assert_eq!(sampler.sample(10.0, 180.0), sampler.sample(10.0, -180.0));
    }

    #[test]
    fn test_non_finite_input() {
        let sampler = ElevationSampler::new(indexed_grid());
        assert_eq!(sampler.sample(f64::NAN, 0.0), 0.0);
        assert_eq!(sampler.sample(0.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = ElevationGrid::new(GridDimensions::new(1, 1), vec![42.0]).unwrap();
        let sampler = ElevationSampler::new(Arc::new(grid));
        assert_eq!(sampler.sample(12.0, 170.0), 42.0);
    }

    proptest! {
        #[test]
        fn prop_sample_is_finite(lat in -90.0f64..=90.0, lon in -1000.0f64..1000.0) {
            let sampler = ElevationSampler::new(indexed_grid());
            prop_assert!(sampler.sample(lat, lon).is_finite());
        }

        #[test]
        fn prop_sample_within_grid_bounds(lat in -90.0f64..=90.0, lon in -180.0f64..180.0) {
            let sampler = ElevationSampler::new(indexed_grid());
            let value = sampler.sample(lat, lon);
            prop_assert!((0.0..=24.0).contains(&value));
        }

        #[test]
        fn prop_antimeridian_continuity(lat in -90.0f64..=90.0) {
            let sampler = ElevationSampler::new(indexed_grid());
            let east = sampler.sample(lat, 180.0);
            let west = sampler.sample(lat, -180.0);
            prop_assert!((east - west).abs() < 1e-4);
        }
    }
}
