//! Elevation raster storage.
//!
//! The raster is row-major, rows run from the north pole (row 0) to the south
//! pole, columns run eastward from longitude -180.

use crate::config::GridDimensions;
use crate::error::{SurfaceError, SurfaceResult};
use serde::Serialize;

/// Immutable raster of elevations in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    dims: GridDimensions,
    samples: Vec<f32>,
}

impl ElevationGrid {
    /// Create a grid from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or if `samples` does not
    /// hold exactly `width * height` values.
    pub fn new(dims: GridDimensions, samples: Vec<f32>) -> SurfaceResult<Self> {
        let expected = checked_sample_count(dims)?;
        if samples.len() != expected {
            return Err(SurfaceError::PayloadSizeMismatch {
                expected: expected * 4,
                actual: samples.len() * 4,
            });
        }
        Ok(Self { dims, samples })
    }

    /// Decode a headerless payload of little-endian `f32` values.
    ///
    /// # Format
    ///
    /// `height` rows of `width` IEEE-754 single-precision floats, no padding.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidDimensions`] for empty or overflowing
    /// dimensions and [`SurfaceError::PayloadSizeMismatch`] unless the payload
    /// is exactly `width * height * 4` bytes.
    pub fn from_le_bytes(dims: GridDimensions, payload: &[u8]) -> SurfaceResult<Self> {
        let expected = checked_sample_count(dims)? * 4;
        if payload.len() != expected {
            return Err(SurfaceError::PayloadSizeMismatch {
                expected,
                actual: payload.len(),
            });
        }

        let samples = payload
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok(Self { dims, samples })
    }

    /// Samples per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    /// Grid dimensions.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    /// Elevation stored at `(row, col)`.
    ///
    /// Indices past the last row or column clamp to the edge. Cells holding
    /// NaN or infinities read as `0.0`.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> f32 {
        let row = row.min(self.dims.height - 1);
        let col = col.min(self.dims.width - 1);
        let value = self.samples[row * self.dims.width + col];
        if value.is_finite() { value } else { 0.0 }
    }

    /// Latitude in degrees at the center line of `row`.
    #[must_use]
    pub fn row_latitude(&self, row: usize) -> f64 {
        if self.dims.height == 1 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let t = row.min(self.dims.height - 1) as f64 / (self.dims.height - 1) as f64;
        90.0 - t * 180.0
    }

    /// Summary statistics over all finite cells.
    #[must_use]
    pub fn stats(&self) -> ElevationStats {
        let mut global = Accumulator::default();
        let mut north = Accumulator::default();
        let mut south = Accumulator::default();
        let mut below_sea_level = 0;
        let mut above_sea_level = 0;

        for (row, values) in self.samples.chunks_exact(self.dims.width).enumerate() {
            let northern = self.row_latitude(row) >= 0.0;
            for &value in values {
                if !value.is_finite() {
                    continue;
                }
                global.push(value);
                if northern {
                    north.push(value);
                } else {
                    south.push(value);
                }
                if value < 0.0 {
                    below_sea_level += 1;
                } else if value > 0.0 {
                    above_sea_level += 1;
                }
            }
        }

        let global = global.finish();
        ElevationStats {
            min: global.min,
            max: global.max,
            mean: global.mean,
            finite_cells: global.count,
            below_sea_level,
            above_sea_level,
            north: north.finish(),
            south: south.finish(),
        }
    }
}

fn checked_sample_count(dims: GridDimensions) -> SurfaceResult<usize> {
    let invalid = || SurfaceError::InvalidDimensions {
        width: dims.width,
        height: dims.height,
    };
    if dims.width == 0 || dims.height == 0 {
        return Err(invalid());
    }
    // Byte length must also fit, since payloads are validated in bytes.
    dims.byte_len().ok_or_else(invalid)?;
    dims.sample_count().ok_or_else(invalid)
}

/// Min/max/mean over a set of cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HemisphereStats {
    /// Lowest elevation, `0.0` when no cell was counted.
    pub min: f32,
    /// Highest elevation, `0.0` when no cell was counted.
    pub max: f32,
    /// Mean elevation, `0.0` when no cell was counted.
    pub mean: f64,
    /// Number of finite cells counted.
    pub count: usize,
}

/// Load-time statistics of an elevation grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    pub finite_cells: usize,
    /// Cells strictly below zero.
    pub below_sea_level: usize,
    /// Cells strictly above zero.
    pub above_sea_level: usize,
    /// Rows at or north of the equator.
    pub north: HemisphereStats,
    /// Rows south of the equator.
    pub south: HemisphereStats,
}

#[derive(Default)]
struct Accumulator {
    min: Option<f32>,
    max: Option<f32>,
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f32) {
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
        self.sum += f64::from(value);
        self.count += 1;
    }

    fn finish(self) -> HemisphereStats {
        #[allow(clippy::cast_precision_loss)]
        let mean = if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        };
        HemisphereStats {
            min: self.min.unwrap_or(0.0),
            max: self.max.unwrap_or(0.0),
            mean,
            count: self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_from_le_bytes_row_major() {
        let dims = GridDimensions::new(3, 2);
        let grid =
            ElevationGrid::from_le_bytes(dims, &payload(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cell(0, 0), 1.0);
        assert_eq!(grid.cell(0, 2), 3.0);
        assert_eq!(grid.cell(1, 0), 4.0);
        assert_eq!(grid.cell(1, 2), 6.0);
    }

    #[test]
    fn test_from_le_bytes_size_mismatch() {
        let dims = GridDimensions::new(3, 2);
        let result = ElevationGrid::from_le_bytes(dims, &payload(&[1.0, 2.0, 3.0]));
        assert_eq!(
            result,
            Err(SurfaceError::PayloadSizeMismatch {
                expected: 24,
                actual: 12
            })
        );
    }

    #[test]
    fn test_from_le_bytes_trailing_byte() {
        let dims = GridDimensions::new(1, 1);
        let mut bytes = payload(&[1.0]);
        bytes.push(0);
        let result = ElevationGrid::from_le_bytes(dims, &bytes);
        assert!(matches!(
            result,
            Err(SurfaceError::PayloadSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let result = ElevationGrid::new(GridDimensions::new(0, 4), Vec::new());
        assert!(matches!(
            result,
            Err(SurfaceError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let dims = GridDimensions::new(usize::MAX / 2, 3);
        assert_eq!(
            ElevationGrid::new(dims, Vec::new()),
            Err(SurfaceError::InvalidDimensions {
                width: usize::MAX / 2,
                height: 3,
            })
        );

        // Sample count fits but the byte length does not.
        let dims = GridDimensions::new(usize::MAX / 4 + 1, 1);
        assert!(matches!(
            ElevationGrid::from_le_bytes(dims, &[]),
            Err(SurfaceError::InvalidDimensions { height: 1, .. })
        ));
    }

    #[test]
    fn test_cell_clamps_and_coerces() {
        let grid =
            ElevationGrid::new(GridDimensions::new(2, 2), vec![1.0, f32::NAN, 3.0, 4.0]).unwrap();
        assert_eq!(grid.cell(0, 1), 0.0);
        assert_eq!(grid.cell(10, 10), 4.0);
        assert_eq!(grid.cell(0, 10), 0.0);
    }

    #[test]
    fn test_row_latitude() {
        let grid = ElevationGrid::new(GridDimensions::new(1, 3), vec![0.0; 3]).unwrap();
        assert!((grid.row_latitude(0) - 90.0).abs() < 1e-12);
        assert!(grid.row_latitude(1).abs() < 1e-12);
        assert!((grid.row_latitude(2) + 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_hemispheres() {
        // Rows at latitudes 90, 0, -90.
        let grid = ElevationGrid::new(
            GridDimensions::new(2, 3),
            vec![100.0, 200.0, -50.0, 50.0, -4000.0, f32::NAN],
        )
        .unwrap();
        let stats = grid.stats();

        assert_eq!(stats.finite_cells, 5);
        assert_eq!(stats.min, -4000.0);
        assert_eq!(stats.max, 200.0);
        assert_eq!(stats.below_sea_level, 2);
        assert_eq!(stats.above_sea_level, 3);
        assert_eq!(stats.north.count, 4);
        assert_eq!(stats.north.min, -50.0);
        assert!((stats.north.mean - 75.0).abs() < 1e-9);
        assert_eq!(stats.south.count, 1);
        assert_eq!(stats.south.max, -4000.0);
    }
}
