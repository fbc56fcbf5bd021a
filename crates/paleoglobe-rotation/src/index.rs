//! Rotations grouped by plate and ordered by time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RotationError, RotationResult};

/// Finite rotation of one plate relative to another at a geological time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateRotation {
    /// Moving plate.
    pub plate_id: u32,
    /// Time in millions of years; negative values lie in the past.
    pub time: f64,
    /// Rotation pole latitude in degrees.
    pub lat: f64,
    /// Rotation pole longitude in degrees.
    pub lon: f64,
    /// Rotation angle in degrees.
    pub angle: f64,
    /// Fixed plate the rotation is relative to.
    pub reference_plate_id: u32,
    pub comment: String,
}

/// Closed interval of catalog times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    /// Whether `time` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        (self.min..=self.max).contains(&time)
    }

    /// Clamp `time` into the range. NaN stays NaN.
    #[must_use]
    pub fn clamp(&self, time: f64) -> f64 {
        time.clamp(self.min, self.max)
    }

    /// Length of the range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Headline numbers of a loaded catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total_rotations: usize,
    pub unique_plates: usize,
    pub time_range: TimeRange,
}

/// Rotation keyframes per plate, each plate's list ascending by time.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationIndex {
    plates: BTreeMap<u32, Vec<PlateRotation>>,
    time_range: TimeRange,
    len: usize,
}

impl RotationIndex {
    /// Group `rotations` by plate and sort every group by time.
    ///
    /// The sort is stable, so keyframes sharing a time keep their input
    /// order. Rotations whose time is not finite cannot be ordered and are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::EmptyCatalog`] if no rotation remains.
    pub fn build(rotations: Vec<PlateRotation>) -> RotationResult<Self> {
        let mut plates: BTreeMap<u32, Vec<PlateRotation>> = BTreeMap::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut len = 0;

        for rotation in rotations {
            if !rotation.time.is_finite() {
                tracing::debug!(
                    plate_id = rotation.plate_id,
                    "dropping rotation with non-finite time"
                );
                continue;
            }
            min = min.min(rotation.time);
            max = max.max(rotation.time);
            len += 1;
            plates.entry(rotation.plate_id).or_default().push(rotation);
        }

        if len == 0 {
            return Err(RotationError::EmptyCatalog);
        }

        for keyframes in plates.values_mut() {
            keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        }

        tracing::debug!(
            rotations = len,
            plates = plates.len(),
            min_time = min,
            max_time = max,
            "built rotation index"
        );

        Ok(Self {
            plates,
            time_range: TimeRange { min, max },
            len,
        })
    }

    /// Earliest and latest time across all plates.
    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    /// Keyframes of `plate_id`, ascending by time.
    #[must_use]
    pub fn rotations(&self, plate_id: u32) -> Option<&[PlateRotation]> {
        self.plates.get(&plate_id).map(Vec::as_slice)
    }

    /// Plate identifiers in ascending order.
    pub fn plate_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.plates.keys().copied()
    }

    #[must_use]
    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    /// Total number of rotations across all plates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: an index holds at least one rotation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn contains(&self, plate_id: u32) -> bool {
        self.plates.contains_key(&plate_id)
    }

    /// Clamp a query time into the catalog's time range.
    #[must_use]
    pub fn clamp_time(&self, time: f64) -> f64 {
        self.time_range.clamp(time)
    }

    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            total_rotations: self.len,
            unique_plates: self.plates.len(),
            time_range: self.time_range,
        }
    }
}
