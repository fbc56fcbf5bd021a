//! Keyframe interpolation and rotation matrix construction.

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::index::{PlateRotation, RotationIndex};

/// A rotation by `angle` degrees about the pole at (`lat`, `lon`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiniteRotation {
    pub lat: f64,
    pub lon: f64,
    pub angle: f64,
}

impl FiniteRotation {
    #[must_use]
    pub const fn new(lat: f64, lon: f64, angle: f64) -> Self {
        Self { lat, lon, angle }
    }

    /// Blend each parameter linearly. `t == 0` returns `self` unchanged.
    ///
    /// Pole coordinates are treated as plain numbers, not as a point on the
    /// sphere, so wide gaps between keyframes do not follow a great circle.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        if t == 0.0 {
            return self;
        }
        Self {
            lat: self.lat + t * (other.lat - self.lat),
            lon: self.lon + t * (other.lon - self.lon),
            angle: self.angle + t * (other.angle - self.angle),
        }
    }

    /// Unit vector of the rotation pole.
    ///
    /// Z is the polar axis; the pole is tilted by `lat` about Y and then
    /// swung by `lon` about Z.
    #[must_use]
    pub fn axis(&self) -> DVec3 {
        let swing = DQuat::from_rotation_z(self.lon.to_radians())
            * DQuat::from_rotation_y(self.lat.to_radians());
        swing * DVec3::Z
    }

    /// Rotation matrix `Rz(lon) * Ry(lat) * Rz(angle) * Ry(-lat) * Rz(-lon)`.
    ///
    /// The outer factors carry the pole to the polar axis and back, so the
    /// result turns space by `angle` about [`axis`](Self::axis).
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        let angle = self.angle.to_radians();

        DMat4::from_rotation_z(lon)
            * DMat4::from_rotation_y(lat)
            * DMat4::from_rotation_z(angle)
            * DMat4::from_rotation_y(-lat)
            * DMat4::from_rotation_z(-lon)
    }
}

impl From<&PlateRotation> for FiniteRotation {
    fn from(rotation: &PlateRotation) -> Self {
        Self::new(rotation.lat, rotation.lon, rotation.angle)
    }
}

impl RotationIndex {
    /// Finite rotation of `plate_id` at `time`.
    ///
    /// Returns `None` for an unknown plate or a time before the plate's first
    /// keyframe. At or after the last keyframe its parameters are returned
    /// unchanged. In between, the two bracketing keyframes are blended
    /// linearly by their time offset.
    #[must_use]
    pub fn interpolate(&self, plate_id: u32, time: f64) -> Option<FiniteRotation> {
        let keyframes = self.rotations(plate_id)?;

        let after = keyframes.partition_point(|r| r.time <= time);
        let r1 = keyframes.get(after.checked_sub(1)?)?;
        let Some(r2) = keyframes.get(after) else {
            return Some(FiniteRotation::from(r1));
        };

        // r2.time > time >= r1.time, so the span is positive.
        let t = (time - r1.time) / (r2.time - r1.time);
        Some(FiniteRotation::from(r1).lerp(FiniteRotation::from(r2), t))
    }

    /// Rotation matrix for `plate_id` at `time`, identity when undefined.
    #[must_use]
    pub fn resolve(&self, plate_id: u32, time: f64) -> DMat4 {
        self.interpolate(plate_id, time)
            .map_or(DMat4::IDENTITY, |rotation| rotation.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keyframe(plate_id: u32, time: f64, lat: f64, lon: f64, angle: f64) -> PlateRotation {
        PlateRotation {
            plate_id,
            time,
            lat,
            lon,
            angle,
            reference_plate_id: 0,
            comment: String::new(),
        }
    }

    fn two_keyframe_index() -> RotationIndex {
        RotationIndex::build(vec![
            keyframe(101, 0.0, 0.0, 0.0, 0.0),
            keyframe(101, -100.0, 10.0, 20.0, 30.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let matrix = FiniteRotation::new(35.0, -120.0, 0.0).to_matrix();
        assert!(matrix.abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }

    #[test]
    fn test_matrix_matches_axis_angle() {
        let rotation = FiniteRotation::new(48.0, -33.0, 71.0);
        let expected = DMat4::from_axis_angle(rotation.axis(), rotation.angle.to_radians());
        assert!(rotation.to_matrix().abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn test_matrix_fixes_pole() {
        let rotation = FiniteRotation::new(-20.0, 140.0, 55.0);
        let pole = rotation.axis();
        let moved = rotation.to_matrix().transform_vector3(pole);
        assert!(moved.abs_diff_eq(pole, 1e-12));
    }

    #[test]
    fn test_pole_at_origin_rotates_about_z() {
        let matrix = FiniteRotation::new(0.0, 0.0, 90.0).to_matrix();
        let moved = matrix.transform_vector3(DVec3::X);
        assert!(moved.abs_diff_eq(DVec3::Y, 1e-12));
    }

    #[test]
    fn test_interpolate_midpoint() {
        let rotation = two_keyframe_index().interpolate(101, -50.0).unwrap();
        assert!((rotation.lat - 5.0).abs() < 1e-12);
        assert!((rotation.lon - 10.0).abs() < 1e-12);
        assert!((rotation.angle - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_midpoint_matrix() {
        let matrix = two_keyframe_index().resolve(101, -50.0);
        let expected = FiniteRotation::new(5.0, 10.0, 15.0).to_matrix();
        assert!(matrix.abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn test_exact_keyframe() {
        let index = two_keyframe_index();
        let expected = FiniteRotation::new(10.0, 20.0, 30.0);
        assert_eq!(index.interpolate(101, -100.0), Some(expected));
        assert_eq!(index.resolve(101, -100.0), expected.to_matrix());
    }

    #[test]
    fn test_before_first_keyframe_is_identity() {
        let index = two_keyframe_index();
        assert_eq!(index.interpolate(101, -150.0), None);
        assert_eq!(index.resolve(101, -150.0), DMat4::IDENTITY);
    }

    #[test]
    fn test_past_last_keyframe_holds() {
        let index = RotationIndex::build(vec![
            keyframe(5, -80.0, 1.0, 2.0, 3.0),
            keyframe(5, -40.0, 4.0, 5.0, 6.0),
        ])
        .unwrap();
        assert_eq!(
            index.interpolate(5, 0.0),
            Some(FiniteRotation::new(4.0, 5.0, 6.0))
        );
    }

    #[test]
    fn test_unknown_plate_is_identity() {
        let index = two_keyframe_index();
        assert_eq!(index.interpolate(999, -50.0), None);
        assert_eq!(index.resolve(999, -50.0), DMat4::IDENTITY);
    }

    #[test]
    fn test_nan_time_is_identity() {
        assert_eq!(two_keyframe_index().resolve(101, f64::NAN), DMat4::IDENTITY);
    }

    #[test]
    fn test_duplicate_times_use_later_keyframe() {
        let index = RotationIndex::build(vec![
            keyframe(9, -10.0, 0.0, 0.0, 1.0),
            keyframe(9, -10.0, 0.0, 0.0, 2.0),
            keyframe(9, 0.0, 0.0, 0.0, 4.0),
        ])
        .unwrap();
        assert_eq!(index.interpolate(9, -10.0).map(|r| r.angle), Some(2.0));
        let halfway = index.interpolate(9, -5.0).unwrap();
        assert!((halfway.angle - 3.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_keyframes_are_exact(
            times in proptest::collection::btree_set(-500i32..=0, 1..8),
            angle_seed in -180.0f64..180.0,
        ) {
            let rotations: Vec<PlateRotation> = times
                .iter()
                .map(|&t| {
                    let t = f64::from(t);
                    keyframe(1, t, t / 10.0, angle_seed + t, angle_seed - t)
                })
                .collect();
            let index = RotationIndex::build(rotations.clone()).unwrap();

            for rotation in &rotations {
                prop_assert_eq!(
                    index.interpolate(1, rotation.time),
                    Some(FiniteRotation::from(rotation))
                );
            }
        }

        #[test]
        fn prop_angle_between_neighbors(
            a in -90.0f64..90.0,
            b in -90.0f64..90.0,
            fraction in 0.0f64..1.0,
        ) {
            let index = RotationIndex::build(vec![
                keyframe(3, -60.0, 0.0, 0.0, a),
                keyframe(3, -20.0, 0.0, 0.0, b),
            ])
            .unwrap();
            let angle = index.interpolate(3, -60.0 + 40.0 * fraction).unwrap().angle;
            prop_assert!(angle >= a.min(b) - 1e-9 && angle <= a.max(b) + 1e-9);
        }

        #[test]
        fn prop_resolve_is_rotation(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            angle in -360.0f64..=360.0,
        ) {
            let matrix = FiniteRotation::new(lat, lon, angle).to_matrix();
            prop_assert!((matrix.determinant() - 1.0).abs() < 1e-9);
            let v = DVec3::new(0.3, -0.4, 0.5);
            prop_assert!((matrix.transform_vector3(v).length() - v.length()).abs() < 1e-9);
        }
    }
}
