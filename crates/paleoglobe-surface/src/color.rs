//! Altitude and latitude driven surface coloring.
//!
//! Colors come from a piecewise ramp of HSL anchors. Every segment eases its
//! local progress through a cubic smooth-step before interpolating, so the
//! ramp has no visible seams where one band hands over to the next.
//!
//! | Band | Normalized elevation `e'` | Ramp |
//! |------|---------------------------|------|
//! | Ocean | `elevation <= 0` | shallow blue -> deep blue over `|e'|` |
//! | Coast | `[0, 0.05)` | beach -> lowland green |
//! | Lowland | `[0.05, 0.4)` | lowland green -> forest green |
//! | Highland | `[0.4, snow)` | forest green -> rock brown |
//! | Snow line | `[snow, snow + 0.1)` | rock brown -> snow |
//! | Summit | `[snow + 0.1, 1]` | snow -> glacier white |
//!
//! The snow line drops from `0.6` at the equator to `0.2` at the poles. Past
//! 45 degrees it sits below `0.4`, the highland band disappears and the snow
//! band starts from the lowland color at the snow line instead of rock.

use glam::Vec3;

use crate::config::ElevationRange;
use crate::displace::{SurfaceMesh, direction_to_lat_lon};
use crate::sampler::ElevationSampler;

const COAST_END: f32 = 0.05;
const LOWLAND_END: f32 = 0.4;
const SNOW_BAND: f32 = 0.1;
const SNOW_LINE_EQUATOR: f32 = 0.6;
const SNOW_LINE_POLAR_DROP: f32 = 0.4;

const OCEAN_SHALLOW: Hsl = Hsl::new(0.55, 0.75, 0.55);
const OCEAN_DEEP: Hsl = Hsl::new(0.64, 0.9, 0.12);
const BEACH: Hsl = Hsl::new(0.12, 0.45, 0.72);
const LOWLAND: Hsl = Hsl::new(0.28, 0.6, 0.42);
const FOREST: Hsl = Hsl::new(0.33, 0.55, 0.26);
const ROCK: Hsl = Hsl::new(0.08, 0.45, 0.33);
const SNOW: Hsl = Hsl::new(0.55, 0.15, 0.9);
const GLACIER: Hsl = Hsl::new(0.55, 0.05, 0.98);

/// Cubic smooth-step `x^2 (3 - 2x)` on `x` clamped to `[0, 1]`.
#[must_use]
pub fn smoothstep(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// A color in hue/saturation/lightness space, all components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Interpolate toward `other`, taking the short way around the hue circle.
    #[must_use]
    pub fn lerp(self, other: Hsl, t: f32) -> Hsl {
        let (mut from, mut to) = (self.h, other.h);
        let delta = to - from;
        if delta > 0.5 {
            from += 1.0;
        } else if delta < -0.5 {
            to += 1.0;
        }

        Hsl {
            h: (from + (to - from) * t).rem_euclid(1.0),
            s: self.s + (other.s - self.s) * t,
            l: self.l + (other.l - self.l) * t,
        }
    }

    /// Convert to RGB with each channel in `[0, 1]`.
    #[must_use]
    pub fn to_rgb(self) -> [f32; 3] {
        let h = self.h.rem_euclid(1.0);
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return [l, l, l];
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        ]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    let value = if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    };
    value.clamp(0.0, 1.0)
}

/// Ease from `from` to `to` as `x` moves across `[start, end]`.
fn ramp(from: Hsl, to: Hsl, x: f32, start: f32, end: f32) -> Hsl {
    let progress = if end > start {
        (x - start) / (end - start)
    } else {
        1.0
    };
    from.lerp(to, smoothstep(progress))
}

/// Maps elevation and latitude to display colors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorClassifier {
    range: ElevationRange,
}

impl ColorClassifier {
    /// Create a classifier normalizing elevations against `range`.
    #[must_use]
    pub fn new(range: ElevationRange) -> Self {
        Self { range }
    }

    /// The normalization range in use.
    #[must_use]
    pub fn range(&self) -> ElevationRange {
        self.range
    }

    /// Normalized elevation at which snow starts for a latitude in degrees.
    #[must_use]
    pub fn snow_line(latitude: f64) -> f32 {
        #[allow(clippy::cast_possible_truncation)]
        let polar = (latitude.clamp(-90.0, 90.0).abs() / 90.0) as f32;
        SNOW_LINE_EQUATOR - SNOW_LINE_POLAR_DROP * polar
    }

    /// RGB color for a surface point.
    ///
    /// Ocean colors (`elevation <= 0`) depend on depth only. Land colors
    /// depend on height and, through the snow line, on latitude.
    #[must_use]
    pub fn classify(&self, elevation_meters: f32, latitude: f64) -> [f32; 3] {
        self.classify_hsl(elevation_meters, latitude).to_rgb()
    }

    /// Same as [`classify`](Self::classify), before RGB conversion.
    #[must_use]
    pub fn classify_hsl(&self, elevation_meters: f32, latitude: f64) -> Hsl {
        let normalized = self.range.normalize(elevation_meters);

        if elevation_meters <= 0.0 {
            let depth = normalized.abs();
            return ramp(OCEAN_SHALLOW, OCEAN_DEEP, depth, 0.0, 1.0);
        }

        let snow = Self::snow_line(latitude);
        if normalized < snow.min(LOWLAND_END) {
            return lowland(normalized);
        }
        if normalized < snow {
            return ramp(FOREST, ROCK, normalized, LOWLAND_END, snow);
        }

        let summit_start = snow + SNOW_BAND;
        if normalized < summit_start {
            let bare = if snow > LOWLAND_END { ROCK } else { lowland(snow) };
            ramp(bare, SNOW, normalized, snow, summit_start)
        } else {
            ramp(SNOW, GLACIER, normalized, summit_start, 1.0)
        }
    }

    /// Per-vertex colors for a mesh, sampling elevation along each vertex direction.
    #[must_use]
    pub fn colorize(&self, mesh: &SurfaceMesh, sampler: &ElevationSampler) -> Vec<[f32; 3]> {
        mesh.positions
            .iter()
            .map(|&p| {
                let (lat, lon) = direction_to_lat_lon(p.normalize_or(Vec3::Y));
                self.classify(sampler.sample(lat, lon), lat)
            })
            .collect()
    }
}

/// Beach and lowland ramps, saturating at forest green from `0.4` up.
fn lowland(normalized: f32) -> Hsl {
    if normalized < COAST_END {
        ramp(BEACH, LOWLAND, normalized, 0.0, COAST_END)
    } else {
        ramp(LOWLAND, FOREST, normalized, COAST_END, LOWLAND_END)
    }
}
