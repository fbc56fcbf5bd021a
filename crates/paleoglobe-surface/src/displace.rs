//! Radial displacement of sphere meshes by sampled elevation.

use glam::Vec3;

use crate::config::DisplacementConfig;
use crate::error::{SurfaceError, SurfaceResult};
use crate::sampler::ElevationSampler;

/// Caller-owned geometry buffers of a sphere mesh.
///
/// `indices` describes a triangle list. When it is empty the positions are
/// read as a non-indexed triangle list (three consecutive vertices per face).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Create an indexed mesh. Normals start zeroed.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let normals = vec![Vec3::ZERO; positions.len()];
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Create a non-indexed mesh. Normals start zeroed.
    #[must_use]
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self::new(positions, Vec::new())
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Check that the buffers describe whole triangles with valid indices.
    ///
    /// # Errors
    ///
    /// Returns an error if a buffer length is not a multiple of 3 or an index
    /// is out of range.
    pub fn validate(&self) -> SurfaceResult<()> {
        if self.indices.is_empty() {
            if !self.positions.len().is_multiple_of(3) {
                return Err(SurfaceError::BufferLengthMismatch {
                    context: "non-indexed positions",
                    expected: 3,
                    actual: self.positions.len(),
                });
            }
            return Ok(());
        }

        if !self.indices.len().is_multiple_of(3) {
            return Err(SurfaceError::BufferLengthMismatch {
                context: "indices",
                expected: 3,
                actual: self.indices.len(),
            });
        }
        if let Some(&bad) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(SurfaceError::IndexOutOfBounds {
                index: bad as usize,
                len: self.positions.len(),
            });
        }
        Ok(())
    }
}

/// Convert a unit direction to (latitude, longitude) in degrees.
///
/// Y is the polar axis; longitude 0 lies along +Z and increases toward +X.
#[must_use]
pub fn direction_to_lat_lon(dir: Vec3) -> (f64, f64) {
    let (x, y, z) = (f64::from(dir.x), f64::from(dir.y), f64::from(dir.z));
    let lat = y.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = x.atan2(z).to_degrees();
    (lat, lon)
}

/// Recompute per-vertex normals from positions.
///
/// Face normals are accumulated (area weighted) onto every vertex of the face
/// and normalized. Non-indexed meshes get their flat face normal on each
/// corner. Vertices touched by no face, or only by degenerate faces, get a
/// zero normal.
#[must_use]
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    let mut accumulate = |a: usize, b: usize, c: usize| {
        let (pa, pb, pc) = (positions[a], positions[b], positions[c]);
        let face = (pc - pb).cross(pa - pb);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    };

    if indices.is_empty() {
        for base in (0..positions.len() / 3 * 3).step_by(3) {
            accumulate(base, base + 1, base + 2);
        }
    } else {
        for tri in indices.chunks_exact(3) {
            accumulate(tri[0] as usize, tri[1] as usize, tri[2] as usize);
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

/// Moves sphere vertices onto the elevation surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceDisplacer {
    sampler: ElevationSampler,
    config: DisplacementConfig,
}

impl SurfaceDisplacer {
    /// Create a displacer reading elevations from `sampler`.
    #[must_use]
    pub fn new(sampler: ElevationSampler, config: DisplacementConfig) -> Self {
        Self { sampler, config }
    }

    /// The displacement parameters in use.
    #[must_use]
    pub fn config(&self) -> &DisplacementConfig {
        &self.config
    }

    /// Displace every vertex of `mesh` and recompute its normals.
    ///
    /// Each vertex is projected onto its direction from the origin and pushed
    /// to `base_radius * (1 + elevation * exaggeration / earth_radius)`.
    /// Without a grid every vertex lands on the `base_radius` sphere. A vertex
    /// at the origin stays there.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the mesh untouched, if its buffers do not
    /// describe whole triangles.
    pub fn displace(&self, mesh: &mut SurfaceMesh) -> SurfaceResult<()> {
        mesh.validate()?;

        for position in &mut mesh.positions {
            let dir = position.normalize_or_zero();
            let (lat, lon) = direction_to_lat_lon(dir);
            let elevation = self.sampler.sample(lat, lon);
            *position = dir * self.config.radius_at(elevation);
        }

        mesh.normals = compute_vertex_normals(&mesh.positions, &mesh.indices);

        tracing::trace!(
            vertices = mesh.positions.len(),
            loaded = self.sampler.is_loaded(),
            "displaced mesh"
        );
        Ok(())
    }
}
