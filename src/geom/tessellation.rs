//! Uniform sampling of Bézier patches and quad-to-triangle tessellation.
//!
//! # Buffer layout
//!
//! Sample `(i, j)` of patch `b` at resolution `r` lives at `b * r² + i * r + j`, where `i`
//! walks the `s` parameter and `j` the `t` parameter. Normals share the same indexing.
//!
//! # Normal accumulation
//!
//! Each grid cell `(i, j)` has corners `v1 = (i, j)`, `v2 = (i + 1, j)`, `v3 = (i, j + 1)`
//! and `v4 = (i + 1, j + 1)` and is split into faces `(v1, v2, v3)` and `(v2, v4, v3)`.
//! A face contributes the sum of its negated unit normal evaluated over the three
//! rotations of its reversed vertex order, so every non-degenerate face adds a vector of
//! length 3 to each of its corners. The accumulated normals are neither averaged nor
//! normalized.

use super::bernstein::linspace;
use super::error::SurfaceError;
use super::patch::BezierPatch;
use super::{Point3, Tolerance, Vec3};

/// Evenly spaced parameter values over `[0, 1]`, endpoints included.
#[must_use]
pub fn sample_parameters(resolution: usize) -> Vec<f64> {
    linspace(0.0, 1.0, resolution)
}

/// Checks that `patch_count * resolution²` sample vertices are addressable with `u32`.
///
/// # Errors
///
/// [`SurfaceError::InvalidSampleResolution`] when `resolution < 2`,
/// [`SurfaceError::VertexCountOverflow`] when the vertex count does not fit `usize`,
/// [`SurfaceError::IndexOverflow`] when it exceeds `u32::MAX`.
pub fn checked_vertex_count(patch_count: usize, resolution: usize) -> Result<usize, SurfaceError> {
    if resolution < 2 {
        return Err(SurfaceError::InvalidSampleResolution(resolution));
    }
    let vertex_count = resolution
        .checked_mul(resolution)
        .and_then(|per_patch| per_patch.checked_mul(patch_count))
        .ok_or(SurfaceError::VertexCountOverflow {
            patch_count,
            resolution,
        })?;
    if u32::try_from(vertex_count).is_err() {
        return Err(SurfaceError::IndexOverflow { vertex_count });
    }
    Ok(vertex_count)
}

/// Evaluates every patch on a `resolution x resolution` parameter grid.
///
/// # Errors
///
/// See [`checked_vertex_count`].
pub fn sample_patches(
    patches: &[BezierPatch],
    resolution: usize,
) -> Result<Vec<Point3>, SurfaceError> {
    let vertex_count = checked_vertex_count(patches.len(), resolution)?;
    let s = sample_parameters(resolution);
    let t = sample_parameters(resolution);

    let mut samples = Vec::with_capacity(vertex_count);
    for patch in patches {
        for &si in &s {
            for &tj in &t {
                samples.push(patch.point_at(si, tj));
            }
        }
    }
    Ok(samples)
}

/// Triangle faces plus the per-vertex accumulated normals of a sampled surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tessellation {
    pub normals: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
    /// Faces whose corners are collinear; they add nothing to the normals.
    pub degenerate_faces: usize,
}

/// `normalize((p1 - p2) x (p1 - p3))`, or `None` for a zero-area triangle.
///
/// Degeneracy is judged relative to the edge lengths, so the result does not depend on the
/// triangle's scale.
#[must_use]
pub fn triangle_normal(p1: Point3, p2: Point3, p3: Point3) -> Option<Vec3> {
    let e1 = p1 - p2;
    let e2 = p1 - p3;
    let n = e1.cross(e2);
    let len = n.length();
    let scale = e1.length() * e2.length();
    if len.is_finite() && len > Tolerance::ZERO_LENGTH.eps * scale {
        Some(n * len.recip())
    } else {
        None
    }
}

/// Normal contribution of face `(a, b, c)`: the negated [`triangle_normal`] of each rotation
/// of `(a, c, b)`, summed.
#[must_use]
pub fn face_normal_contribution(a: Point3, b: Point3, c: Point3) -> Option<Vec3> {
    let rotations = [(a, c, b), (b, a, c), (c, b, a)];
    let mut sum = Vec3::ZERO;
    for (p1, p2, p3) in rotations {
        sum += -triangle_normal(p1, p2, p3)?;
    }
    Some(sum)
}

/// Splits every sampled cell into two triangles and accumulates face normals.
///
/// `samples` must hold `patch_count * resolution²` points in the layout produced by
/// [`sample_patches`].
///
/// # Errors
///
/// [`SurfaceError::InvalidSampleResolution`] or an overflow error as in
/// [`checked_vertex_count`]; a sample buffer of the wrong length is reported as
/// [`SurfaceError::InvalidSampleResolution`].
pub fn tessellate_samples(
    samples: &[Point3],
    patch_count: usize,
    resolution: usize,
) -> Result<Tessellation, SurfaceError> {
    let vertex_count = checked_vertex_count(patch_count, resolution)?;
    if samples.len() != vertex_count {
        return Err(SurfaceError::InvalidSampleResolution(resolution));
    }

    let cells = resolution - 1;
    let mut normals = vec![Vec3::ZERO; vertex_count];
    let mut faces = Vec::with_capacity(patch_count * cells * cells * 2);
    let mut degenerate_faces = 0;

    // `vertex_count` fits in u32, so every index below does too.
    let index = |b: usize, i: usize, j: usize| (b * resolution * resolution + i * resolution + j) as u32;

    for b in 0..patch_count {
        for i in 0..cells {
            for j in 0..cells {
                let v1 = index(b, i, j);
                let v2 = index(b, i + 1, j);
                let v3 = index(b, i, j + 1);
                let v4 = index(b, i + 1, j + 1);

                for face in [[v1, v2, v3], [v2, v4, v3]] {
                    let [a, bb, c] = face.map(|v| samples[v as usize]);
                    match face_normal_contribution(a, bb, c) {
                        Some(contribution) => {
                            for v in face {
                                normals[v as usize] += contribution;
                            }
                        }
                        None => degenerate_faces += 1,
                    }
                    faces.push(face);
                }
            }
        }
    }

    if degenerate_faces > 0 {
        log::debug!("{degenerate_faces} degenerate faces skipped during normal accumulation");
    }

    Ok(Tessellation {
        normals,
        faces,
        degenerate_faces,
    })
}
