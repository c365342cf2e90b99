//! The rebuildable Bézier surface.
//!
//! [`BezierSurface`] owns a height field, the options it was built with, and every buffer
//! derived from them: control patches, sampled positions, accumulated normals and faces.
//! All derived buffers are produced together by one rebuild. A failed rebuild leaves the
//! previous buffers untouched; a successful one replaces all of them, so slices obtained
//! from the accessors before a rebuild must be fetched again afterwards.
//!
//! ```ignore
//! use bezier_engine::geom::{BezierSurface, SurfaceOptions};
//!
//! let mut surface = BezierSurface::from_heights_str("4 4\n0 0 0 0\n...", SurfaceOptions::default())?;
//! surface.set_sample_resolution(20)?;
//! upload(surface.mesh().positions_flat(), surface.mesh().normals_flat(), surface.mesh().indices_flat());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::bernstein::DerivativeBoundary;
use super::core::BBox;
use super::diagnostics::RebuildDiagnostics;
use super::error::SurfaceError;
use super::height_field::HeightField;
use super::mesh::SurfaceMesh;
use super::metrics::{RebuildMetrics, TimingBucket};
use super::patch::{PatchGrid, build_control_patches, validate_spacing};
use super::tessellation::{sample_parameters, sample_patches, tessellate_samples};
use super::Vec3;
use crate::parse::heights;

/// Samples per patch edge used when nothing else is configured.
pub const DEFAULT_SAMPLE_RESOLUTION: usize = 10;

/// Caller-tunable rebuild parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    /// Parameter samples per patch edge, endpoints included. Must be at least 2.
    pub sample_resolution: usize,
    /// Scales the planar footprint of the control grid. Must be finite and positive.
    pub spacing_multiplier: f64,
    /// Boundary handling for [`BezierSurface::derivative_normals`].
    pub derivative_boundary: DerivativeBoundary,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            sample_resolution: DEFAULT_SAMPLE_RESOLUTION,
            spacing_multiplier: 1.0,
            derivative_boundary: DerivativeBoundary::default(),
        }
    }
}

impl SurfaceOptions {
    #[must_use]
    pub fn new(sample_resolution: usize, spacing_multiplier: f64) -> Self {
        Self {
            sample_resolution,
            spacing_multiplier,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_derivative_boundary(mut self, boundary: DerivativeBoundary) -> Self {
        self.derivative_boundary = boundary;
        self
    }

    /// # Errors
    ///
    /// [`SurfaceError::InvalidSampleResolution`] or [`SurfaceError::InvalidSpacing`].
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.sample_resolution < 2 {
            return Err(SurfaceError::InvalidSampleResolution(self.sample_resolution));
        }
        validate_spacing(self.spacing_multiplier)
    }
}

#[derive(Debug)]
pub struct BezierSurface {
    height_field: HeightField,
    options: SurfaceOptions,
    patches: PatchGrid,
    mesh: SurfaceMesh,
    diagnostics: RebuildDiagnostics,
    metrics: RebuildMetrics,
}

impl BezierSurface {
    /// Builds a surface from a parsed height field.
    ///
    /// # Errors
    ///
    /// Any [`SurfaceError`] raised while validating or building.
    pub fn new(height_field: HeightField, options: SurfaceOptions) -> Result<Self, SurfaceError> {
        let mut metrics = RebuildMetrics::default();
        let (patches, mesh, diagnostics) = build(&height_field, options, &mut metrics)?;
        Ok(Self {
            height_field,
            options,
            patches,
            mesh,
            diagnostics,
            metrics,
        })
    }

    /// Parses the whitespace-separated height format and builds a surface from it.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Parse`] for malformed input, otherwise as [`BezierSurface::new`].
    pub fn from_heights_str(input: &str, options: SurfaceOptions) -> Result<Self, SurfaceError> {
        Self::new(heights::parse_str(input)?, options)
    }

    /// Reads and parses a height file, then builds a surface from it.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Parse`] when the file is missing or malformed, otherwise as
    /// [`BezierSurface::new`].
    pub fn from_file(path: impl AsRef<Path>, options: SurfaceOptions) -> Result<Self, SurfaceError> {
        Self::new(heights::parse_file(path)?, options)
    }

    /// Discards every derived buffer and rebuilds from `height_field` and `options`.
    ///
    /// On error the surface keeps its previous height field, options and buffers.
    ///
    /// # Errors
    ///
    /// Any [`SurfaceError`] raised while validating or building.
    pub fn rebuild(
        &mut self,
        height_field: HeightField,
        options: SurfaceOptions,
    ) -> Result<(), SurfaceError> {
        let (patches, mesh, diagnostics) = build(&height_field, options, &mut self.metrics)?;
        self.height_field = height_field;
        self.options = options;
        self.patches = patches;
        self.mesh = mesh;
        self.diagnostics = diagnostics;
        Ok(())
    }

    /// Rebuilds with the current height field and `options`.
    ///
    /// # Errors
    ///
    /// As [`BezierSurface::rebuild`].
    pub fn resample(&mut self, options: SurfaceOptions) -> Result<(), SurfaceError> {
        let (patches, mesh, diagnostics) = build(&self.height_field, options, &mut self.metrics)?;
        self.options = options;
        self.patches = patches;
        self.mesh = mesh;
        self.diagnostics = diagnostics;
        Ok(())
    }

    /// # Errors
    ///
    /// As [`BezierSurface::rebuild`].
    pub fn set_sample_resolution(&mut self, sample_resolution: usize) -> Result<(), SurfaceError> {
        self.resample(SurfaceOptions {
            sample_resolution,
            ..self.options
        })
    }

    /// # Errors
    ///
    /// As [`BezierSurface::rebuild`].
    pub fn set_spacing_multiplier(&mut self, spacing_multiplier: f64) -> Result<(), SurfaceError> {
        self.resample(SurfaceOptions {
            spacing_multiplier,
            ..self.options
        })
    }

    /// Replaces the height field (and with it the grid dimensions), keeping the options.
    ///
    /// # Errors
    ///
    /// As [`BezierSurface::rebuild`].
    pub fn set_height_field(&mut self, height_field: HeightField) -> Result<(), SurfaceError> {
        self.rebuild(height_field, self.options)
    }

    /// Approximate normals from patch derivatives, one per sample and indexed like
    /// [`SurfaceMesh::positions`]. Uses the configured [`DerivativeBoundary`].
    ///
    /// # Errors
    ///
    /// [`SurfaceError::NumericDomain`] under [`DerivativeBoundary::Strict`]; every sample
    /// grid includes the patch boundaries, so strict evaluation always fails there.
    pub fn derivative_normals(&self) -> Result<Vec<Vec3>, SurfaceError> {
        let params = sample_parameters(self.options.sample_resolution);
        let boundary = self.options.derivative_boundary;

        let mut normals = Vec::with_capacity(self.mesh.vertex_count());
        for patch in &self.patches.patches {
            for &s in &params {
                for &t in &params {
                    normals.push(patch.derivative_normal(s, t, boundary)?);
                }
            }
        }
        Ok(normals)
    }

    #[must_use]
    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    #[must_use]
    pub fn options(&self) -> SurfaceOptions {
        self.options
    }

    #[must_use]
    pub fn patches(&self) -> &PatchGrid {
        &self.patches
    }

    #[must_use]
    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    #[must_use]
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.mesh.positions
    }

    #[must_use]
    pub fn normals(&self) -> &[[f64; 3]] {
        &self.mesh.normals
    }

    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.mesh.faces
    }

    #[must_use]
    pub fn diagnostics(&self) -> &RebuildDiagnostics {
        &self.diagnostics
    }

    /// Consumes the surface and returns its output buffers.
    #[must_use]
    pub fn into_mesh(self) -> SurfaceMesh {
        self.mesh
    }
}

fn build(
    height_field: &HeightField,
    options: SurfaceOptions,
    metrics: &mut RebuildMetrics,
) -> Result<(PatchGrid, SurfaceMesh, RebuildDiagnostics), SurfaceError> {
    options.validate()?;
    metrics.begin();

    let patches = metrics.time(TimingBucket::ControlGrid, || {
        build_control_patches(height_field, options.spacing_multiplier)
    })?;
    let resolution = options.sample_resolution;

    let samples = metrics.time(TimingBucket::Sampling, || {
        sample_patches(&patches.patches, resolution)
    })?;
    let tessellation = metrics.time(TimingBucket::Tessellation, || {
        tessellate_samples(&samples, patches.len(), resolution)
    })?;

    let diagnostics = RebuildDiagnostics {
        vertical_patches: patches.vertical_patches,
        horizontal_patches: patches.horizontal_patches,
        patch_count: patches.len(),
        sample_resolution: resolution,
        vertex_count: samples.len(),
        face_count: tessellation.faces.len(),
        degenerate_face_count: tessellation.degenerate_faces,
        bounds: BBox::from_points(samples.iter().copied()),
        timing: metrics.end(),
    };

    let mesh = SurfaceMesh::new(
        samples.iter().map(|p| p.to_array()).collect(),
        tessellation.normals.iter().map(|n| n.to_array()).collect(),
        tessellation.faces,
    );

    log::info!("surface rebuilt: {}", diagnostics.summary());
    Ok((patches, mesh, diagnostics))
}
