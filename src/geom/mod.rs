mod bernstein;
mod core;
mod diagnostics;
mod error;
mod height_field;
mod mesh;
mod metrics;
mod patch;
mod surface;
mod tessellation;

pub use bernstein::{
    CUBIC_BINOMIALS, DerivativeBoundary, LEGACY_DERIVATIVE_FALLBACK, bernstein,
    bernstein_derivative, binomial, linspace,
};
pub use core::{BBox, Point3, Tolerance, Vec3};
pub use diagnostics::RebuildDiagnostics;
pub use error::SurfaceError;
pub use height_field::HeightField;
pub use mesh::SurfaceMesh;
pub use metrics::{RebuildMetrics, RebuildTimingReport, TimingBucket};
pub use patch::{
    BezierPatch, PATCH_DEGREE, PATCH_HEIGHT_STRIDE, PATCH_ORDER, PATCH_PLACEMENT_STRIDE,
    PatchGrid, build_control_patches, control_coordinates, validate_dimensions,
    validate_spacing,
};
pub use surface::{BezierSurface, DEFAULT_SAMPLE_RESOLUTION, SurfaceOptions};
pub use tessellation::{
    Tessellation, checked_vertex_count, face_normal_contribution, sample_parameters,
    sample_patches, tessellate_samples, triangle_normal,
};

#[cfg(test)]
mod tests;
