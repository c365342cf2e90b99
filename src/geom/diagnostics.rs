//! Rebuild diagnostics.
//!
//! Every successful [`BezierSurface`](super::BezierSurface) rebuild records the shape of
//! what it produced: patch layout, buffer sizes, degenerate faces and the bounds of the
//! sampled vertices.
//!
//! ```ignore
//! let surface = BezierSurface::new(field, SurfaceOptions::default())?;
//! log::info!("{}", surface.diagnostics().summary());
//! ```

use std::fmt;

use serde::Serialize;

use super::core::BBox;
use super::metrics::RebuildTimingReport;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RebuildDiagnostics {
    /// Patches along the vertical (row) axis of the height field.
    pub vertical_patches: usize,
    /// Patches along the horizontal (column) axis.
    pub horizontal_patches: usize,
    pub patch_count: usize,
    /// Samples per patch edge used for this rebuild.
    pub sample_resolution: usize,
    pub vertex_count: usize,
    pub face_count: usize,
    /// Faces with collinear corners. They are still emitted but add nothing to the normals.
    pub degenerate_face_count: usize,
    /// Bounds of the sampled vertices; `None` only for an empty surface.
    pub bounds: Option<BBox>,
    /// Present when built with `rebuild_metrics` on a native target.
    pub timing: Option<RebuildTimingReport>,
}

impl RebuildDiagnostics {
    /// True when every face contributed to the vertex normals.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.degenerate_face_count == 0
    }

    /// Short one-line summary suitable for logging.
    ///
    /// Format: `"P:{patches} ({v}x{h}) r:{resolution} V:{vertices} F:{faces} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "P:{} ({}x{}) r:{} V:{} F:{}",
            self.patch_count,
            self.vertical_patches,
            self.horizontal_patches,
            self.sample_resolution,
            self.vertex_count,
            self.face_count
        )];
        if self.degenerate_face_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_face_count));
        }
        if let Some(timing) = &self.timing {
            parts.push(format!("{:.3}ms", timing.total_ms()));
        }
        parts.join(" ")
    }
}

impl fmt::Display for RebuildDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Surface Diagnostics:")?;
        writeln!(
            f,
            "  Patches: {} ({} x {})",
            self.patch_count, self.vertical_patches, self.horizontal_patches
        )?;
        writeln!(f, "  Sample resolution: {}", self.sample_resolution)?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        if self.degenerate_face_count > 0 {
            writeln!(f, "  Degenerate faces: {}", self.degenerate_face_count)?;
        }
        if let Some(bounds) = self.bounds {
            let size = bounds.size();
            writeln!(f, "  Extent: {} x {} x {}", size.x, size.y, size.z)?;
        }
        if let Some(timing) = &self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point3;

    #[test]
    fn test_default_is_clean() {
        let diag = RebuildDiagnostics::default();
        assert!(diag.is_clean());
        assert!(diag.bounds.is_none());
    }

    #[test]
    fn test_summary() {
        let diag = RebuildDiagnostics {
            vertical_patches: 1,
            horizontal_patches: 2,
            patch_count: 2,
            sample_resolution: 3,
            vertex_count: 18,
            face_count: 16,
            degenerate_face_count: 1,
            ..Default::default()
        };

        let summary = diag.summary();
        assert!(summary.contains("P:2 (1x2)"));
        assert!(summary.contains("r:3"));
        assert!(summary.contains("V:18"));
        assert!(summary.contains("F:16"));
        assert!(summary.contains("degenerate:1"));
        assert!(!diag.is_clean());
    }

    #[test]
    fn test_display() {
        let diag = RebuildDiagnostics {
            patch_count: 1,
            vertical_patches: 1,
            horizontal_patches: 1,
            sample_resolution: 2,
            vertex_count: 4,
            face_count: 2,
            bounds: Some(BBox::new(
                Point3::new(-0.5, -0.5, 0.0),
                Point3::new(0.5, 0.5, 0.0),
            )),
            ..Default::default()
        };

        let output = format!("{diag}");
        assert!(output.contains("Vertices: 4"));
        assert!(output.contains("Faces: 2"));
        assert!(output.contains("Extent: 1 x 1 x 0"));
        assert!(!output.contains("Degenerate"));
    }
}
