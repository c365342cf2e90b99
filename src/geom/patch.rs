//! Bicubic Bézier patches built from a height field.
//!
//! A height field with `V x H` control points (both multiples of 4) is cut into
//! `(V / 4) x (H / 4)` patches of 4x4 control points each. Heights are looked up with a
//! stride of 4 per patch, but planar positions advance by 3 coordinate steps per patch so
//! that neighbouring patches share their boundary row/column position. Both strides are
//! part of the surface's observable layout and are kept as-is.

use super::bernstein::{DerivativeBoundary, bernstein, bernstein_derivative, linspace};
use super::error::SurfaceError;
use super::height_field::HeightField;
use super::{Point3, Vec3};

/// Control points per patch edge.
pub const PATCH_ORDER: usize = 4;

/// Polynomial degree of a patch along each parameter.
pub const PATCH_DEGREE: usize = PATCH_ORDER - 1;

/// Coordinate-sequence advance between neighbouring patches.
pub const PATCH_PLACEMENT_STRIDE: usize = 3;

/// Height-field advance between neighbouring patches.
pub const PATCH_HEIGHT_STRIDE: usize = 4;

/// A single 4x4 bicubic Bézier patch. `control[i][j]`: `i` runs along `s`, `j` along `t`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BezierPatch {
    pub control: [[Point3; PATCH_ORDER]; PATCH_ORDER],
}

impl BezierPatch {
    #[must_use]
    pub const fn new(control: [[Point3; PATCH_ORDER]; PATCH_ORDER]) -> Self {
        Self { control }
    }

    /// Evaluates the tensor-product surface at `(s, t)`.
    #[must_use]
    pub fn point_at(&self, s: f64, t: f64) -> Point3 {
        let bs = cubic_basis(s);
        let bt = cubic_basis(t);

        let mut acc = Vec3::ZERO;
        for (i, row) in self.control.iter().enumerate() {
            for (j, cp) in row.iter().enumerate() {
                acc += (bs[i] * bt[j]) * cp.to_vec3();
            }
        }
        Point3::from(acc)
    }

    /// Approximate surface normal at `(s, t)` from Bernstein derivatives.
    ///
    /// `ss` weights every control point by `B'(i, 3, s)` and `tt` by `B'(j, 3, t)`, each
    /// summed over the whole 4x4 grid; the result is `tt x ss`. This is not the analytic
    /// normal of the patch (neither sum carries the other parameter's basis weight), and
    /// the result is not normalized.
    ///
    /// # Errors
    ///
    /// Propagates [`SurfaceError::NumericDomain`] from a [`DerivativeBoundary::Strict`]
    /// evaluation at `s` or `t` equal to 0 or 1.
    pub fn derivative_normal(
        &self,
        s: f64,
        t: f64,
        boundary: DerivativeBoundary,
    ) -> Result<Vec3, SurfaceError> {
        let ds = cubic_basis_derivative(s, boundary)?;
        let dt = cubic_basis_derivative(t, boundary)?;

        let mut ss = Vec3::ZERO;
        let mut tt = Vec3::ZERO;
        for (i, row) in self.control.iter().enumerate() {
            for (j, cp) in row.iter().enumerate() {
                let p = cp.to_vec3();
                ss += ds[i] * p;
                tt += dt[j] * p;
            }
        }
        Ok(tt.cross(ss))
    }

    /// Corner control points in `(0,0)`, `(0,1)`, `(1,0)`, `(1,1)` parameter order.
    #[must_use]
    pub fn corners(&self) -> [Point3; 4] {
        let last = PATCH_DEGREE;
        [
            self.control[0][0],
            self.control[0][last],
            self.control[last][0],
            self.control[last][last],
        ]
    }
}

fn cubic_basis(t: f64) -> [f64; PATCH_ORDER] {
    std::array::from_fn(|i| bernstein(i, PATCH_DEGREE, t))
}

fn cubic_basis_derivative(
    t: f64,
    boundary: DerivativeBoundary,
) -> Result<[f64; PATCH_ORDER], SurfaceError> {
    let mut out = [0.0; PATCH_ORDER];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = bernstein_derivative(i, PATCH_DEGREE, t, boundary)?;
    }
    Ok(out)
}

/// Patches laid out on a `vertical_patches x horizontal_patches` grid, row-major.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatchGrid {
    pub vertical_patches: usize,
    pub horizontal_patches: usize,
    pub patches: Vec<BezierPatch>,
}

impl PatchGrid {
    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Patch at grid cell `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&BezierPatch> {
        if row < self.vertical_patches && col < self.horizontal_patches {
            self.patches.get(row * self.horizontal_patches + col)
        } else {
            None
        }
    }
}

/// Checks that both control-point counts are positive multiples of [`PATCH_ORDER`].
///
/// # Errors
///
/// Returns [`SurfaceError::InvalidDimensions`] otherwise.
pub fn validate_dimensions(vertical: usize, horizontal: usize) -> Result<(), SurfaceError> {
    let valid = |count: usize| count > 0 && count % PATCH_ORDER == 0;
    if valid(vertical) && valid(horizontal) {
        Ok(())
    } else {
        Err(SurfaceError::InvalidDimensions {
            vertical,
            horizontal,
        })
    }
}

/// Checks that the spacing multiplier is finite and positive.
///
/// # Errors
///
/// Returns [`SurfaceError::InvalidSpacing`] otherwise.
pub fn validate_spacing(spacing_multiplier: f64) -> Result<(), SurfaceError> {
    if spacing_multiplier.is_finite() && spacing_multiplier > 0.0 {
        Ok(())
    } else {
        Err(SurfaceError::InvalidSpacing(spacing_multiplier))
    }
}

/// Planar coordinate sequences for the control grid.
///
/// The axis with more patches spans `2 * spacing`, the other `spacing`; equal patch counts
/// span `spacing` on both axes. The vertical sequence runs top to bottom (`+` to `-`), the
/// horizontal one left to right.
#[must_use]
pub fn control_coordinates(
    vertical: usize,
    horizontal: usize,
    spacing_multiplier: f64,
) -> (Vec<f64>, Vec<f64>) {
    let vertical_patches = vertical / PATCH_ORDER;
    let horizontal_patches = horizontal / PATCH_ORDER;
    let half = 0.5 * spacing_multiplier;

    let (v_half, h_half) = match horizontal_patches.cmp(&vertical_patches) {
        std::cmp::Ordering::Greater => (half, 2.0 * half),
        std::cmp::Ordering::Less => (2.0 * half, half),
        std::cmp::Ordering::Equal => (half, half),
    };

    (
        linspace(v_half, -v_half, vertical),
        linspace(-h_half, h_half, horizontal),
    )
}

/// Lays out every control patch of `field`.
///
/// Patch `(y, x)` takes local control point `(i, j)` from
/// `x = h_coords[j + 3x]`, `y = v_coords[i + 3y]`, `z = field[i + 4y][j + 4x]`.
///
/// # Errors
///
/// [`SurfaceError::InvalidDimensions`] when the field is not a multiple of 4 on both axes,
/// [`SurfaceError::InvalidSpacing`] for a non-finite or non-positive spacing.
pub fn build_control_patches(
    field: &HeightField,
    spacing_multiplier: f64,
) -> Result<PatchGrid, SurfaceError> {
    let vertical = field.rows();
    let horizontal = field.cols();
    validate_dimensions(vertical, horizontal)?;
    validate_spacing(spacing_multiplier)?;

    let vertical_patches = vertical / PATCH_ORDER;
    let horizontal_patches = horizontal / PATCH_ORDER;
    let (v_coords, h_coords) = control_coordinates(vertical, horizontal, spacing_multiplier);

    let invalid = || SurfaceError::InvalidDimensions {
        vertical,
        horizontal,
    };

    let mut patches = Vec::with_capacity(vertical_patches * horizontal_patches);
    for y in 0..vertical_patches {
        for x in 0..horizontal_patches {
            let mut patch = BezierPatch::default();
            for (i, row) in patch.control.iter_mut().enumerate() {
                for (j, cp) in row.iter_mut().enumerate() {
                    let px = *h_coords
                        .get(j + x * PATCH_PLACEMENT_STRIDE)
                        .ok_or_else(invalid)?;
                    let py = *v_coords
                        .get(i + y * PATCH_PLACEMENT_STRIDE)
                        .ok_or_else(invalid)?;
                    let pz = field
                        .get(i + y * PATCH_HEIGHT_STRIDE, j + x * PATCH_HEIGHT_STRIDE)
                        .ok_or_else(invalid)?;
                    *cp = Point3::new(px, py, pz);
                }
            }
            patches.push(patch);
        }
    }

    log::debug!(
        "built {} control patches ({}x{}) from a {}x{} height field",
        patches.len(),
        vertical_patches,
        horizontal_patches,
        vertical,
        horizontal
    );

    Ok(PatchGrid {
        vertical_patches,
        horizontal_patches,
        patches,
    })
}
