use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{
    BezierPatch, DerivativeBoundary, HeightField, PATCH_ORDER, Point3, SurfaceError, Tolerance,
    Vec3, build_control_patches, control_coordinates, linspace,
};

fn random_patch(rng: &mut StdRng) -> BezierPatch {
    let mut patch = BezierPatch::default();
    for row in &mut patch.control {
        for cp in row.iter_mut() {
            *cp = Point3::new(
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
            );
        }
    }
    patch
}

/// Control points on the plane `z = a x + b y`, evenly spaced in x (along j) and y (along i).
fn planar_patch(a: f64, b: f64) -> BezierPatch {
    let mut patch = BezierPatch::default();
    for (i, row) in patch.control.iter_mut().enumerate() {
        for (j, cp) in row.iter_mut().enumerate() {
            let x = j as f64 / 3.0;
            let y = i as f64 / 3.0;
            *cp = Point3::new(x, y, a * x + b * y);
        }
    }
    patch
}

fn sequential_field(rows: usize, cols: usize) -> HeightField {
    let values = (0..rows * cols).map(|k| k as f64).collect();
    HeightField::new(rows, cols, values).unwrap()
}

#[test]
fn patch_interpolates_its_corners() {
    let tol = Tolerance::new(1e-12);
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..32 {
        let p = random_patch(&mut rng);
        assert!(tol.approx_eq_point3(p.point_at(0.0, 0.0), p.control[0][0]));
        assert!(tol.approx_eq_point3(p.point_at(0.0, 1.0), p.control[0][3]));
        assert!(tol.approx_eq_point3(p.point_at(1.0, 0.0), p.control[3][0]));
        assert!(tol.approx_eq_point3(p.point_at(1.0, 1.0), p.control[3][3]));
    }
}

#[test]
fn corners_are_reported_in_parameter_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let p = random_patch(&mut rng);
    let corners = p.corners();
    assert_eq!(corners[0], p.point_at(0.0, 0.0));
    assert_eq!(corners[1], p.control[0][3]);
    assert_eq!(corners[2], p.control[3][0]);
    assert_eq!(corners[3], p.control[3][3]);
}

#[test]
fn evenly_spaced_planar_controls_reproduce_the_plane() {
    let tol = Tolerance::new(1e-12);
    let (a, b) = (0.75, -2.0);
    let patch = planar_patch(a, b);

    for &s in &[0.0, 0.2, 0.5, 0.9, 1.0] {
        for &t in &[0.0, 0.3, 0.6, 1.0] {
            let p = patch.point_at(s, t);
            assert!(tol.approx_eq_point3(p, Point3::new(t, s, a * t + b * s)), "s={s} t={t}");
        }
    }
}

#[test]
fn point_lies_in_convex_hull_of_heights() {
    let mut rng = StdRng::seed_from_u64(99);
    let patch = random_patch(&mut rng);
    let zs = patch.control.iter().flatten().map(|p| p.z);
    let (lo, hi) = zs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| (lo.min(z), hi.max(z)));

    for k in 0..=10 {
        let s = f64::from(k) / 10.0;
        let z = patch.point_at(s, 1.0 - s).z;
        assert!(z >= lo - 1e-12 && z <= hi + 1e-12);
    }
}

#[test]
fn flat_unit_patch_derivative_normal_is_constant() {
    let field = HeightField::filled(4, 4, 0.0);
    let grid = build_control_patches(&field, 1.0).unwrap();
    let patch = grid.patches[0];
    let tol = Tolerance::new(1e-9);

    for &(s, t) in &[(0.0, 0.0), (0.25, 0.75), (0.5, 0.5), (1.0, 1.0)] {
        let n = patch
            .derivative_normal(s, t, DerivativeBoundary::AnalyticLimit)
            .unwrap();
        assert!(tol.approx_eq_vec3(n, Vec3::new(0.0, 0.0, -16.0)), "s={s} t={t} n={n:?}");
    }
}

#[test]
fn derivative_normal_strict_fails_only_on_boundary() {
    let mut rng = StdRng::seed_from_u64(3);
    let patch = random_patch(&mut rng);

    assert!(matches!(
        patch.derivative_normal(0.0, 0.5, DerivativeBoundary::Strict),
        Err(SurfaceError::NumericDomain { .. })
    ));
    assert!(matches!(
        patch.derivative_normal(0.5, 1.0, DerivativeBoundary::Strict),
        Err(SurfaceError::NumericDomain { .. })
    ));

    let strict = patch.derivative_normal(0.4, 0.6, DerivativeBoundary::Strict).unwrap();
    let analytic = patch
        .derivative_normal(0.4, 0.6, DerivativeBoundary::AnalyticLimit)
        .unwrap();
    assert!(Tolerance::new(1e-9).approx_eq_vec3(strict, analytic));
}

#[test]
fn legacy_boundary_derivative_normal_is_finite() {
    let mut rng = StdRng::seed_from_u64(11);
    let patch = random_patch(&mut rng);
    for &(s, t) in &[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
        let n = patch
            .derivative_normal(s, t, DerivativeBoundary::LegacyFallback)
            .unwrap();
        assert!(n.is_finite());
    }
}

#[test]
fn square_grid_spans_spacing_on_both_axes() {
    let (v, h) = control_coordinates(4, 4, 2.0);
    assert_eq!(v, linspace(1.0, -1.0, 4));
    assert_eq!(h, linspace(-1.0, 1.0, 4));
}

#[test]
fn wider_axis_spans_twice_the_spacing() {
    let (v, h) = control_coordinates(4, 8, 1.0);
    assert_eq!(v, linspace(0.5, -0.5, 4));
    assert_eq!(h, linspace(-1.0, 1.0, 8));

    let (v, h) = control_coordinates(8, 4, 1.0);
    assert_eq!(v, linspace(1.0, -1.0, 8));
    assert_eq!(h, linspace(-0.5, 0.5, 4));
}

#[test]
fn single_patch_takes_heights_and_positions_in_order() {
    let field = sequential_field(4, 4);
    let grid = build_control_patches(&field, 1.0).unwrap();

    assert_eq!(grid.len(), 1);
    assert_eq!((grid.vertical_patches, grid.horizontal_patches), (1, 1));

    let patch = grid.get(0, 0).unwrap();
    assert_eq!(patch.control[0][0], Point3::new(-0.5, 0.5, 0.0));
    assert_eq!(patch.control[0][3], Point3::new(0.5, 0.5, 3.0));
    assert_eq!(patch.control[3][0], Point3::new(-0.5, -0.5, 12.0));
    assert_eq!(patch.control[3][3], Point3::new(0.5, -0.5, 15.0));
    assert_eq!(patch.control[1][2].z, 6.0);
}

#[test]
fn neighbouring_patches_share_placement_but_not_heights() {
    let field = sequential_field(4, 8);
    let grid = build_control_patches(&field, 1.0).unwrap();
    let (_, h) = control_coordinates(4, 8, 1.0);

    assert_eq!(grid.len(), 2);
    assert_eq!((grid.vertical_patches, grid.horizontal_patches), (1, 2));

    let left = grid.get(0, 0).unwrap();
    let right = grid.get(0, 1).unwrap();
    for i in 0..PATCH_ORDER {
        assert_eq!(right.control[i][0].x, left.control[i][3].x);
        assert_eq!(right.control[i][0].x, h[3]);
        assert_eq!(right.control[i][3].x, h[6]);
        assert_eq!(left.control[i][3].z, (i * 8 + 3) as f64);
        assert_eq!(right.control[i][0].z, (i * 8 + 4) as f64);
    }
    assert!(grid.get(1, 0).is_none());
}

#[test]
fn patch_rows_advance_down_the_vertical_axis() {
    let field = sequential_field(8, 4);
    let grid = build_control_patches(&field, 1.0).unwrap();
    let (v, _) = control_coordinates(8, 4, 1.0);

    assert_eq!((grid.vertical_patches, grid.horizontal_patches), (2, 1));
    let lower = grid.get(1, 0).unwrap();
    assert_eq!(lower.control[0][0].y, v[3]);
    assert_eq!(lower.control[3][0].y, v[6]);
    assert_eq!(lower.control[0][0].z, 16.0);
}

#[test]
fn invalid_dimensions_are_rejected() {
    for (rows, cols) in [(3, 4), (4, 6), (0, 4), (4, 0), (5, 8)] {
        let field = HeightField::filled(rows, cols, 0.0);
        assert!(
            matches!(
                build_control_patches(&field, 1.0),
                Err(SurfaceError::InvalidDimensions { vertical, horizontal })
                    if vertical == rows && horizontal == cols
            ),
            "{rows}x{cols}"
        );
    }
}

#[test]
fn invalid_spacing_is_rejected() {
    let field = HeightField::filled(4, 4, 0.0);
    for spacing in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            build_control_patches(&field, spacing),
            Err(SurfaceError::InvalidSpacing(_))
        ));
    }
}
