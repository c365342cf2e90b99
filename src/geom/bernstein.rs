//! Binomial coefficients and the Bernstein basis.
//!
//! Every patch evaluation funnels through these functions. The degree is always 3 for the
//! bicubic patches built by this crate, so the cubic binomials are precomputed at compile
//! time and the general functions fall back to the iterative formula for other degrees.

use serde::{Deserialize, Serialize};

use super::error::SurfaceError;

/// Binomial coefficients `C(3, i)` for `i` in `0..=3`.
pub const CUBIC_BINOMIALS: [u64; 4] = [binomial(3, 0), binomial(3, 1), binomial(3, 2), binomial(3, 3)];

/// Computes `n! / (i! (n-i)!)` with the multiplicative formula.
///
/// Returns 0 when `i > n`. Every intermediate value is itself a binomial coefficient, so
/// the division is always exact.
#[must_use]
pub const fn binomial(n: usize, i: usize) -> u64 {
    if i > n {
        return 0;
    }
    let k = if i < n - i { i } else { n - i };
    let mut result: u64 = 1;
    let mut step = 0;
    while step < k {
        result = result * (n - step) as u64 / (step + 1) as u64;
        step += 1;
    }
    result
}

#[inline]
fn binomial_f64(n: usize, i: usize) -> f64 {
    if n == 3 && i <= 3 {
        CUBIC_BINOMIALS[i] as f64
    } else {
        binomial(n, i) as f64
    }
}

/// Bernstein basis polynomial `B(i, n, t) = C(n, i) t^i (1-t)^(n-i)`.
#[must_use]
pub fn bernstein(i: usize, n: usize, t: f64) -> f64 {
    if i > n {
        return 0.0;
    }
    binomial_f64(n, i) * powi(t, i) * powi(1.0 - t, n - i)
}

/// How [`bernstein_derivative`] treats the parameter boundaries, where the closed-form
/// expression raises zero to a negative power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeBoundary {
    /// Evaluate `n (B(i-1, n-1, t) - B(i, n-1, t))`, which is exact everywhere and equals the
    /// limit of the closed form at `t = 0` and `t = 1`.
    #[default]
    AnalyticLimit,
    /// Evaluate the closed form and substitute `1.0` whenever it produces NaN.
    LegacyFallback,
    /// Evaluate the closed form and fail with [`SurfaceError::NumericDomain`] when the
    /// result is not finite.
    Strict,
}

/// Fallback value substituted by [`DerivativeBoundary::LegacyFallback`].
pub const LEGACY_DERIVATIVE_FALLBACK: f64 = 1.0;

/// Derivative of [`bernstein`] with respect to `t`.
///
/// # Errors
///
/// Only [`DerivativeBoundary::Strict`] can fail, with [`SurfaceError::NumericDomain`].
pub fn bernstein_derivative(
    i: usize,
    n: usize,
    t: f64,
    boundary: DerivativeBoundary,
) -> Result<f64, SurfaceError> {
    match boundary {
        DerivativeBoundary::AnalyticLimit => Ok(bernstein_derivative_exact(i, n, t)),
        DerivativeBoundary::LegacyFallback => {
            let value = bernstein_derivative_closed_form(i, n, t);
            Ok(if value.is_nan() { LEGACY_DERIVATIVE_FALLBACK } else { value })
        }
        DerivativeBoundary::Strict => {
            let value = bernstein_derivative_closed_form(i, n, t);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(SurfaceError::NumericDomain { i, n, t })
            }
        }
    }
}

/// `n (B(i-1, n-1, t) - B(i, n-1, t))` with `B(-1, ..) = B(n, n-1, ..) = 0`.
fn bernstein_derivative_exact(i: usize, n: usize, t: f64) -> f64 {
    if n == 0 || i > n {
        return 0.0;
    }
    let lower = if i == 0 { 0.0 } else { bernstein(i - 1, n - 1, t) };
    let upper = bernstein(i, n - 1, t);
    n as f64 * (lower - upper)
}

/// `C(n,i) t^(i-1) (1-t)^(n-i-1) (-(n-i) t + i (1-t))`, evaluated term by term.
///
/// At `t = 0` with `i = 0` (and `t = 1` with `i = n`) one power is infinite and the last
/// factor is zero, so the product is NaN.
fn bernstein_derivative_closed_form(i: usize, n: usize, t: f64) -> f64 {
    let i_signed = i as i32;
    let n_signed = n as i32;
    binomial_f64(n, i)
        * t.powi(i_signed - 1)
        * (1.0 - t).powi(n_signed - i_signed - 1)
        * (-f64::from(n_signed - i_signed) * t + f64::from(i_signed) * (1.0 - t))
}

#[inline]
fn powi(base: f64, exp: usize) -> f64 {
    base.powi(i32::try_from(exp).unwrap_or(i32::MAX))
}

/// `count` evenly spaced values from `start` to `end`, both endpoints included.
///
/// A single-element request yields `[start]`.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i + 1 == count { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_binomials() {
        assert_eq!(CUBIC_BINOMIALS, [1, 3, 3, 1]);
        assert_eq!(binomial(0, 0), 1);
        assert_eq!(binomial(10, 3), 120);
        assert_eq!(binomial(3, 4), 0);
    }

    #[test]
    fn test_linspace_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 2), vec![0.0, 1.0]);
        assert_eq!(linspace(0.5, -0.5, 3), vec![0.5, 0.0, -0.5]);
        assert_eq!(linspace(2.0, 4.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());

        let values = linspace(0.0, 1.0, 10);
        assert_eq!(values.len(), 10);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[9], 1.0);
    }

    #[test]
    fn test_closed_form_is_nan_at_boundaries() {
        assert!(bernstein_derivative_closed_form(0, 3, 0.0).is_nan());
        assert!(bernstein_derivative_closed_form(3, 3, 1.0).is_nan());
        assert!((bernstein_derivative_closed_form(1, 3, 0.0) - 3.0).abs() < 1e-12);
    }
}
