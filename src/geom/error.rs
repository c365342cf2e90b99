use crate::parse::heights::ParseError;

/// Errors raised while building or evaluating a Bézier surface.
///
/// None of these are transient: each one points at malformed input or
/// configuration, so retrying with the same arguments fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The height source could not be read or did not match its declared size.
    #[error("height field parse error: {0}")]
    Parse(#[from] ParseError),
    /// Control-point counts must be positive multiples of 4.
    #[error("control point grid {vertical}x{horizontal} is not a positive multiple of 4 on both axes")]
    InvalidDimensions { vertical: usize, horizontal: usize },
    /// A strict derivative evaluation raised zero to a negative power.
    #[error("bernstein derivative B'({i},{n}) is undefined at t={t}")]
    NumericDomain { i: usize, n: usize, t: f64 },
    #[error("sample resolution must be at least 2 (got {0})")]
    InvalidSampleResolution(usize),
    #[error("spacing multiplier must be finite and positive (got {0})")]
    InvalidSpacing(f64),
    /// The sampled vertex count does not fit a 32-bit index buffer.
    #[error("{vertex_count} sample vertices exceed the u32 index range")]
    IndexOverflow { vertex_count: usize },
    /// `patch_count * resolution²` overflowed before it could be checked against `u32`.
    #[error("{patch_count} patches at resolution {resolution} overflow the vertex count")]
    VertexCountOverflow { patch_count: usize, resolution: usize },
}
