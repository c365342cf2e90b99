use crate::parse::heights::ParseError;

/// Row-major grid of control-point heights.
///
/// `rows` is the vertical control-point count and `cols` the horizontal one. The grid is
/// read-only once constructed; a new height field means a new surface rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl HeightField {
    /// Wraps a row-major value buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::HeightCountMismatch`] when `values.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, ParseError> {
        let expected = rows.saturating_mul(cols);
        if values.len() != expected {
            return Err(ParseError::HeightCountMismatch {
                expected,
                found: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Height field of the given shape with every height set to `value`.
    ///
    /// # Panics
    ///
    /// Panics when `rows * cols` overflows `usize`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        let Some(count) = rows.checked_mul(cols) else {
            panic!("height field {rows}x{cols} overflows usize");
        };
        Self {
            rows,
            cols,
            values: vec![value; count],
        }
    }

    /// Builds a height field from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::HeightCountMismatch`] when the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ParseError> {
        let cols = rows.first().map_or(0, Vec::len);
        let values: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(rows.len(), cols, values)
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.values.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
