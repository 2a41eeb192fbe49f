//! Dense 2D vector field sampled on the same grid as the output image.
//!
//! Each cell holds a [`DVec2`] whose `x` component points along increasing
//! column index and whose `y` component points along increasing row index.
//! Every component is finite; zero vectors are allowed.

use glam::DVec2;

use crate::error::LicError;
use crate::field::checked_len;

/// An immutable `rows x cols` grid of finite 2D vectors in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    rows: usize,
    cols: usize,
    data: Vec<DVec2>,
}

impl VectorField {
    /// Creates a vector field from row-major vectors.
    ///
    /// Returns `InvalidDimensions` for empty grids, `DimensionMismatch` when
    /// `data.len() != rows * cols`, and `NonFiniteVector` for NaN or infinite
    /// components.
    pub fn new(rows: usize, cols: usize, data: Vec<DVec2>) -> Result<Self, LicError> {
        let expected = checked_len(rows, cols)?;
        if data.len() != expected {
            return Err(LicError::DimensionMismatch {
                lhs_rows: rows,
                lhs_cols: cols,
                rhs_rows: data.len(),
                rhs_cols: 1,
            });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(LicError::NonFiniteVector {
                row: i / cols,
                col: i % cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a vector field by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> DVec2,
    ) -> Result<Self, LicError> {
        let len = checked_len(rows, cols)?;
        let data = (0..len).map(|i| f(i / cols, i % cols)).collect();
        Self::new(rows, cols, data)
    }

    /// A field with the same vector in every cell.
    pub fn uniform(rows: usize, cols: usize, v: DVec2) -> Result<Self, LicError> {
        Self::from_fn(rows, cols, |_, _| v)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Read-only access to the row-major vectors.
    pub fn data(&self) -> &[DVec2] {
        &self.data
    }

    /// Vector at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<DVec2> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    /// Largest vector magnitude in the field.
    pub fn max_magnitude(&self) -> f64 {
        self.data.iter().map(|v| v.length()).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_matching_data() {
        let field = VectorField::new(2, 3, vec![DVec2::X; 6]).unwrap();
        assert_eq!(field.shape(), (2, 3));
        assert_eq!(field.get(1, 2), Some(DVec2::X));
    }

    #[test]
    fn new_rejects_wrong_length() {
        let result = VectorField::new(2, 2, vec![DVec2::ZERO; 3]);
        assert!(matches!(result, Err(LicError::DimensionMismatch { .. })));
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            VectorField::new(0, 4, vec![]),
            Err(LicError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_rejects_non_finite_component_with_position() {
        let mut data = vec![DVec2::ZERO; 6];
        data[4] = DVec2::new(0.0, f64::INFINITY);
        let result = VectorField::new(2, 3, data);
        assert!(matches!(
            result,
            Err(LicError::NonFiniteVector { row: 1, col: 1 })
        ));
    }

    #[test]
    fn zero_vectors_are_valid() {
        let field = VectorField::uniform(3, 3, DVec2::ZERO).unwrap();
        assert_eq!(field.max_magnitude(), 0.0);
    }

    #[test]
    fn get_outside_grid_is_none() {
        let field = VectorField::uniform(2, 2, DVec2::Y).unwrap();
        assert_eq!(field.get(2, 0), None);
    }

    #[test]
    fn max_magnitude_finds_largest() {
        let field =
            VectorField::from_fn(2, 2, |r, c| DVec2::new(r as f64 * 3.0, c as f64 * 4.0)).unwrap();
        assert!((field.max_magnitude() - 5.0).abs() < f64::EPSILON);
    }
}
