//! Two-dimensional scalar field: textures, pass outputs, and final images.
//!
//! A `ScalarField` stores `rows * cols` f64 intensities in row-major layout.
//! Values are unconstrained reals; noise textures live in [0, 1) but a
//! high-pass filtered field may go negative.

use crate::error::LicError;

/// A dense 2D grid of real-valued intensities in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScalarField {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `LicError::InvalidDimensions` if either dimension is zero
    /// or if `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, LicError> {
        Self::filled(rows, cols, 0.0)
    }

    /// Creates a field with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self, LicError> {
        let len = checked_len(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![value; len],
        })
    }

    /// Creates a field from a pre-built row-major data vector, validating that
    /// `data.len() == rows * cols`.
    pub fn from_data(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LicError> {
        let expected = checked_len(rows, cols)?;
        if data.len() != expected {
            return Err(LicError::DimensionMismatch {
                lhs_rows: rows,
                lhs_cols: cols,
                rhs_rows: data.len(),
                rhs_cols: 1,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a field by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self, LicError> {
        let len = checked_len(rows, cols)?;
        let data = (0..len).map(|i| f(i / cols, i % cols)).collect();
        Ok(Self { rows, cols, data })
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

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the field and returns its row-major data.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Gets the value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    /// Sets the value at `(row, col)`.
    ///
    /// Returns `LicError::DimensionMismatch` if the coordinate lies outside the grid.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), LicError> {
        if row >= self.rows || col >= self.cols {
            return Err(LicError::DimensionMismatch {
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: row,
                rhs_cols: col,
            });
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Returns `DimensionMismatch` unless this field is `rows x cols`.
    pub fn ensure_same_shape(&self, rows: usize, cols: usize) -> Result<(), LicError> {
        if self.rows != rows || self.cols != cols {
            return Err(LicError::DimensionMismatch {
                lhs_rows: rows,
                lhs_cols: cols,
                rhs_rows: self.rows,
                rhs_cols: self.cols,
            });
        }
        Ok(())
    }

    /// Position of the first non-finite value as `(row, col)`, if any.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| (i / self.cols, i % self.cols))
    }

    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// `(min, max)` over all cells.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// In-place element-wise addition.
    ///
    /// Returns `LicError::DimensionMismatch` if the fields differ in size.
    pub fn add_assign(&mut self, other: &ScalarField) -> Result<(), LicError> {
        other.ensure_same_shape(self.rows, self.cols)?;
        self.data
            .iter_mut()
            .zip(other.data.iter())
            .for_each(|(a, b)| *a += b);
        Ok(())
    }

    /// In-place scaling of all values by `factor`.
    pub fn scale_assign(&mut self, factor: f64) {
        self.data.iter_mut().for_each(|v| *v *= factor);
    }

    /// Iterates over all cells yielding `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &v)| (i / self.cols, i % self.cols, v))
    }
}

/// `rows * cols`, rejecting zero and overflowing dimensions.
pub(crate) fn checked_len(rows: usize, cols: usize) -> Result<usize, LicError> {
    if rows == 0 || cols == 0 {
        return Err(LicError::InvalidDimensions);
    }
    rows.checked_mul(cols).ok_or(LicError::InvalidDimensions)
}
