//! Error types for the LIC core.

use thiserror::Error;

/// Errors produced by field construction, configuration, and LIC execution.
#[derive(Debug, Error)]
pub enum LicError {
    /// Rows or columns was zero (or their product overflowed) when creating a field.
    #[error("invalid dimensions: rows and cols must be non-zero")]
    InvalidDimensions,

    /// Two fields had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_rows}, {lhs_cols}) vs ({rhs_rows}, {rhs_cols})")]
    DimensionMismatch {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    /// Streamlength was not a finite value greater than zero.
    #[error("invalid streamlength {0}: must be finite and > 0")]
    InvalidStreamlength(f64),

    /// Integration step size was not a finite value greater than zero.
    #[error("invalid step size {0}: must be finite and > 0")]
    InvalidStepSize(f64),

    /// Filtering was requested with a non-positive blur radius.
    #[error("invalid filter sigma {0}: must be finite and > 0 when filtering")]
    InvalidFilterSigma(f64),

    /// A count option (passes, repetitions, workers) was out of range.
    #[error("invalid {name}: {value} (must be >= 1)")]
    InvalidCount { name: String, value: usize },

    /// The vector field contained a NaN or infinite component.
    #[error("vector field has a non-finite component at row {row}, col {col}")]
    NonFiniteVector { row: usize, col: usize },

    /// An input texture contained a NaN or infinite value.
    #[error("texture has a non-finite value at row {row}, col {col}")]
    NonFiniteTexture { row: usize, col: usize },

    /// A worker produced a NaN or infinite output value.
    #[error("convolution produced a non-finite value at row {row}, col {col}")]
    NonFiniteOutput { row: usize, col: usize },

    /// A backend name could not be parsed.
    #[error("unknown backend: {0} (expected serial or parallel)")]
    UnknownBackend(String),

    /// A boundary policy name could not be parsed.
    #[error("unknown boundary: {0} (expected closed or periodic)")]
    UnknownBoundary(String),

    /// A kernel shape name could not be parsed.
    #[error("unknown kernel: {0} (expected box or hann)")]
    UnknownKernel(String),

    /// A vector field generator name was not recognized.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A parallel worker failed; the whole computation is abandoned.
    #[error("worker failure: {0}")]
    Worker(String),

    /// An I/O failure while writing output.
    #[error("i/o error: {0}")]
    Io(String),
}
