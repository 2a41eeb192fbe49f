//! The `Executor` trait: one LIC pass over a whole field.
//!
//! Serial and parallel schedulings of the same per-pixel computation both
//! implement this trait, so the multi-pass controller can run either one
//! through `&dyn Executor` and switch at runtime from [`Backend`](crate::Backend).

use crate::config::LicConfig;
use crate::error::LicError;
use crate::field::ScalarField;
use crate::vector_field::VectorField;

/// Runs one LIC pass: convolves `texture` along the streamlines of `vfield`.
///
/// Implementations must return a fresh field of the same shape as `vfield`
/// and must never write into `texture`. Two executors given identical inputs
/// must produce identical output.
///
/// This trait is **object-safe**.
pub trait Executor {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Computes one pass. Inputs have already been validated.
    fn run(
        &self,
        vfield: &VectorField,
        texture: &ScalarField,
        config: &LicConfig,
    ) -> Result<ScalarField, LicError>;
}
