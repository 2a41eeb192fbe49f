//! Per-pixel LIC: seed, trace, convolve.
//!
//! `LicEngine` borrows the shared read-only inputs of one pass. Every output
//! cell depends only on those inputs and its own coordinates, so any set of
//! rows can be rendered independently of every other row.

use lic_core::{DVec2, KernelShape, LicConfig, LicError, Sampler, ScalarField, VectorField};

use crate::integrator::{Integrator, Trajectory};
use crate::kernel::convolve;

/// Trajectory points reserved up front per scratch buffer. Longer streamlines
/// grow the buffer on first use and keep the capacity for later pixels.
pub const SCRATCH_RESERVE: usize = 4096;

/// Read-only view of one pass: vector field, input texture, and resolved options.
#[derive(Debug, Clone, Copy)]
pub struct LicEngine<'a> {
    vfield: &'a VectorField,
    texture: &'a ScalarField,
    sampler: Sampler,
    integrator: Integrator,
    kernel: KernelShape,
    capacity: usize,
}

impl<'a> LicEngine<'a> {
    /// Binds one pass's inputs.
    ///
    /// Returns `DimensionMismatch` unless `config` was resolved for the
    /// vector field's shape and `texture` has that shape too.
    pub fn new(
        vfield: &'a VectorField,
        texture: &'a ScalarField,
        config: &LicConfig,
    ) -> Result<Self, LicError> {
        check_config_shape(vfield, config)?;
        texture.ensure_same_shape(vfield.rows(), vfield.cols())?;
        Ok(Self {
            vfield,
            texture,
            sampler: Sampler::new(config.rows(), config.cols(), config.boundary()),
            integrator: Integrator::from_config(config),
            kernel: config.kernel(),
            capacity: config.max_trajectory_len().min(SCRATCH_RESERVE),
        })
    }

    pub fn rows(&self) -> usize {
        self.vfield.rows()
    }

    pub fn cols(&self) -> usize {
        self.vfield.cols()
    }

    /// A trajectory buffer for this pass, reserved for the longest streamline
    /// up to [`SCRATCH_RESERVE`] points. Allocate one per worker and reuse it
    /// for every pixel.
    pub fn scratch(&self) -> Trajectory {
        Trajectory::with_capacity(self.capacity)
    }

    /// Output intensity for the pixel at `(row, col)`.
    pub fn pixel(&self, row: usize, col: usize, scratch: &mut Trajectory) -> Result<f64, LicError> {
        let seed = DVec2::new(col as f64, row as f64);
        self.integrator.trace(self.vfield, seed, scratch);
        let value = convolve(
            scratch.points(),
            self.texture,
            &self.sampler,
            self.kernel,
            self.integrator.half_length(),
        );
        match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(LicError::NonFiniteOutput { row, col }),
        }
    }

    /// Fills `out` (one row, `cols` long) with the intensities of `row`.
    pub fn render_row(
        &self,
        row: usize,
        out: &mut [f64],
        scratch: &mut Trajectory,
    ) -> Result<(), LicError> {
        for (col, cell) in out.iter_mut().enumerate() {
            *cell = self.pixel(row, col, scratch)?;
        }
        Ok(())
    }
}

/// `DimensionMismatch` unless `config` was resolved for `vfield`'s shape.
pub(crate) fn check_config_shape(
    vfield: &VectorField,
    config: &LicConfig,
) -> Result<(), LicError> {
    if vfield.shape() != (config.rows(), config.cols()) {
        return Err(LicError::DimensionMismatch {
            lhs_rows: vfield.rows(),
            lhs_cols: vfield.cols(),
            rhs_rows: config.rows(),
            rhs_cols: config.cols(),
        });
    }
    Ok(())
}
