//! Repetitions of chained LIC passes, averaged.
//!
//! Within one repetition, pass `i + 1` convolves the output of pass `i`, so
//! streaks grow longer and smoother with every pass. Independent
//! repetitions start from different noise textures and are averaged to wash
//! out artifacts of any single realization. Each pass runs to completion
//! (the executor joins its workers) before the next one reads its output.

use lic_core::{Executor, LicConfig, LicError, NoiseSource, ScalarField, VectorField};
use tracing::debug;

use crate::engine::check_config_shape;

/// Runs `num_repetitions x num_passes` LIC passes and returns the
/// element-wise mean of every repetition's final field.
///
/// Returns `DimensionMismatch` before any pass runs if `config` was resolved
/// for another grid than `vfield`.
pub fn run_multipass(
    vfield: &VectorField,
    noise: &NoiseSource,
    config: &LicConfig,
    executor: &dyn Executor,
) -> Result<ScalarField, LicError> {
    check_config_shape(vfield, config)?;
    let (rows, cols) = vfield.shape();
    let repetitions = config.num_repetitions();
    let mut sum: Option<ScalarField> = None;

    for repetition in 0..repetitions {
        let mut field = noise.texture(rows, cols, repetition)?;
        for pass in 0..config.num_passes() {
            debug!(repetition, pass, executor = executor.name(), "lic pass");
            field = executor.run(vfield, &field, config)?;
        }
        match sum.as_mut() {
            Some(acc) => acc.add_assign(&field)?,
            None => sum = Some(field),
        }
    }

    let mut result = sum.ok_or_else(|| LicError::InvalidCount {
        name: "num_repetitions".into(),
        value: repetitions,
    })?;
    if repetitions > 1 {
        result.scale_assign(1.0 / repetitions as f64);
    }
    Ok(result)
}
