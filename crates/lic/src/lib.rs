#![deny(unsafe_code)]
//! Line integral convolution over dense 2D vector fields.
//!
//! For every pixel a bidirectional streamline is traced through the vector
//! field and the input texture is averaged along it, producing a scalar
//! image whose streaks follow the flow. Passes can be chained and
//! repetitions averaged, then the result optionally high-pass filtered and
//! equalized.
//!
//! Entry points:
//! - [`compute_lic`] runs one pass over a given texture.
//! - [`compute_lic_with_postprocessing`] runs the full pipeline from noise.

pub mod engine;
pub mod executor;
pub mod integrator;
pub mod kernel;
pub mod multipass;
pub mod postprocess;

pub use engine::LicEngine;
pub use executor::{executor_for, ParallelExecutor, SerialExecutor};
pub use integrator::{Integrator, Trajectory, TrajectoryPoint, MIN_SPEED};
pub use multipass::run_multipass;
pub use postprocess::{equalize, gaussian_blur, high_pass, postprocess};

use lic_core::{LicConfig, LicError, LicParams, NoiseSource, ScalarField, VectorField};
use tracing::{info, warn};

/// One LIC pass of `texture` along `vfield` on the backend chosen by `config`.
///
/// Returns `DimensionMismatch` if the texture or config shape differs from
/// the vector field, and `NonFiniteTexture` for NaN or infinite texture values.
pub fn compute_lic(
    vfield: &VectorField,
    texture: &ScalarField,
    config: &LicConfig,
) -> Result<ScalarField, LicError> {
    texture.ensure_same_shape(vfield.rows(), vfield.cols())?;
    if let Some((row, col)) = texture.first_non_finite() {
        return Err(LicError::NonFiniteTexture { row, col });
    }
    executor_for(config.backend()).run(vfield, texture, config)
}

/// Full pipeline: repetitions of chained passes from `noise`, averaged, then
/// the enabled postprocessing steps.
///
/// `params` is validated against the field shape before any work starts.
pub fn compute_lic_with_postprocessing(
    vfield: &VectorField,
    noise: &NoiseSource,
    params: &LicParams,
) -> Result<ScalarField, LicError> {
    let config = LicConfig::resolve(params, vfield.rows(), vfield.cols())?;
    noise.validate(vfield.rows(), vfield.cols())?;
    let max_speed = vfield.max_magnitude();
    if max_speed <= MIN_SPEED {
        warn!("vector field is zero everywhere, passes leave the noise unchanged");
    }
    info!(
        rows = vfield.rows(),
        cols = vfield.cols(),
        max_speed,
        streamlength = config.streamlength(),
        passes = config.num_passes(),
        repetitions = config.num_repetitions(),
        backend = config.backend().name(),
        "computing lic"
    );
    let executor = executor_for(config.backend());
    let field = run_multipass(vfield, noise, &config, executor.as_ref())?;
    postprocess(field, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lic_core::{Backend, DVec2};

    #[test]
    fn compute_lic_rejects_texture_shape_mismatch() {
        let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
        let texture = ScalarField::new(4, 5).unwrap();
        let config = LicConfig::resolve(&LicParams::with_streamlength(2.0), 4, 4).unwrap();
        assert!(matches!(
            compute_lic(&vfield, &texture, &config),
            Err(LicError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn compute_lic_rejects_config_for_other_shape() {
        let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
        let texture = ScalarField::new(4, 4).unwrap();
        let config = LicConfig::resolve(&LicParams::with_streamlength(2.0), 8, 8).unwrap();
        assert!(matches!(
            compute_lic(&vfield, &texture, &config),
            Err(LicError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn compute_lic_rejects_nan_texture() {
        let vfield = VectorField::uniform(2, 2, DVec2::X).unwrap();
        let texture = ScalarField::from_data(2, 2, vec![0.0, 0.0, f64::NAN, 0.0]).unwrap();
        let config = LicConfig::resolve(&LicParams::with_streamlength(1.0), 2, 2).unwrap();
        assert!(matches!(
            compute_lic(&vfield, &texture, &config),
            Err(LicError::NonFiniteTexture { row: 1, col: 0 })
        ));
    }

    #[test]
    fn huge_texture_values_survive_a_pass() {
        let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
        let texture = ScalarField::filled(4, 4, 1e308).unwrap();
        let config = LicConfig::resolve(
            &LicParams {
                backend: Backend::Serial,
                ..LicParams::with_streamlength(2.0)
            },
            4,
            4,
        )
        .unwrap();
        let out = compute_lic(&vfield, &texture, &config).unwrap();
        assert!(out.data().iter().all(|v| (v / 1e308 - 1.0).abs() < 1e-12));
    }

    #[test]
    fn pipeline_rejects_bad_params_before_work() {
        let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
        let params = LicParams {
            use_filter: true,
            filter_sigma: 0.0,
            backend: Backend::Serial,
            ..LicParams::with_streamlength(2.0)
        };
        let result =
            compute_lic_with_postprocessing(&vfield, &NoiseSource::Uniform { seed: 1 }, &params);
        assert!(matches!(result, Err(LicError::InvalidFilterSigma(_))));
    }
}
