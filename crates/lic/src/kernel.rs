//! Convolution of a texture along a traced trajectory.

use std::f64::consts::PI;

use lic_core::{KernelShape, Sampler, ScalarField};

use crate::integrator::TrajectoryPoint;

/// Weighted mean of `texture` sampled at every trajectory point.
///
/// `half_length` is the path length of one full direction; the Hann taper
/// reaches zero there. Returns `None` if no point could be sampled, which
/// cannot happen for a trajectory produced by the integrator (the seed is
/// always a grid cell).
///
/// The mean is updated incrementally as a convex blend of the running mean
/// and each new sample, so it stays finite for any finite texture, however
/// close its values are to `f64::MAX`.
pub fn convolve(
    points: &[TrajectoryPoint],
    texture: &ScalarField,
    sampler: &Sampler,
    shape: KernelShape,
    half_length: f64,
) -> Option<f64> {
    let mut mean = 0.0;
    let mut total_weight = 0.0;
    for p in points {
        let Some(value) = sampler.scalar(texture, p.pos) else {
            continue;
        };
        let w = weight(shape, p.arc_length, half_length);
        if w <= 0.0 {
            continue;
        }
        total_weight += w;
        let share = w / total_weight;
        mean = mean * (1.0 - share) + value * share;
    }
    (total_weight > 0.0).then_some(mean)
}

/// Weight of a sample `arc_length` cells from the seed.
pub fn weight(shape: KernelShape, arc_length: f64, half_length: f64) -> f64 {
    match shape {
        KernelShape::Box => 1.0,
        KernelShape::Hann => {
            if half_length <= 0.0 {
                return 1.0;
            }
            let t = (arc_length.abs() / half_length).min(1.0);
            0.5 * (1.0 + (PI * t).cos())
        }
    }
}
