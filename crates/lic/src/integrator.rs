//! Streamline integration through a vector field.
//!
//! From a seed position the integrator walks backward and forward along the
//! unit-normalized field direction with a fixed step size, using a midpoint
//! (second-order Runge-Kutta) update. A direction stops early when it leaves
//! the domain or reaches a (near-)zero vector.

use lic_core::{DVec2, LicConfig, Sampler, VectorField};

/// Magnitudes at or below this are treated as zero: the direction is undefined.
pub const MIN_SPEED: f64 = 1e-12;

/// One visited position and its signed arc length from the seed
/// (negative on the backward side).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub pos: DVec2,
    pub arc_length: f64,
}

/// Reusable buffer holding one seed's combined trajectory, ordered
/// backward-reversed, seed, forward.
///
/// The buffer keeps its capacity between seeds, so a worker's row loop only
/// reallocates while it is still growing toward the longest trajectory.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.points.capacity()
    }
}

/// Fixed-step midpoint integrator bound to one grid shape and boundary policy.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    sampler: Sampler,
    step_size: f64,
    steps: usize,
}

impl Integrator {
    /// `steps` is the maximum number of steps taken in each direction.
    pub fn new(sampler: Sampler, step_size: f64, steps: usize) -> Self {
        Self {
            sampler,
            step_size,
            steps,
        }
    }

    pub fn from_config(config: &LicConfig) -> Self {
        Self::new(
            Sampler::new(config.rows(), config.cols(), config.boundary()),
            config.step_size(),
            config.steps_per_direction(),
        )
    }

    /// Path length covered by a full, uninterrupted direction.
    pub fn half_length(&self) -> f64 {
        self.steps as f64 * self.step_size
    }

    /// Traces both directions from `seed` into `out`, replacing its contents.
    ///
    /// The seed is always included, so `out` holds between 1 and
    /// `2 * steps + 1` points afterwards.
    pub fn trace(&self, vfield: &VectorField, seed: DVec2, out: &mut Trajectory) {
        let points = &mut out.points;
        points.clear();
        self.advance(vfield, seed, -1.0, points);
        points.reverse();
        points.push(TrajectoryPoint {
            pos: seed,
            arc_length: 0.0,
        });
        self.advance(vfield, seed, 1.0, points);
    }

    /// Appends up to `steps` points walking from `seed` in direction `sign`.
    fn advance(
        &self,
        vfield: &VectorField,
        seed: DVec2,
        sign: f64,
        points: &mut Vec<TrajectoryPoint>,
    ) {
        let mut pos = seed;
        for k in 1..=self.steps {
            let Some(next) = self.midpoint_step(vfield, pos, sign) else {
                break;
            };
            pos = next;
            points.push(TrajectoryPoint {
                pos,
                arc_length: sign * k as f64 * self.step_size,
            });
        }
    }

    /// One midpoint step of length `step_size`, or `None` if the walk halts.
    ///
    /// The half-step estimate uses the direction at `pos`; the full step
    /// uses the direction resampled at that midpoint.
    pub fn midpoint_step(&self, vfield: &VectorField, pos: DVec2, sign: f64) -> Option<DVec2> {
        let h = self.step_size;
        let d0 = self.direction(vfield, pos, sign)?;
        let mid = pos + d0 * (0.5 * h);
        let d1 = self.direction(vfield, mid, sign)?;
        self.sampler.resolve(pos + d1 * h)
    }

    /// Unit field direction at `pos` times `sign`; `None` when out of domain
    /// or the local magnitude is (near-)zero.
    fn direction(&self, vfield: &VectorField, pos: DVec2, sign: f64) -> Option<DVec2> {
        let v = self.sampler.vector(vfield, pos)? * sign;
        let len = v.length();
        (len > MIN_SPEED).then(|| v / len)
    }
}
