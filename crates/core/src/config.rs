//! LIC options: raw [`LicParams`] and the validated [`LicConfig`].
//!
//! `LicParams` is what callers fill in (struct literal, JSON, or CLI flags).
//! `LicConfig::resolve` validates it against the field shape once per call
//! and resolves every default, so the integrator never sees an invalid or
//! missing option.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LicError;
use crate::params::{
    param_bool, param_f64, param_opt_f64, param_opt_usize, param_string, param_usize,
};
use crate::sampler::Boundary;

/// Default integration step in cells.
pub const DEFAULT_STEP_SIZE: f64 = 1.0;
/// Default Gaussian blur radius for the high-pass filter.
pub const DEFAULT_FILTER_SIGMA: f64 = 3.0;
/// Default seed for generated noise textures.
pub const DEFAULT_SEED: u64 = 42;
/// Upper bound on integration steps per direction.
pub const MAX_STEPS_PER_DIRECTION: usize = 100_000;

/// Which executor schedules the per-pixel work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One thread, row-major order.
    Serial,
    /// Row bands on a rayon worker pool.
    #[default]
    Parallel,
}

impl Backend {
    /// Parses `"serial"` or `"parallel"` (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, LicError> {
        match name.to_ascii_lowercase().as_str() {
            "serial" => Ok(Backend::Serial),
            "parallel" => Ok(Backend::Parallel),
            _ => Err(LicError::UnknownBackend(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Serial => "serial",
            Backend::Parallel => "parallel",
        }
    }
}

/// Weighting applied to samples along a streamline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelShape {
    /// Every sample weighs the same.
    #[default]
    Box,
    /// Raised-cosine taper from 1 at the seed to 0 at the streamline ends.
    Hann,
}

impl KernelShape {
    /// Parses `"box"` or `"hann"` (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, LicError> {
        match name.to_ascii_lowercase().as_str() {
            "box" => Ok(KernelShape::Box),
            "hann" | "cosine" => Ok(KernelShape::Hann),
            _ => Err(LicError::UnknownKernel(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KernelShape::Box => "box",
            KernelShape::Hann => "hann",
        }
    }
}

/// Unvalidated LIC options with their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicParams {
    /// Path length per direction in cells; `None` means `min(rows, cols) / 4`.
    pub streamlength: Option<f64>,
    pub step_size: f64,
    pub num_passes: usize,
    pub num_repetitions: usize,
    pub use_filter: bool,
    pub filter_sigma: f64,
    pub use_equalize: bool,
    pub backend: Backend,
    /// Number of row bands for the parallel backend; `None` uses every rayon thread.
    pub num_workers: Option<usize>,
    pub boundary: Boundary,
    pub kernel: KernelShape,
    pub seed: u64,
}

impl Default for LicParams {
    fn default() -> Self {
        Self {
            streamlength: None,
            step_size: DEFAULT_STEP_SIZE,
            num_passes: 1,
            num_repetitions: 1,
            use_filter: false,
            filter_sigma: DEFAULT_FILTER_SIGMA,
            use_equalize: false,
            backend: Backend::default(),
            num_workers: None,
            boundary: Boundary::default(),
            kernel: KernelShape::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl LicParams {
    /// Extracts options from a JSON object, falling back to defaults for
    /// missing keys. Unrecognized backend, boundary, or kernel names are errors.
    pub fn from_json(params: &Value) -> Result<Self, LicError> {
        let d = Self::default();
        Ok(Self {
            streamlength: param_opt_f64(params, "streamlength"),
            step_size: param_f64(params, "step_size", d.step_size),
            num_passes: param_usize(params, "num_passes", d.num_passes),
            num_repetitions: param_usize(params, "num_repetitions", d.num_repetitions),
            use_filter: param_bool(params, "use_filter", d.use_filter),
            filter_sigma: param_f64(params, "filter_sigma", d.filter_sigma),
            use_equalize: param_bool(params, "use_equalize", d.use_equalize),
            backend: Backend::from_name(&param_string(params, "backend", d.backend.name()))?,
            num_workers: param_opt_usize(params, "num_workers"),
            boundary: Boundary::from_name(&param_string(params, "boundary", d.boundary.name()))?,
            kernel: KernelShape::from_name(&param_string(params, "kernel", d.kernel.name()))?,
            seed: params
                .get("seed")
                .and_then(Value::as_u64)
                .unwrap_or(d.seed),
        })
    }

    /// Options with only the streamlength set.
    pub fn with_streamlength(streamlength: f64) -> Self {
        Self {
            streamlength: Some(streamlength),
            ..Self::default()
        }
    }
}

/// Validated, fully resolved LIC configuration for one `rows x cols` grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicConfig {
    rows: usize,
    cols: usize,
    streamlength: f64,
    step_size: f64,
    steps_per_direction: usize,
    num_passes: usize,
    num_repetitions: usize,
    use_filter: bool,
    filter_sigma: f64,
    use_equalize: bool,
    backend: Backend,
    num_workers: Option<usize>,
    boundary: Boundary,
    kernel: KernelShape,
    seed: u64,
}

impl LicConfig {
    /// Validates `params` for a `rows x cols` field and resolves defaults.
    ///
    /// Rejects non-positive or non-finite streamlength, step size, and (when
    /// filtering) filter sigma, and zero pass/repetition/worker counts.
    pub fn resolve(params: &LicParams, rows: usize, cols: usize) -> Result<Self, LicError> {
        if rows == 0 || cols == 0 {
            return Err(LicError::InvalidDimensions);
        }
        let streamlength = params
            .streamlength
            .unwrap_or_else(|| ((rows.min(cols) / 4).max(1)) as f64);
        if !streamlength.is_finite() || streamlength <= 0.0 {
            return Err(LicError::InvalidStreamlength(streamlength));
        }
        if !params.step_size.is_finite() || params.step_size <= 0.0 {
            return Err(LicError::InvalidStepSize(params.step_size));
        }
        let ratio = (streamlength / params.step_size).round();
        if ratio > MAX_STEPS_PER_DIRECTION as f64 {
            return Err(LicError::InvalidStreamlength(streamlength));
        }
        let steps_per_direction = (ratio as usize).max(1);

        check_count("num_passes", params.num_passes)?;
        check_count("num_repetitions", params.num_repetitions)?;
        if let Some(workers) = params.num_workers {
            check_count("num_workers", workers)?;
        }
        if params.use_filter && (!params.filter_sigma.is_finite() || params.filter_sigma <= 0.0) {
            return Err(LicError::InvalidFilterSigma(params.filter_sigma));
        }

        Ok(Self {
            rows,
            cols,
            streamlength,
            step_size: params.step_size,
            steps_per_direction,
            num_passes: params.num_passes,
            num_repetitions: params.num_repetitions,
            use_filter: params.use_filter,
            filter_sigma: params.filter_sigma,
            use_equalize: params.use_equalize,
            backend: params.backend,
            num_workers: params.num_workers,
            boundary: params.boundary,
            kernel: params.kernel,
            seed: params.seed,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn streamlength(&self) -> f64 {
        self.streamlength
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// `round(streamlength / step_size)`, at least 1.
    pub fn steps_per_direction(&self) -> usize {
        self.steps_per_direction
    }

    /// Longest possible trajectory: both directions plus the seed.
    pub fn max_trajectory_len(&self) -> usize {
        2 * self.steps_per_direction + 1
    }

    pub fn num_passes(&self) -> usize {
        self.num_passes
    }

    pub fn num_repetitions(&self) -> usize {
        self.num_repetitions
    }

    pub fn use_filter(&self) -> bool {
        self.use_filter
    }

    pub fn filter_sigma(&self) -> f64 {
        self.filter_sigma
    }

    pub fn use_equalize(&self) -> bool {
        self.use_equalize
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn num_workers(&self) -> Option<usize> {
        self.num_workers
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn kernel(&self) -> KernelShape {
        self.kernel
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn check_count(name: &str, value: usize) -> Result<(), LicError> {
    if value == 0 {
        return Err(LicError::InvalidCount {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}
