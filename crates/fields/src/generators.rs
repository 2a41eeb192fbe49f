//! Example vector fields on square grids.
//!
//! Each generator evaluates an analytic (or noise-based) flow over a fixed
//! coordinate window, sampled at `size x size` evenly spaced points, and
//! suggests a streamlength that suits the scale of its features. Vector `x`
//! follows columns and `y` follows rows.

use std::f64::consts::PI;

use lic_core::params::{param_f64, param_usize};
use lic_core::{DVec2, LicError, VectorField};
use noise::{NoiseFn, Perlin};
use serde_json::Value;

/// Denominators below this are treated as a singularity and yield a zero vector.
const SINGULARITY_EPS: f64 = 1e-10;

/// Offset between the two Perlin samples that make up one squiggles vector.
const SQUIGGLE_OFFSET: f64 = 100.0;

/// A generated field and the streamlength it is best viewed with.
#[derive(Debug, Clone)]
pub struct GeneratedField {
    pub name: &'static str,
    pub vfield: VectorField,
    pub streamlength: f64,
}

/// Every named example field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Predator-prey phase portrait.
    LotkaVolterra,
    /// Concentric rings inside a radius, a lattice of cells outside it.
    Circles,
    /// Interleaved sin/cos swirls.
    Swirls,
    /// Smooth random flow from two Perlin noise channels.
    Squiggles,
    /// Solid rotation about the grid centre.
    Vortex,
    /// Constant rightward flow.
    Uniform,
}

const FIELD_KINDS: &[FieldKind] = &[
    FieldKind::LotkaVolterra,
    FieldKind::Circles,
    FieldKind::Swirls,
    FieldKind::Squiggles,
    FieldKind::Vortex,
    FieldKind::Uniform,
];

impl FieldKind {
    /// Looks a generator up by name.
    ///
    /// Returns `LicError::UnknownField` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, LicError> {
        FIELD_KINDS
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| LicError::UnknownField(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::LotkaVolterra => "lotka-volterra",
            FieldKind::Circles => "circles",
            FieldKind::Swirls => "swirls",
            FieldKind::Squiggles => "squiggles",
            FieldKind::Vortex => "vortex",
            FieldKind::Uniform => "uniform",
        }
    }

    /// Names of all generators, in listing order.
    pub fn list_fields() -> Vec<&'static str> {
        FIELD_KINDS.iter().map(|kind| kind.name()).collect()
    }

    /// Builds the field on a `size x size` grid.
    ///
    /// `seed` only affects `squiggles`. Recognized `params` keys:
    /// `num_swirls` (swirls, default 1) and `correlation_length` (squiggles,
    /// in cells, default `size / 7`).
    pub fn generate(
        self,
        size: usize,
        seed: u64,
        params: &Value,
    ) -> Result<GeneratedField, LicError> {
        if size == 0 {
            return Err(LicError::InvalidDimensions);
        }
        let quarter = (size / 4).max(1) as f64;
        let (vfield, streamlength) = match self {
            FieldKind::LotkaVolterra => (lotka_volterra(size)?, quarter),
            FieldKind::Circles => (circles(size)?, quarter),
            FieldKind::Swirls => {
                let num_swirls = param_usize(params, "num_swirls", 1);
                if num_swirls == 0 {
                    return Err(LicError::InvalidCount {
                        name: "num_swirls".into(),
                        value: num_swirls,
                    });
                }
                let streamlength = (size / (4 * num_swirls)).max(1) as f64;
                (swirls(size, num_swirls as f64)?, streamlength)
            }
            FieldKind::Squiggles => {
                let correlation = param_f64(params, "correlation_length", size as f64 / 7.0);
                if !correlation.is_finite() || correlation <= 0.0 {
                    return Err(LicError::InvalidStreamlength(correlation));
                }
                let streamlength = (correlation / 2.0).floor().max(1.0);
                (squiggles(size, seed, correlation)?, streamlength)
            }
            FieldKind::Vortex => (vortex(size)?, quarter),
            FieldKind::Uniform => (VectorField::uniform(size, size, DVec2::X)?, quarter),
        };
        Ok(GeneratedField {
            name: self.name(),
            vfield,
            streamlength,
        })
    }
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (n - 1) as f64;
    (0..n).map(|i| lo + step * i as f64).collect()
}

/// Samples `f(x, y)` over `[x_lo, x_hi] x [y_lo, y_hi]`.
fn sample_window(
    size: usize,
    (x_lo, x_hi): (f64, f64),
    (y_lo, y_hi): (f64, f64),
    f: impl Fn(f64, f64) -> DVec2,
) -> Result<VectorField, LicError> {
    let xs = linspace(x_lo, x_hi, size);
    let ys = linspace(y_lo, y_hi, size);
    VectorField::from_fn(size, size, |r, c| f(xs[c], ys[r]))
}

fn lotka_volterra(size: usize) -> Result<VectorField, LicError> {
    const CAPACITY: f64 = 8.0;
    const GROWTH: f64 = 3.0;
    const DECAY: f64 = 2.0;
    sample_window(size, (-5.0, 10.0), (-3.0, 11.0), |x, y| {
        let denom = 1.0 + x;
        if denom.abs() < SINGULARITY_EPS {
            return DVec2::ZERO;
        }
        let saturation = x / denom;
        DVec2::new(
            x * (1.0 - x / CAPACITY) - y * saturation,
            GROWTH * y * saturation - DECAY * y,
        )
    })
}

fn circles(size: usize) -> Result<VectorField, LicError> {
    let ring = 2.5 * PI;
    sample_window(size, (-10.0, 10.0), (-10.0, 10.0), |x, y| {
        if x.hypot(y) > ring {
            DVec2::new((y / PI).cos(), (x / PI).cos())
        } else {
            DVec2::new((y * PI / 2.0).cos(), (x * PI / 2.0).cos())
        }
    })
}

fn swirls(size: usize, num_swirls: f64) -> Result<VectorField, LicError> {
    sample_window(size, (-10.0, 10.0), (-10.0, 10.0), |x, y| {
        DVec2::new(
            (num_swirls * (y + x) / (2.0 * PI)).sin(),
            (num_swirls * (x - y) / (2.0 * PI)).cos(),
        )
    })
}

fn squiggles(size: usize, seed: u64, correlation: f64) -> Result<VectorField, LicError> {
    let noise = Perlin::new(seed as u32 ^ (seed >> 32) as u32);
    let scale = 1.0 / correlation;
    VectorField::from_fn(size, size, |r, c| {
        let sx = c as f64 * scale;
        let sy = r as f64 * scale;
        DVec2::new(
            noise.get([sx, sy]),
            noise.get([sx + SQUIGGLE_OFFSET, sy + SQUIGGLE_OFFSET]),
        )
    })
}

fn vortex(size: usize) -> Result<VectorField, LicError> {
    let centre = (size as f64 - 1.0) / 2.0;
    let radius = centre.max(1.0);
    VectorField::from_fn(size, size, |r, c| {
        let rx = (c as f64 - centre) / radius;
        let ry = (r as f64 - centre) / radius;
        DVec2::new(-ry, rx)
    })
}
