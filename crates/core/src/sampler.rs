//! Bilinear sampling of grid data at fractional coordinates.
//!
//! Positions are [`DVec2`] values with `x` = column and `y` = row, measured in
//! cells from the centre of cell `(0, 0)`. The [`Boundary`] policy decides what
//! happens outside the grid: closed boundaries report "out of domain" (`None`),
//! periodic boundaries wrap around and blend across the seam.

use std::ops::{Add, Mul};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::LicError;
use crate::field::ScalarField;
use crate::vector_field::VectorField;

/// What the sampler does with positions outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Valid extent is `[0, rows-1] x [0, cols-1]`; anything else is out of domain.
    #[default]
    Closed,
    /// Positions wrap modulo the grid size.
    Periodic,
}

impl Boundary {
    /// Parses `"closed"` or `"periodic"` (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, LicError> {
        match name.to_ascii_lowercase().as_str() {
            "closed" | "open" => Ok(Boundary::Closed),
            "periodic" => Ok(Boundary::Periodic),
            _ => Err(LicError::UnknownBoundary(name.to_string())),
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Boundary::Closed => "closed",
            Boundary::Periodic => "periodic",
        }
    }
}

/// Values that can be blended bilinearly.
pub trait Blend: Copy + Add<Output = Self> + Mul<f64, Output = Self> {}

impl Blend for f64 {}
impl Blend for DVec2 {}

/// Bilinear interpolator for one grid shape and boundary policy.
///
/// The sampler holds no data, so one instance serves both the vector field
/// and every texture of the same shape.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    rows: usize,
    cols: usize,
    boundary: Boundary,
}

impl Sampler {
    pub fn new(rows: usize, cols: usize, boundary: Boundary) -> Self {
        Self {
            rows,
            cols,
            boundary,
        }
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Maps `pos` into the valid domain, or `None` if it is out of domain.
    ///
    /// Closed boundaries return `pos` unchanged when it lies inside
    /// `[0, cols-1] x [0, rows-1]`. Periodic boundaries wrap into
    /// `[0, cols) x [0, rows)`. Non-finite positions are always out of domain.
    pub fn resolve(&self, pos: DVec2) -> Option<DVec2> {
        if !pos.is_finite() {
            return None;
        }
        match self.boundary {
            Boundary::Closed => {
                let max_c = (self.cols - 1) as f64;
                let max_r = (self.rows - 1) as f64;
                (pos.x >= 0.0 && pos.x <= max_c && pos.y >= 0.0 && pos.y <= max_r).then_some(pos)
            }
            Boundary::Periodic => Some(DVec2::new(
                wrap_coord(pos.x, self.cols),
                wrap_coord(pos.y, self.rows),
            )),
        }
    }

    /// Interpolates row-major `data` at `pos`, or `None` if out of domain.
    ///
    /// `data.len()` must equal `rows * cols`.
    pub fn bilinear<T: Blend>(&self, data: &[T], pos: DVec2) -> Option<T> {
        let pos = self.resolve(pos)?;
        let (r0, r1, fr) = self.corners(pos.y, self.rows);
        let (c0, c1, fc) = self.corners(pos.x, self.cols);
        let at = |r: usize, c: usize| data[r * self.cols + c];
        Some(
            at(r0, c0) * ((1.0 - fr) * (1.0 - fc))
                + at(r0, c1) * ((1.0 - fr) * fc)
                + at(r1, c0) * (fr * (1.0 - fc))
                + at(r1, c1) * (fr * fc),
        )
    }

    /// Interpolated vector at `pos`.
    pub fn vector(&self, field: &VectorField, pos: DVec2) -> Option<DVec2> {
        self.bilinear(field.data(), pos)
    }

    /// Interpolated scalar at `pos`.
    pub fn scalar(&self, field: &ScalarField, pos: DVec2) -> Option<f64> {
        self.bilinear(field.data(), pos)
    }

    /// Lower index, upper index, and fractional weight of the upper index
    /// along one axis of length `n`. `coord` is already resolved.
    fn corners(&self, coord: f64, n: usize) -> (usize, usize, f64) {
        let lo = (coord.floor() as usize).min(n - 1);
        let frac = coord - lo as f64;
        let hi = match self.boundary {
            Boundary::Closed => (lo + 1).min(n - 1),
            Boundary::Periodic => (lo + 1) % n,
        };
        (lo, hi, frac)
    }
}

/// Wraps `coord` into `[0, n)`.
fn wrap_coord(coord: f64, n: usize) -> f64 {
    let n = n as f64;
    let w = coord.rem_euclid(n);
    // rem_euclid of a tiny negative value can round up to exactly n
    if w >= n {
        0.0
    } else {
        w
    }
}
